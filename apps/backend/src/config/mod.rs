//! Process configuration read from the environment at startup.

use std::env;
use std::str::FromStr;

use crate::domain::rules::Rules;
use crate::error::AppError;
use crate::sync::RetryPolicy;

/// Which `RoomStore` backend the server runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Database { url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub rules: Rules,
    pub retry: RetryPolicy,
    /// Empty means the local dev origins.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Store backend name for logs; never includes the database URL.
    pub fn store_label(&self) -> &'static str {
        match self.store {
            StoreKind::Memory => "memory",
            StoreKind::Database { .. } => "database",
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset and blank are the same.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = match var("ROOM_STORE").as_deref().map(str::trim) {
            None | Some("memory") => StoreKind::Memory,
            Some("database") => StoreKind::Database {
                url: var("DATABASE_URL").ok_or_else(|| {
                    AppError::config("DATABASE_URL is required when ROOM_STORE=database")
                })?,
            },
            Some(other) => {
                return Err(AppError::config(format!(
                    "ROOM_STORE must be 'memory' or 'database', got '{other}'"
                )))
            }
        };

        let defaults = Rules::default();
        let min_entry = parse_or("FARKLE_MIN_ENTRY", var("FARKLE_MIN_ENTRY"), 0u32)?;
        let target = parse_or(
            "FARKLE_TARGET_SCORE",
            var("FARKLE_TARGET_SCORE"),
            defaults.target_score,
        )?;
        if target == 0 {
            return Err(AppError::config("FARKLE_TARGET_SCORE must be positive"));
        }
        if min_entry > target {
            return Err(AppError::config(format!(
                "FARKLE_MIN_ENTRY ({min_entry}) is above FARKLE_TARGET_SCORE ({target})"
            )));
        }

        let policy = RetryPolicy::default();
        let max_attempts = parse_or(
            "FARKLE_TXN_MAX_ATTEMPTS",
            var("FARKLE_TXN_MAX_ATTEMPTS"),
            policy.max_attempts,
        )?;
        if max_attempts == 0 {
            return Err(AppError::config("FARKLE_TXN_MAX_ATTEMPTS must be at least 1"));
        }
        let backoff_ms = parse_or(
            "FARKLE_TXN_BACKOFF_MS",
            var("FARKLE_TXN_BACKOFF_MS"),
            policy.backoff_ms,
        )?;

        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("BACKEND_PORT", var("BACKEND_PORT"), 3001u16)?,
            store,
            rules: defaults.with_min_entry(min_entry).with_target(target),
            retry: RetryPolicy::new(max_attempts, backoff_ms),
            cors_origins,
        })
    }
}

fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{name} has an invalid value: '{raw}'"))),
    }
}
