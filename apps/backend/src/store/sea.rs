//! SeaORM room store (Postgres in production, SQLite in tests).

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use tracing::debug;

use super::{decode_state, encode_state, RoomStore, StoreError, StoredRoom, INITIAL_VERSION};
use crate::domain::state::RoomState;
use crate::entities::rooms;

#[derive(Debug, Clone)]
pub struct SeaRoomStore {
    db: DatabaseConnection,
}

impl SeaRoomStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn to_stored(model: rooms::Model) -> Result<StoredRoom, StoreError> {
        let state = decode_state(&model.code, &model.state)?;
        Ok(StoredRoom {
            code: model.code,
            state,
            lock_version: model.lock_version,
        })
    }

    /// After a guarded write touched no rows, tell a missing room from a
    /// stale version.
    async fn explain_miss(&self, code: &str, expected: i32) -> StoreError {
        match rooms::Entity::find_by_id(code.to_string()).one(&self.db).await {
            Ok(Some(room)) => StoreError::VersionConflict {
                code: code.to_string(),
                expected,
                actual: room.lock_version,
            },
            Ok(None) => StoreError::NotFound(code.to_string()),
            Err(e) => StoreError::Db(e),
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl RoomStore for SeaRoomStore {
    async fn load(&self, code: &str) -> Result<Option<StoredRoom>, StoreError> {
        rooms::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await?
            .map(Self::to_stored)
            .transpose()
    }

    async fn insert(&self, code: &str, state: &RoomState) -> Result<StoredRoom, StoreError> {
        let now = time::OffsetDateTime::now_utc();
        let room = rooms::ActiveModel {
            code: Set(code.to_string()),
            state: Set(encode_state(code, state)?),
            lock_version: Set(INITIAL_VERSION),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match room.insert(&self.db).await {
            Ok(model) => Self::to_stored(model),
            Err(e) if is_unique_violation(&e) => Err(StoreError::AlreadyExists(code.to_string())),
            Err(e) => Err(StoreError::Db(e)),
        }
    }

    async fn compare_and_swap(
        &self,
        code: &str,
        expected: i32,
        state: &RoomState,
    ) -> Result<StoredRoom, StoreError> {
        let now = time::OffsetDateTime::now_utc();
        let encoded = encode_state(code, state)?;

        let result = rooms::Entity::update_many()
            .col_expr(rooms::Column::State, Expr::value(encoded))
            .col_expr(rooms::Column::UpdatedAt, Expr::value(now))
            .col_expr(
                rooms::Column::LockVersion,
                Expr::col(rooms::Column::LockVersion).add(1),
            )
            .filter(rooms::Column::Code.eq(code))
            .filter(rooms::Column::LockVersion.eq(expected))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let err = self.explain_miss(code, expected).await;
            debug!(room = code, expected, error = %err, "compare_and_swap missed");
            return Err(err);
        }

        Ok(StoredRoom {
            code: code.to_string(),
            state: state.clone(),
            lock_version: expected + 1,
        })
    }

    async fn delete(&self, code: &str, expected: i32) -> Result<(), StoreError> {
        let result = rooms::Entity::delete_many()
            .filter(rooms::Column::Code.eq(code))
            .filter(rooms::Column::LockVersion.eq(expected))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(self.explain_miss(code, expected).await);
        }
        Ok(())
    }
}
