use actix_web::{web, App, HttpServer};
use farkle::config::AppConfig;
use farkle::infra::state::StateBuilder;
use farkle::middleware::cors::cors_middleware;
use farkle::middleware::request_trace::RequestTrace;
use farkle::routes;
use farkle::telemetry;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match StateBuilder::from_config(&config).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        store = config.store_label(),
        min_entry = config.rules.min_entry,
        target_score = config.rules.target_score,
        "starting farkle server"
    );

    let data = web::Data::new(app_state);
    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
