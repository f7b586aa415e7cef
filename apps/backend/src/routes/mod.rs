use actix_web::web;

pub mod health;
pub mod rooms;

/// Mount every route. Shared by `main.rs` and the HTTP tests so both see
/// the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Rooms and their websocket: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));
}
