use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the browser client. Only the given origins are allowed; with
/// none configured, local dev origins are used.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_NONE_MATCH,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
            header::ETAG,
        ])
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors = cors
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000");
    }
    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
