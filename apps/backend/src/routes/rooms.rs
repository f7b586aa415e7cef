//! Room HTTP routes: create, read, and one POST per intent.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::snapshot::{snapshot, RoomSnapshot};
use crate::domain::state::{ActionId, PlayerId};
use crate::error::AppError;
use crate::extractors::{RoomCode, ValidatedJson};
use crate::http::etag::{if_none_match_hits, room_etag};
use crate::services::rooms::ActionReply;
use crate::state::app_state::AppState;
use crate::sync::Intent;
use crate::ws::session;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: String,
    #[serde(default)]
    pub action_id: Option<ActionId>,
}

/// Body of every in-room intent.
#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub player_id: PlayerId,
    /// Generated server-side when omitted, which makes the request
    /// non-idempotent.
    #[serde(default)]
    pub action_id: Option<ActionId>,
}

#[derive(Debug, Serialize)]
struct RoomResponse {
    code: String,
    version: i32,
    room: RoomSnapshot,
}

/// POST /api/rooms
async fn create_room(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let created = app_state.rooms().create(&body.name).await?;
    Ok(HttpResponse::Created()
        .insert_header((ETAG, room_etag(&created.code, created.version)))
        .json(created))
}

/// GET /api/rooms/{code}
///
/// Supports `If-None-Match`: an unchanged room answers `304 Not Modified`.
async fn get_room(
    http_req: HttpRequest,
    code: RoomCode,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room = app_state.rooms().load(code.as_str()).await?;
    let etag = room_etag(&room.code, room.lock_version);

    let unchanged = http_req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| if_none_match_hits(v, &etag));
    if unchanged {
        return Ok(HttpResponse::NotModified()
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(RoomResponse {
            code: room.code,
            version: room.lock_version,
            room: snapshot(&room.state),
        }))
}

/// POST /api/rooms/{code}/join
async fn join_room(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ValidatedJson<JoinRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let action_id = body.action_id.unwrap_or_default();
    let reply = app_state
        .rooms()
        .join(code.as_str(), &body.name, action_id)
        .await?;
    Ok(action_response(code.as_str(), reply))
}

async fn submit(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ActorRequest,
    intent: Intent,
) -> Result<HttpResponse, AppError> {
    let action_id = body.action_id.unwrap_or_default();
    let reply = app_state
        .rooms()
        .act(code.as_str(), &body.player_id, intent, action_id)
        .await?;
    Ok(action_response(code.as_str(), reply))
}

fn action_response(code: &str, reply: ActionReply) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    if let Some(version) = reply.version {
        builder.insert_header((ETAG, room_etag(code, version)));
    }
    builder.json(reply)
}

/// POST /api/rooms/{code}/start
async fn start(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ActorRequest>,
) -> Result<HttpResponse, AppError> {
    submit(code, app_state, body.into_inner(), Intent::Start).await
}

/// POST /api/rooms/{code}/roll
async fn roll(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ActorRequest>,
) -> Result<HttpResponse, AppError> {
    submit(code, app_state, body.into_inner(), Intent::Roll).await
}

/// POST /api/rooms/{code}/bank
async fn bank(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ActorRequest>,
) -> Result<HttpResponse, AppError> {
    submit(code, app_state, body.into_inner(), Intent::Bank).await
}

/// POST /api/rooms/{code}/restart
async fn restart(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ActorRequest>,
) -> Result<HttpResponse, AppError> {
    submit(code, app_state, body.into_inner(), Intent::Restart).await
}

/// POST /api/rooms/{code}/leave
async fn leave(
    code: RoomCode,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ActorRequest>,
) -> Result<HttpResponse, AppError> {
    submit(code, app_state, body.into_inner(), Intent::Leave).await
}

/// POST /api/rooms/{code}/dice/{index}/hold
async fn toggle_hold(
    code: RoomCode,
    path: web::Path<(String, usize)>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ActorRequest>,
) -> Result<HttpResponse, AppError> {
    let (_, index) = path.into_inner();
    submit(code, app_state, body.into_inner(), Intent::ToggleHold { index }).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_room)))
        .service(web::resource("/{code}").route(web::get().to(get_room)))
        .service(web::resource("/{code}/join").route(web::post().to(join_room)))
        .service(web::resource("/{code}/start").route(web::post().to(start)))
        .service(web::resource("/{code}/roll").route(web::post().to(roll)))
        .service(web::resource("/{code}/bank").route(web::post().to(bank)))
        .service(web::resource("/{code}/restart").route(web::post().to(restart)))
        .service(web::resource("/{code}/leave").route(web::post().to(leave)))
        .service(
            web::resource("/{code}/dice/{index}/hold").route(web::post().to(toggle_hold)),
        )
        .service(web::resource("/{code}/ws").route(web::get().to(session::upgrade)));
}
