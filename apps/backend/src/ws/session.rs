use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::snapshot::{snapshot, RoomSnapshot};
use crate::extractors::RoomCode;
use crate::services::rooms::RoomService;
use crate::state::app_state::AppState;
use crate::ws::hub::{RoomBroadcast, RoomSessionRegistry};
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg};
use crate::AppError;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// `GET /api/rooms/{code}/ws`
///
/// Fails with a problem response before the upgrade when the room does not
/// exist; afterwards the session owns the connection. The snapshot read here
/// is sent first and the session re-reads the room once it is registered,
/// so a commit landing in between is not lost.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    code: RoomCode,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let rooms = app_state.rooms().clone();
    let code = code.0;
    let current = rooms.load(&code).await?;
    let initial = (current.lock_version, snapshot(&current.state));

    let session = RoomWsSession::new(code, rooms, initial);
    ws::start(session, &req, stream)
}

pub struct RoomWsSession {
    conn_id: Uuid,
    code: String,
    rooms: Arc<RoomService>,
    registry: Arc<RoomSessionRegistry>,
    token: Option<Uuid>,
    initial: Option<(i32, RoomSnapshot)>,
    /// Highest room version sent to this client; older states are dropped.
    last_version: i32,
    last_heartbeat: Instant,
}

impl RoomWsSession {
    fn new(code: String, rooms: Arc<RoomService>, initial: (i32, RoomSnapshot)) -> Self {
        let registry = rooms.registry();
        Self {
            conn_id: Uuid::new_v4(),
            code,
            rooms,
            registry,
            token: None,
            initial: Some(initial),
            last_version: 0,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    room = %actor.code,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Send a room state unless the client already has a newer one.
    ///
    /// Broadcasts from concurrent commits can arrive out of order, so only
    /// versions above `last_version` go out. `allow_same` lets an explicit
    /// resync repeat the current version.
    fn push_state(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        version: i32,
        room: RoomSnapshot,
        allow_same: bool,
    ) {
        let fresh = version > self.last_version || (allow_same && version == self.last_version);
        if !fresh {
            debug!(
                conn_id = %self.conn_id,
                room = %self.code,
                version,
                last_version = self.last_version,
                "[WS SESSION] dropping stale room state"
            );
            return;
        }
        self.last_version = version;
        Self::send_json(ctx, &ServerMsg::RoomState { version, room });
    }

    /// Re-read the room and push it if it moved on.
    fn refresh(&self, ctx: &mut ws::WebsocketContext<Self>, allow_same: bool) {
        let rooms = self.rooms.clone();
        let code = self.code.clone();
        ctx.spawn(
            async move { rooms.load(&code).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(room) => actor.push_state(
                        ctx,
                        room.lock_version,
                        snapshot(&room.state),
                        allow_same,
                    ),
                    Err(AppError::NotFound { .. }) => {
                        Self::send_json(
                            ctx,
                            &ServerMsg::RoomClosed {
                                code: actor.code.clone(),
                            },
                        );
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                        ctx.stop();
                    }
                    Err(err) => {
                        tracing::error!(
                            error = %err,
                            conn_id = %actor.conn_id,
                            room = %actor.code,
                            "[WS SESSION] room reload failed"
                        );
                        Self::send_error_and_close(ctx, ErrorCode::Internal, "resync failed");
                    }
                }),
        );
    }
}

impl Actor for RoomWsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, room = %self.code, "[WS SESSION] started");

        let recipient = ctx.address().recipient::<RoomBroadcast>();
        self.token = Some(self.registry.register(&self.code, recipient));

        if let Some((version, room)) = self.initial.take() {
            self.push_state(ctx, version, room, true);
        }
        // Catch commits made between the upgrade's read and registration.
        self.refresh(ctx, false);
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(token) = self.token.take() {
            self.registry.unregister(&self.code, token);
        }
        info!(conn_id = %self.conn_id, room = %self.code, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RoomWsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(ClientMsg::Resync) => self.refresh(ctx, true),
                    Err(_) => {
                        Self::send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON")
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    room = %self.code,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomBroadcast> for RoomWsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomBroadcast, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            RoomBroadcast::State { version, room } => {
                self.push_state(ctx, version, (*room).clone(), false);
            }
            RoomBroadcast::Closed => {
                Self::send_json(
                    ctx,
                    &ServerMsg::RoomClosed {
                        code: self.code.clone(),
                    },
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
            }
        }
    }
}
