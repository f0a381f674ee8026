use std::collections::HashSet;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::DraftId;
use crate::state::app_state::AppState;
use crate::ws::hub::DraftEvent;
use crate::ws::protocol::{ClientMsg, ServerMsg, WsErrorCode, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let conn_id = Uuid::new_v4();
    let session = WsSession::new(conn_id, app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,
    attached: HashSet<DraftId>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,

    hello_done: bool,
}

impl WsSession {
    fn new(conn_id: Uuid, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id,
            app_state,
            attached: HashSet::new(),
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    /// Protocol-level error on this channel only; the socket stays open.
    fn send_error(
        ctx: &mut ws::WebsocketContext<Self>,
        code: WsErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: WsErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_error(ctx, code, message);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let registry = self.app_state.registry();
        for draft_id in &self.attached {
            registry.detach(draft_id, self.conn_id);
        }
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
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

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, WsErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                match cmd {
                    ClientMsg::Hello { protocol } => {
                        if protocol != PROTOCOL_VERSION {
                            self.send_error_and_close(
                                ctx,
                                WsErrorCode::BadProtocol,
                                "Unsupported protocol version",
                            );
                            return;
                        }
                        self.hello_done = true;
                        Self::send_json(
                            ctx,
                            &ServerMsg::HelloAck {
                                protocol: PROTOCOL_VERSION,
                            },
                        );
                    }

                    ClientMsg::Attach { draft_id } => {
                        if !self.hello_done {
                            self.send_error_and_close(
                                ctx,
                                WsErrorCode::BadRequest,
                                "Must send hello first",
                            );
                            return;
                        }
                        let recipient = ctx.address().recipient::<DraftEvent>();
                        self.app_state
                            .registry()
                            .attach(&draft_id, self.conn_id, recipient);
                        self.attached.insert(draft_id);
                        // Ordering guarantee: ack before any draft event.
                        Self::send_json(ctx, &ServerMsg::Ack { message: "attached" });
                    }

                    ClientMsg::Detach { draft_id } => {
                        if !self.hello_done {
                            self.send_error_and_close(
                                ctx,
                                WsErrorCode::BadRequest,
                                "Must send hello first",
                            );
                            return;
                        }
                        self.app_state.registry().detach(&draft_id, self.conn_id);
                        self.attached.remove(&draft_id);
                        Self::send_json(ctx, &ServerMsg::Ack { message: "detached" });
                    }

                    ClientMsg::MakeSelection {
                        draft_id,
                        team_id,
                        golfer_id,
                    } => {
                        if !self.hello_done {
                            self.send_error_and_close(
                                ctx,
                                WsErrorCode::BadRequest,
                                "Must send hello first",
                            );
                            return;
                        }
                        match self
                            .app_state
                            .coordinator()
                            .submit_selection(&draft_id, &team_id, &golfer_id)
                        {
                            Ok(()) => {
                                Self::send_json(ctx, &ServerMsg::Ack { message: "selected" });
                            }
                            Err(err) => {
                                // Rejected picks are a normal part of the
                                // race; keep the socket open.
                                info!(
                                    conn_id = %self.conn_id,
                                    draft_id = %draft_id,
                                    team_id = %team_id,
                                    golfer_id = %golfer_id,
                                    error = %err,
                                    "[WS SESSION] selection rejected"
                                );
                                Self::send_error(ctx, WsErrorCode::from(&err), err.to_string());
                            }
                        }
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, WsErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<DraftEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: DraftEvent, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &ServerMsg::from(msg));
    }
}
