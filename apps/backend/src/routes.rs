use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::health;
use crate::state::app_state::AppState;
use crate::ws::session;

async fn start_draft(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let draft_id = path.into_inner();
    app_state.coordinator().start(&draft_id).await?;

    // The run loop is spawned; progress is observed over the websocket.
    Ok(HttpResponse::Accepted().json(json!({
        "draft_id": draft_id,
        "status": "running",
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure);

    // Draft lifecycle routes: /api/drafts/**
    cfg.service(
        web::scope("/api/drafts").route("/{draft_id}/start", web::post().to(start_draft)),
    );

    // Realtime routes: /api/ws
    cfg.route("/api/ws", web::get().to(session::upgrade));
}
