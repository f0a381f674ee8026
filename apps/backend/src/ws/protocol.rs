use serde::{Deserialize, Serialize};

use crate::errors::DraftError;
use crate::ws::hub::DraftEvent;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    Attach {
        draft_id: String,
    },
    Detach {
        draft_id: String,
    },
    MakeSelection {
        draft_id: String,
        team_id: String,
        golfer_id: String,
    },
}

/// Outbound only; clients never send these back.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
    },

    Ack {
        message: &'static str,
    },

    TurnOpened {
        draft_id: String,
        round: u32,
        pick_no: u32,
        team_id: String,
        deadline_ms: i64,
    },

    SelectionMade {
        draft_id: String,
        round: u32,
        pick_no: u32,
        team_id: String,
        golfer_id: Option<String>,
        source: String,
        skipped: bool,
    },

    DraftComplete {
        draft_id: String,
    },

    Anomaly {
        draft_id: String,
        round: u32,
        pick_no: u32,
        reason: String,
    },

    Error {
        code: WsErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsErrorCode {
    BadRequest,
    BadProtocol,
    NotYourTurn,
    GolferUnavailable,
    TurnAlreadyResolved,
    DraftNotRunning,
    DraftStalled,
    Internal,
}

impl From<&DraftError> for WsErrorCode {
    fn from(err: &DraftError) -> Self {
        match err {
            DraftError::NotYourTurn { .. } => WsErrorCode::NotYourTurn,
            DraftError::GolferUnavailable(_) => WsErrorCode::GolferUnavailable,
            DraftError::TurnAlreadyResolved => WsErrorCode::TurnAlreadyResolved,
            DraftError::AlreadyStarted | DraftError::DraftNotRunning => {
                WsErrorCode::DraftNotRunning
            }
            DraftError::Stalled => WsErrorCode::DraftStalled,
            DraftError::Storage(_) => WsErrorCode::Internal,
        }
    }
}

impl From<DraftEvent> for ServerMsg {
    fn from(event: DraftEvent) -> Self {
        match event {
            DraftEvent::TurnOpened {
                draft_id,
                round,
                pick_no,
                team_id,
                deadline_ms,
            } => ServerMsg::TurnOpened {
                draft_id,
                round,
                pick_no,
                team_id,
                deadline_ms,
            },
            DraftEvent::SelectionMade {
                draft_id,
                round,
                pick_no,
                team_id,
                golfer_id,
                source,
                skipped,
            } => ServerMsg::SelectionMade {
                draft_id,
                round,
                pick_no,
                team_id,
                golfer_id,
                source: source.as_str().to_string(),
                skipped,
            },
            DraftEvent::DraftComplete { draft_id } => ServerMsg::DraftComplete { draft_id },
            DraftEvent::Anomaly {
                draft_id,
                round,
                pick_no,
                reason,
            } => ServerMsg::Anomaly {
                draft_id,
                round,
                pick_no,
                reason,
            },
        }
    }
}
