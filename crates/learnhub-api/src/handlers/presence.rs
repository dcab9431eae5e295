//! Presence read handlers.
//!
//! Snapshots of the in-memory presence registry. Non-authoritative: the
//! realtime channel events are the live view, these endpoints let clients
//! reconcile after reconnect.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::types::id::ChapterId;
use learnhub_realtime::channel::types::ChannelKind;

use crate::dto::response::PresenceResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/presence/global
pub async fn global_presence(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<PresenceResponse>, AppError> {
    let channel = ChannelKind::PresenceGlobal.name();
    let (members, count) = state.realtime.presence_members(&channel);
    Ok(Json(PresenceResponse {
        members: members.into_iter().map(|id| id.into_uuid()).collect(),
        count,
    }))
}

/// GET /api/chapters/{chapter_id}/presence
pub async fn chapter_presence(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(chapter_id): Path<Uuid>,
) -> Result<Json<PresenceResponse>, AppError> {
    let channel = ChannelKind::PresenceChapter(ChapterId::from_uuid(chapter_id)).name();
    let (members, count) = state.realtime.presence_members(&channel);
    Ok(Json(PresenceResponse {
        members: members.into_iter().map(|id| id.into_uuid()).collect(),
        count,
    }))
}
