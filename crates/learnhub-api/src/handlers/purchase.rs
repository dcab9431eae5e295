//! Purchase confirmation and ownership handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use learnhub_core::error::AppError;

use crate::dto::response::{PurchaseResponse, PurchaseStatusResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/courses/{course_id}/purchases/confirm
///
/// Client-side confirmation after checkout. Idempotent against itself and
/// against the webhook path; repeat calls return the existing purchase.
pub async fn confirm_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let outcome = state
        .purchase_service
        .confirm_purchase(&auth, course_id)
        .await?;
    Ok(Json(outcome.into()))
}

/// GET /api/courses/{course_id}/purchases/me
pub async fn my_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<PurchaseStatusResponse>, AppError> {
    let purchase = state
        .purchase_service
        .get_my_purchase(&auth, course_id)
        .await?;
    Ok(Json(PurchaseStatusResponse {
        purchased: purchase.is_some(),
        purchase,
    }))
}
