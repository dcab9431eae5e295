//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use learnhub_core::config::AppConfig;
use learnhub_realtime::RealtimeEngine;
use learnhub_service::{CommentService, CourseService, GamificationService, PurchaseService};

use crate::extractors::auth::TokenVerifier;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, used directly by health checks.
    pub db_pool: PgPool,
    /// Identity token verifier.
    pub token_verifier: Arc<TokenVerifier>,
    /// WebSocket realtime engine.
    pub realtime: Arc<RealtimeEngine>,
    /// Course catalog service.
    pub course_service: Arc<CourseService>,
    /// Purchase recording service.
    pub purchase_service: Arc<PurchaseService>,
    /// Comment and moderation service.
    pub comment_service: Arc<CommentService>,
    /// Points and badge service.
    pub gamification_service: Arc<GamificationService>,
}
