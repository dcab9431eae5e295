//! Route definitions for the LearnHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`, except the
//! WebSocket endpoint which lives at the root. Middleware layers are applied
//! in [`crate::app::build_app`].

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Assemble every route into a single router.
///
/// The returned router still needs `AppState` and the middleware stack,
/// which `build_app` supplies.
pub fn build_router() -> Router<AppState> {
    let api_routes = Router::new()
        .merge(course_routes())
        .merge(purchase_routes())
        .merge(webhook_routes())
        .merge(comment_routes())
        .merge(discussion_routes())
        .merge(gamification_routes())
        .merge(presence_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    Router::new().nest("/api", api_routes).merge(ws_routes)
}

/// Course catalog: courses and their chapters.
fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", post(handlers::course::create_course))
        .route("/courses", get(handlers::course::list_courses))
        .route("/courses/{course_id}", get(handlers::course::get_course))
        .route(
            "/courses/{course_id}/chapters",
            post(handlers::course::create_chapter),
        )
        .route(
            "/courses/{course_id}/chapters",
            get(handlers::course::list_chapters),
        )
}

/// Purchase confirmation and lookup.
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{course_id}/purchases/confirm",
            post(handlers::purchase::confirm_purchase),
        )
        .route(
            "/courses/{course_id}/purchases/me",
            get(handlers::purchase::my_purchase),
        )
}

/// Payment provider webhook (signature-authenticated, no bearer token).
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/payment", post(handlers::webhook::payment_webhook))
}

/// Chapter comments, edits, deletions, and moderation.
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chapters/{chapter_id}/comments",
            post(handlers::comment::create_comment),
        )
        .route(
            "/chapters/{chapter_id}/comments",
            get(handlers::comment::list_comments),
        )
        .route("/comments/{id}", put(handlers::comment::update_comment))
        .route("/comments/{id}", delete(handlers::comment::delete_comment))
        .route(
            "/comments/{id}/report",
            post(handlers::comment::report_comment),
        )
        .route(
            "/comments/{id}/report",
            delete(handlers::comment::dismiss_report),
        )
        .route(
            "/courses/{course_id}/comments/reported",
            get(handlers::comment::list_reported),
        )
}

/// Course-level discussion boards.
fn discussion_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{course_id}/discussions",
            post(handlers::discussion::create_discussion),
        )
        .route(
            "/courses/{course_id}/discussions",
            get(handlers::discussion::list_discussions),
        )
}

/// Points, badges, leaderboard, and public profiles.
fn gamification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/gamification/points",
            post(handlers::gamification::award_points),
        )
        .route(
            "/gamification/badges/check",
            post(handlers::gamification::check_badge),
        )
        .route(
            "/gamification/badges",
            get(handlers::gamification::list_badges),
        )
        .route(
            "/gamification/leaderboard",
            get(handlers::gamification::leaderboard),
        )
        .route(
            "/gamification/profiles/me",
            get(handlers::gamification::my_profile),
        )
        .route(
            "/gamification/profiles/{user_id}",
            get(handlers::gamification::user_profile),
        )
        .route(
            "/gamification/featured-badges",
            put(handlers::gamification::update_featured_badges),
        )
}

/// Presence snapshots backed by the realtime engine.
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/presence/global",
            get(handlers::presence::global_presence),
        )
        .route(
            "/chapters/{chapter_id}/presence",
            get(handlers::presence::chapter_presence),
        )
}

/// Liveness and readiness probes.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
