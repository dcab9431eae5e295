//! Application builder and server entry point.
//!
//! `build_app` layers middleware over the assembled router, and
//! `run_server` wires repositories, services, and the realtime engine
//! into `AppState` before binding the listener.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{middleware as axum_middleware, Router};
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_database::repositories::{
    CommentRepository, CourseRepository, GamificationRepository, PurchaseRepository,
};
use learnhub_realtime::{ChannelPublisher, EventPublisher, RealtimeEngine};
use learnhub_service::{CommentService, CourseService, GamificationService, PurchaseService};

use crate::extractors::auth::TokenVerifier;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let max_body = state.config.server.max_body_bytes;

    build_router()
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Construct every repository, service, and engine behind the API.
///
/// Shared by `run_server` and the integration test harness.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppState {
    // ── Step 1: Initialize repositories ──────────────────────────
    let course_repo = Arc::new(CourseRepository::new(db_pool.clone()));
    let purchase_repo = Arc::new(PurchaseRepository::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepository::new(db_pool.clone()));
    let gamification_repo = Arc::new(GamificationRepository::new(db_pool.clone()));

    // ── Step 2: Initialize token verification ────────────────────
    let token_verifier = Arc::new(TokenVerifier::new(&config.auth));

    // ── Step 3: Initialize realtime engine ───────────────────────
    let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
    let events = EventPublisher::new(Arc::clone(&realtime) as Arc<dyn ChannelPublisher>);

    // ── Step 4: Initialize services ──────────────────────────────
    let course_service = Arc::new(CourseService::new(Arc::clone(&course_repo)));
    let purchase_service = Arc::new(PurchaseService::new(
        Arc::clone(&purchase_repo),
        Arc::clone(&course_repo),
        &config.payment,
    ));
    let gamification_service = Arc::new(GamificationService::new(
        Arc::clone(&gamification_repo),
        config.gamification.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(
        Arc::clone(&comment_repo),
        Arc::clone(&course_repo),
        Arc::clone(&gamification_service),
        events,
    ));

    AppState {
        config: Arc::new(config),
        db_pool,
        token_verifier,
        realtime,
        course_service,
        purchase_service,
        comment_service,
        gamification_service,
    }
}

/// Runs the LearnHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    tracing::info!("Starting LearnHub server...");

    let state = build_state(config, db_pool);
    let realtime = Arc::clone(&state.realtime);
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("LearnHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            realtime.shutdown();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
