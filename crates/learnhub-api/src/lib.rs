//! # learnhub-api
//!
//! HTTP API layer for LearnHub built on Axum.
//!
//! Provides the REST endpoints, WebSocket upgrade, middleware (CORS, logging,
//! compression), extractors, and request/response DTOs.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
