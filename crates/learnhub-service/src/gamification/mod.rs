//! Points, streaks, and badge operations.

pub mod service;

pub use service::{AwardOutcome, BadgeCheckOutcome, GamificationService, UserProfileView};
