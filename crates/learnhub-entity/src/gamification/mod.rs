//! Gamification domain entities.

pub mod activity;
pub mod badge;
pub mod profile;

pub use activity::PointActivity;
pub use badge::{Badge, BadgeTier, EarnedBadge, UserBadge};
pub use profile::{LeaderboardEntry, UserProfile};
