//! Route handlers organized by domain.

pub mod comment;
pub mod course;
pub mod discussion;
pub mod gamification;
pub mod health;
pub mod presence;
pub mod purchase;
pub mod webhook;
pub mod ws;
