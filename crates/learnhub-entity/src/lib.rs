//! # learnhub-entity
//!
//! Domain entity models for LearnHub. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod comment;
pub mod course;
pub mod gamification;
pub mod purchase;
pub mod user;
