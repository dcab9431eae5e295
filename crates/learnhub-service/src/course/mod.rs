//! Course and chapter catalog operations.

pub mod service;

pub use service::CourseService;
