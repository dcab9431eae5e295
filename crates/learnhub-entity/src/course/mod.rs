//! Course catalog entities.

pub mod chapter;
pub mod model;

pub use chapter::{Chapter, CreateChapter};
pub use model::{Course, CreateCourse};
