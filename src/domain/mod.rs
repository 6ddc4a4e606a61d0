pub mod mapping;
pub mod models;
pub mod progress;

pub use models::{CourseInfo, CourseStats, CourseTab, OwnedCourse, SavedCourse};
pub use progress::{Progress, normalize};
