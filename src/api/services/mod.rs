pub mod courses;
pub mod health;
pub mod lessons;
pub mod saved;
