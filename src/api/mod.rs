// Local HTTP surface over the shelf for UI collaborators.

pub mod models;
pub mod routes;
pub mod services;

pub use routes::CourseShelfApi;
