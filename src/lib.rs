//! Client-resident store of owned courses, their progress and bookmarks,
//! kept across restarts and reconciled with the lesson API.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod lesson_client;
pub mod shelf;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub type CourseShelfResult<T> = anyhow::Result<T>;
