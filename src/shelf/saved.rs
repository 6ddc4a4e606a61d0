// Bookmarked courses. Independent of ownership; the only mutation besides
// clearing is a strict toggle.

use std::sync::Arc;

use super::persisted::{Hydrated, PersistedList};
use crate::domain::SavedCourse;
use crate::storage::DurableStore;

pub const SAVED_COURSES_KEY: &str = "saved_courses.v1";

pub struct SavedCourses {
    list: PersistedList<SavedCourse>,
}

impl SavedCourses {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            list: PersistedList::new(SAVED_COURSES_KEY, store),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn hydrate(&self) -> Hydrated {
        let outcome = self.list.hydrate(|| None).await;
        tracing::info!(?outcome, saved = self.saved_count(), "saved courses ready");
        outcome
    }

    pub fn is_ready(&self) -> bool {
        self.list.is_ready()
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.list.read(|saved| saved.iter().any(|c| c.id == id))
    }

    /// Bookmark the course, or un-bookmark it if already saved. New bookmarks
    /// go to the front. Returns whether the course is saved afterwards.
    #[tracing::instrument(level = "debug", skip(self, course), fields(id = %course.id))]
    pub async fn toggle_save(&self, course: SavedCourse) -> bool {
        self.list
            .mutate(|saved| match saved.iter().position(|c| c.id == course.id) {
                Some(index) => {
                    saved.remove(index);
                    (false, true)
                }
                None => {
                    saved.insert(0, course);
                    (true, true)
                }
            })
            .await
    }

    /// Returns how many bookmarks were removed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn clear_all(&self) -> usize {
        self.list
            .mutate(|saved| {
                let n = saved.len();
                saved.clear();
                (n, n > 0)
            })
            .await
    }

    /// Most recently saved first.
    pub fn saved(&self) -> Vec<SavedCourse> {
        self.list.read(|saved| saved.to_vec())
    }

    pub fn saved_count(&self) -> usize {
        self.list.read(|saved| saved.len())
    }
}
