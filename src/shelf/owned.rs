//! Courses the user owns, with their progress.
//!
//! Per course id: `Unowned --add_course--> Owned(p0)`,
//! `Owned(p) --set_progress--> Owned(p')`, `Owned --remove_course--> Unowned`.
//! A course can be owned again after removal.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::persisted::{Hydrated, PersistedList};
use crate::domain::{CourseInfo, CourseStats, CourseTab, OwnedCourse, Progress};
use crate::storage::DurableStore;

pub const OWNED_COURSES_KEY: &str = "myCourses.v1";

/// Identifies one become-owned transition of a course. Removing and re-adding
/// a course yields a different token. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnershipToken(u64);

pub struct OwnedCourses {
    list: PersistedList<OwnedCourse>,
    tokens: Mutex<HashMap<String, OwnershipToken>>,
    next_token: AtomicU64,
    seed_demo: bool,
}

impl OwnedCourses {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            list: PersistedList::new(OWNED_COURSES_KEY, store),
            tokens: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            seed_demo: false,
        }
    }

    /// Install the demo courses when nothing has been persisted yet.
    pub fn with_demo_seed(mut self, seed: bool) -> Self {
        self.seed_demo = seed;
        self
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn hydrate(&self) -> Hydrated {
        let seed_demo = self.seed_demo;
        let outcome = self
            .list
            .hydrate(|| seed_demo.then(demo_courses))
            .await;
        let ids = self.list.read(|courses| {
            courses.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
        });
        let mut tokens = self.tokens.lock();
        tokens.clear();
        for id in ids {
            let token = self.issue_token();
            tokens.insert(id, token);
        }
        tracing::info!(?outcome, courses = tokens.len(), "owned courses ready");
        outcome
    }

    pub fn is_ready(&self) -> bool {
        self.list.is_ready()
    }

    /// Take ownership of a course. A course that is already owned keeps its
    /// progress: buying again never resets it. Returns whether the course was added.
    #[tracing::instrument(level = "debug", skip(self, info), fields(id = %info.id))]
    pub async fn add_course(&self, info: CourseInfo, initial_progress: f64) -> bool {
        let token = self.issue_token();
        self.list
            .mutate(|courses| {
                if courses.iter().any(|c| c.id == info.id) {
                    return (false, false);
                }
                self.tokens.lock().insert(info.id.clone(), token);
                courses.push(OwnedCourse::new(info, Progress::new(initial_progress)));
                (true, true)
            })
            .await
    }

    /// Overwrite the progress of an owned course. Unknown ids are ignored;
    /// this never creates ownership. Returns whether the course is owned.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn set_progress(&self, id: &str, value: f64) -> bool {
        let progress = Progress::new(value);
        self.list
            .mutate(|courses| match courses.iter_mut().find(|c| c.id == id) {
                Some(course) => {
                    let changed = course.progress != progress;
                    course.progress = progress;
                    (true, changed)
                }
                None => (false, false),
            })
            .await
    }

    /// Like `set_progress`, but only while `id` is still owned under `token`.
    pub(crate) async fn set_progress_for(
        &self,
        id: &str,
        token: OwnershipToken,
        progress: Progress,
    ) -> bool {
        self.list
            .mutate(|courses| {
                if self.tokens.lock().get(id) != Some(&token) {
                    return (false, false);
                }
                match courses.iter_mut().find(|c| c.id == id) {
                    Some(course) => {
                        let changed = course.progress != progress;
                        course.progress = progress;
                        (true, changed)
                    }
                    None => (false, false),
                }
            })
            .await
    }

    pub async fn mark_completed(&self, id: &str) -> bool {
        self.set_progress(id, 100.0).await
    }

    /// Returns whether a course was removed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn remove_course(&self, id: &str) -> bool {
        self.list
            .mutate(|courses| {
                let before = courses.len();
                courses.retain(|c| c.id != id);
                let removed = courses.len() != before;
                if removed {
                    self.tokens.lock().remove(id);
                }
                (removed, removed)
            })
            .await
    }

    /// Returns how many courses were removed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn clear_all(&self) -> usize {
        self.list
            .mutate(|courses| {
                let n = courses.len();
                courses.clear();
                self.tokens.lock().clear();
                (n, n > 0)
            })
            .await
    }

    pub fn is_owned(&self, id: &str) -> bool {
        self.list.read(|courses| courses.iter().any(|c| c.id == id))
    }

    pub fn get(&self, id: &str) -> Option<OwnedCourse> {
        self.list
            .read(|courses| courses.iter().find(|c| c.id == id).cloned())
    }

    /// All owned courses in the order they were added.
    pub fn courses(&self) -> Vec<OwnedCourse> {
        self.list.read(|courses| courses.to_vec())
    }

    pub fn filter(&self, tab: CourseTab) -> Vec<OwnedCourse> {
        self.list.read(|courses| {
            courses
                .iter()
                .filter(|c| tab.matches(c))
                .cloned()
                .collect()
        })
    }

    pub fn stats(&self) -> CourseStats {
        self.list.read(|courses| CourseStats::tally(courses))
    }

    pub fn ongoing_count(&self) -> usize {
        self.stats().ongoing
    }

    pub fn completed_count(&self) -> usize {
        self.stats().completed
    }

    pub fn len(&self) -> usize {
        self.list.read(|courses| courses.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Token of the current ownership of `id`, if owned.
    pub fn ownership_token(&self, id: &str) -> Option<OwnershipToken> {
        self.tokens.lock().get(id).copied()
    }

    fn issue_token(&self) -> OwnershipToken {
        OwnershipToken(self.next_token.fetch_add(1, Ordering::Relaxed))
    }
}

fn demo_courses() -> Vec<OwnedCourse> {
    let course = |id: &str, title: &str, teacher: &str, price: &str, image: &str, p: f64| {
        OwnedCourse::new(
            CourseInfo {
                id: id.into(),
                title: title.into(),
                teacher: teacher.into(),
                price: price.into(),
                image: image.into(),
            },
            Progress::new(p),
        )
    };
    vec![
        course(
            "c2",
            "UX Research for Beginners",
            "Olivia Wang",
            "$29",
            "https://images.unsplash.com/photo-1522075469751-3a6694fb2f61?q=80&w=800&auto=format&fit=crop",
            30.0,
        ),
        course(
            "c7",
            "Creative Art Design",
            "Hanna Moore",
            "$39",
            "https://images.unsplash.com/photo-1517694712202-14dd9538aa97?q=80&w=800&auto=format&fit=crop",
            70.0,
        ),
        course(
            "c9",
            "Palettes for Your App",
            "Julia Kim",
            "$19",
            "https://images.unsplash.com/photo-1519389950473-47ba0277781c?q=80&w=800&auto=format&fit=crop",
            100.0,
        ),
    ]
}
