//! Pulls lesson completion from the backend into owned-course progress.
//!
//! Each ownership of a course is observed at most once: the first
//! [`Reconciler::observe`] issues one request, later calls for the same
//! ownership return [`ReconcileOutcome::AlreadySynced`] without touching the
//! network, across any number of view teardowns. Removing or re-buying the
//! course ends the observation. [`Reconciler::refresh`] forces a new pull.
//!
//! Every request carries its own sequence number and ownership is checked
//! again when the response arrives, so a late answer is never written for a
//! torn-down or superseded request, or against a course that was removed or
//! re-bought meanwhile.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::owned::{OwnedCourses, OwnershipToken};
use crate::domain::Progress;
use crate::domain::mapping::completion_progress;
use crate::error::ShelfError;
use crate::lesson_client::LessonGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotSynced,
    Syncing,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The course is not owned; nothing to reconcile.
    NotOwned,
    /// This ownership was already reconciled or is being reconciled.
    AlreadySynced,
    /// Progress was stored.
    Applied(Progress),
    /// The course has no lessons; stored progress left alone.
    NoLessons,
    /// The gateway failed; stored progress left alone.
    Failed,
    /// The request was torn down or superseded before the response arrived;
    /// nothing written.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Syncing,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    token: OwnershipToken,
    seq: u64,
    phase: Phase,
}

#[derive(Debug, Default)]
struct Observations {
    entries: HashMap<String, Observation>,
    next_seq: u64,
}

pub struct Reconciler {
    courses: Arc<OwnedCourses>,
    gateway: Arc<dyn LessonGateway>,
    observations: Mutex<Observations>,
}

impl Reconciler {
    pub fn new(courses: Arc<OwnedCourses>, gateway: Arc<dyn LessonGateway>) -> Self {
        Self {
            courses,
            gateway,
            observations: Mutex::new(Observations::default()),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn LessonGateway> {
        &self.gateway
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn observe(&self, course_id: &str) -> ReconcileOutcome {
        self.reconcile(course_id, false).await
    }

    /// Pull again even if this ownership was already reconciled. A request
    /// still in flight for the course is superseded and its response dropped.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn refresh(&self, course_id: &str) -> ReconcileOutcome {
        self.reconcile(course_id, true).await
    }

    /// Tear down the view of `course_id`. A request still in flight is
    /// cancelled and its response discarded. A finished observation stays,
    /// so remounting a course that is still owned makes no new request.
    /// Returns whether a request was cancelled.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn release(&self, course_id: &str) -> bool {
        let mut observations = self.observations.lock();
        let in_flight = matches!(
            observations.entries.get(course_id),
            Some(o) if o.phase == Phase::Syncing
        );
        if in_flight {
            observations.entries.remove(course_id);
        }
        in_flight
    }

    pub fn state(&self, course_id: &str) -> SyncState {
        let current = self.courses.ownership_token(course_id);
        match self.observations.lock().entries.get(course_id) {
            Some(o) if Some(o.token) == current => match o.phase {
                Phase::Syncing => SyncState::Syncing,
                Phase::Synced => SyncState::Synced,
            },
            _ => SyncState::NotSynced,
        }
    }

    async fn reconcile(&self, course_id: &str, force: bool) -> ReconcileOutcome {
        let Some(token) = self.courses.ownership_token(course_id) else {
            self.observations.lock().entries.remove(course_id);
            return ReconcileOutcome::NotOwned;
        };
        let Some(seq) = self.begin(course_id, token, force) else {
            return ReconcileOutcome::AlreadySynced;
        };

        let result = self.gateway.lessons_by_course(course_id).await;

        if !self.finish(course_id, token, seq) {
            tracing::debug!(seq, "request torn down or superseded while in flight");
            return ReconcileOutcome::Discarded;
        }

        let lessons = match result {
            Ok(lessons) => lessons,
            Err(source) => {
                let e = ShelfError::Reconciliation {
                    course_id: course_id.to_string(),
                    source,
                };
                tracing::warn!(error = %e, "keeping stored progress");
                return ReconcileOutcome::Failed;
            }
        };
        let Some(progress) = completion_progress(&lessons) else {
            tracing::debug!("course has no lessons");
            return ReconcileOutcome::NoLessons;
        };
        if self
            .courses
            .set_progress_for(course_id, token, progress)
            .await
        {
            tracing::info!(%progress, lessons = lessons.len(), "reconciled progress");
            ReconcileOutcome::Applied(progress)
        } else {
            ReconcileOutcome::Discarded
        }
    }

    // Starts a request and returns its sequence number, or None when this
    // ownership is already observed and `force` is off. Entries for courses
    // that are no longer owned under their recorded token are dropped.
    fn begin(&self, course_id: &str, token: OwnershipToken, force: bool) -> Option<u64> {
        let mut guard = self.observations.lock();
        let observations = &mut *guard;
        observations
            .entries
            .retain(|id, o| self.courses.ownership_token(id) == Some(o.token));
        if !force && observations.entries.contains_key(course_id) {
            return None;
        }
        let seq = observations.next_seq;
        observations.next_seq += 1;
        observations.entries.insert(
            course_id.to_string(),
            Observation {
                token,
                seq,
                phase: Phase::Syncing,
            },
        );
        Some(seq)
    }

    // Syncing -> Synced, provided this request is still the current one and
    // the ownership it was started for still holds.
    fn finish(&self, course_id: &str, token: OwnershipToken, seq: u64) -> bool {
        let mut observations = self.observations.lock();
        let current = matches!(
            observations.entries.get(course_id),
            Some(o) if o.seq == seq && o.phase == Phase::Syncing
        );
        if !current {
            return false;
        }
        if self.courses.ownership_token(course_id) != Some(token) {
            observations.entries.remove(course_id);
            return false;
        }
        observations.entries.insert(
            course_id.to_string(),
            Observation {
                token,
                seq,
                phase: Phase::Synced,
            },
        );
        true
    }
}
