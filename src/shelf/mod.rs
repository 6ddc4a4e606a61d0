//! The client-side course shelf: owned courses with progress, bookmarks, and
//! reconciliation of progress against the lesson API.
//!
//! [`Shelf::open`] builds the three services, hydrates both stores and hands
//! back shared handles. Consumers hold an `Arc` to whichever part they need.

mod persisted;

pub mod owned;
pub mod reconcile;
pub mod saved;

use std::sync::Arc;

pub use owned::{OWNED_COURSES_KEY, OwnedCourses, OwnershipToken};
pub use persisted::Hydrated;
pub use reconcile::{ReconcileOutcome, Reconciler, SyncState};
pub use saved::{SAVED_COURSES_KEY, SavedCourses};

use crate::lesson_client::LessonGateway;
use crate::storage::DurableStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfOptions {
    /// Install the demo courses on first run.
    pub seed_demo: bool,
}

#[derive(Clone)]
pub struct Shelf {
    owned: Arc<OwnedCourses>,
    saved: Arc<SavedCourses>,
    reconciler: Arc<Reconciler>,
}

impl Shelf {
    /// Build the shelf and hydrate both stores. Returns once both are ready.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn open(
        store: Arc<dyn DurableStore>,
        gateway: Arc<dyn LessonGateway>,
        options: ShelfOptions,
    ) -> Self {
        let owned = Arc::new(OwnedCourses::new(store.clone()).with_demo_seed(options.seed_demo));
        let saved = Arc::new(SavedCourses::new(store));
        tokio::join!(owned.hydrate(), saved.hydrate());
        let reconciler = Arc::new(Reconciler::new(owned.clone(), gateway));
        Shelf {
            owned,
            saved,
            reconciler,
        }
    }

    pub fn owned(&self) -> &Arc<OwnedCourses> {
        &self.owned
    }

    pub fn saved(&self) -> &Arc<SavedCourses> {
        &self.saved
    }

    pub fn reconciler(&self) -> &Arc<Reconciler> {
        &self.reconciler
    }

    pub fn is_ready(&self) -> bool {
        self.owned.is_ready() && self.saved.is_ready()
    }
}
