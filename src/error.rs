// Failures the shelf contains. None of these reach a caller; they are logged
// and the store degrades to empty or unchanged state.

#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// Snapshot unreadable or not a JSON array. State starts empty.
    #[error("failed to hydrate `{key}`: {source}")]
    Hydration {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Snapshot write failed. The in-memory state is ahead of the durable one.
    #[error("failed to persist `{key}`: {source}")]
    Persist {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Gateway unreachable, non-success status, or unparseable body. Stored
    /// progress is left as it was.
    #[error("failed to reconcile course `{course_id}`: {source}")]
    Reconciliation {
        course_id: String,
        #[source]
        source: anyhow::Error,
    },
}
