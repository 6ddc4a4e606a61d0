// A list of records mirrored to one durable key as a full JSON snapshot.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::models::Keyed;
use crate::error::ShelfError;
use crate::storage::DurableStore;

/// How hydration went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydrated {
    /// A snapshot was found; this many records survived parsing.
    Restored(usize),
    /// Nothing persisted yet; the fallback records were installed and written.
    Seeded(usize),
    /// Nothing persisted yet and no fallback.
    Empty,
    /// The snapshot could not be read or parsed. State is empty.
    Failed,
}

pub(crate) struct PersistedList<T> {
    key: &'static str,
    store: Arc<dyn DurableStore>,
    items: RwLock<Vec<T>>,
    // Serializes mutate+persist so snapshots land in call order.
    write_order: tokio::sync::Mutex<()>,
    ready: AtomicBool,
}

impl<T> PersistedList<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(key: &'static str, store: Arc<dyn DurableStore>) -> Self {
        Self {
            key,
            store,
            items: RwLock::new(Vec::new()),
            write_order: tokio::sync::Mutex::new(()),
            ready: AtomicBool::new(false),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    #[tracing::instrument(level = "debug", skip(self, fallback), fields(key = self.key))]
    pub async fn hydrate(&self, fallback: impl FnOnce() -> Option<Vec<T>>) -> Hydrated {
        let _order = self.write_order.lock().await;
        let outcome = match self.load().await {
            Ok(Some(records)) => {
                let n = records.len();
                *self.items.write() = records;
                Hydrated::Restored(n)
            }
            Ok(None) => match fallback() {
                Some(seed) => {
                    let n = seed.len();
                    *self.items.write() = seed.clone();
                    self.persist(&seed).await;
                    Hydrated::Seeded(n)
                }
                None => {
                    self.items.write().clear();
                    Hydrated::Empty
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "starting with empty state");
                self.items.write().clear();
                Hydrated::Failed
            }
        };
        self.ready.store(true, Ordering::Release);
        tracing::debug!(?outcome, "hydrated");
        outcome
    }

    /// Read the current records without copying them.
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    /// Apply `f` to the records. `f` reports whether it changed anything; a
    /// change is followed by a full snapshot write.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> (R, bool)) -> R {
        let _order = self.write_order.lock().await;
        let (result, snapshot) = {
            let mut items = self.items.write();
            let (result, changed) = f(&mut items);
            (result, changed.then(|| items.clone()))
        };
        if let Some(records) = snapshot {
            self.persist(&records).await;
        }
        result
    }

    async fn load(&self) -> Result<Option<Vec<T>>, ShelfError> {
        let hydration = |source: anyhow::Error| ShelfError::Hydration {
            key: self.key,
            source,
        };
        let Some(raw) = self.store.get(self.key).await.map_err(hydration)? else {
            return Ok(None);
        };
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| "snapshot is not a JSON array")
            .map_err(hydration)?;

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<T>(entry) {
                Ok(record) => {
                    if seen.insert(record.id().to_string()) {
                        records.push(record);
                    } else {
                        tracing::warn!(key = self.key, id = record.id(), "dropping duplicate record");
                    }
                }
                Err(e) => {
                    tracing::warn!(key = self.key, index, error = %e, "dropping malformed record");
                }
            }
        }
        Ok(Some(records))
    }

    async fn persist(&self, records: &[T]) {
        let result = serde_json::to_string(records)
            .with_context(|| "failed to serialize snapshot");
        let result = match result {
            Ok(json) => self.store.set(self.key, &json).await,
            Err(e) => Err(e),
        };
        if let Err(source) = result {
            let e = ShelfError::Persist {
                key: self.key,
                source,
            };
            tracing::warn!(error = %e, "snapshot not persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SavedCourse;
    use crate::storage::MemoryStore;

    fn saved(id: &str) -> SavedCourse {
        SavedCourse {
            id: id.into(),
            title: format!("Course {id}"),
            teacher: String::new(),
            price: String::new(),
            image: String::new(),
            rating: None,
            lessons: None,
            badge: None,
        }
    }

    #[tokio::test]
    async fn drops_malformed_and_duplicate_entries() {
        let store = Arc::new(MemoryStore::with_entries([(
            "k",
            r#"[{"id":"a"}, 42, {"title":"no id"}, {"id":"a","title":"dupe"}, {"id":"b"}]"#,
        )]));
        let list: PersistedList<SavedCourse> = PersistedList::new("k", store);

        assert_eq!(list.hydrate(|| None).await, Hydrated::Restored(2));
        let ids = list.read(|items| items.iter().map(|c| c.id.clone()).collect::<Vec<_>>());
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(list.read(|items| items[0].title.clone()), "");
    }

    #[tokio::test]
    async fn non_array_snapshot_is_a_failure() {
        let store = Arc::new(MemoryStore::with_entries([("k", r#"{"id":"a"}"#)]));
        let list: PersistedList<SavedCourse> = PersistedList::new("k", store);
        assert_eq!(list.hydrate(|| Some(vec![saved("seed")])).await, Hydrated::Failed);
        assert!(list.is_ready());
        assert_eq!(list.read(|items| items.len()), 0);
    }

    #[tokio::test]
    async fn seed_is_written_only_when_nothing_persisted() {
        let store = Arc::new(MemoryStore::new());
        let list: PersistedList<SavedCourse> = PersistedList::new("k", store.clone());
        assert_eq!(list.hydrate(|| Some(vec![saved("s")])).await, Hydrated::Seeded(1));
        assert_eq!(store.write_count(), 1);

        let again: PersistedList<SavedCourse> = PersistedList::new("k", store.clone());
        assert_eq!(again.hydrate(|| Some(vec![saved("other")])).await, Hydrated::Restored(1));
        assert_eq!(again.read(|items| items[0].id.clone()), "s");
    }

    #[tokio::test]
    async fn unchanged_mutation_skips_persist() {
        let store = Arc::new(MemoryStore::new());
        let list: PersistedList<SavedCourse> = PersistedList::new("k", store.clone());
        list.hydrate(|| None).await;

        list.mutate(|_| ((), false)).await;
        assert_eq!(store.write_count(), 0);

        list.mutate(|items| {
            items.push(saved("x"));
            ((), true)
        })
        .await;
        assert_eq!(store.write_count(), 1);
        let raw = store.raw("k").unwrap();
        assert!(raw.contains(r#""id":"x""#));
    }
}
