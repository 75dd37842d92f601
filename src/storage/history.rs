//! Bounded upload history
//!
//! Holds at most `capacity` records. Inserting beyond capacity evicts the
//! oldest record (FIFO by upload order). Append and evict happen under one
//! lock so concurrent uploads cannot break the bound.
//!
//! When opened with a path, every change is mirrored into the `uploads` Sled
//! tree keyed by big-endian id, so keys sort in upload order.

use chrono::Utc;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::types::{NewUpload, UploadRecord};

/// Number of uploads retained when not configured otherwise.
pub const DEFAULT_CAPACITY: usize = 5;

const UPLOADS_TREE: &str = "uploads";

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no upload with id {0}")]
    NotFound(u64),

    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

struct Inner {
    records: VecDeque<UploadRecord>,
    next_id: u64,
    tree: Option<sled::Tree>,
}

/// Shared handle to the upload history.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
}

impl HistoryStore {
    /// Volatile store; history is lost on restart.
    pub fn in_memory(capacity: usize) -> Self {
        Self::from_parts(VecDeque::new(), 1, None, capacity)
    }

    /// Open or create a persistent store at `path`.
    ///
    /// The newest `capacity` records are restored. Older records left over
    /// from a larger capacity are purged.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        let tree = db.open_tree(UPLOADS_TREE)?;

        let mut records = VecDeque::new();
        for item in tree.iter() {
            let (key, value) = item?;
            match serde_json::from_slice::<UploadRecord>(&value) {
                Ok(record) => records.push_back(record),
                Err(e) => {
                    warn!(key = ?key, error = %e, "Dropping unreadable history record");
                    tree.remove(key)?;
                }
            }
        }

        while records.len() > capacity {
            if let Some(old) = records.pop_front() {
                tree.remove(old.id.to_be_bytes())?;
            }
        }
        tree.flush()?;

        let next_id = records.back().map_or(1, |r| r.id + 1);
        info!(
            path = %path.display(),
            restored = records.len(),
            next_id,
            "Upload history opened"
        );

        Ok(Self::from_parts(records, next_id, Some(tree), capacity))
    }

    fn from_parts(
        records: VecDeque<UploadRecord>,
        next_id: u64,
        tree: Option<sled::Tree>,
        capacity: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                records,
                next_id,
                tree,
            })),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a new upload, evicting the oldest record beyond capacity.
    ///
    /// With Sled, the insert and every eviction are written as one batch and
    /// flushed before memory changes, so a failed write leaves the history
    /// untouched.
    pub fn insert(&self, upload: NewUpload) -> Result<UploadRecord, StorageError> {
        self.insert_with(upload, |tree, batch| {
            tree.apply_batch(batch)?;
            tree.flush()?;
            Ok(())
        })
    }

    fn insert_with<F>(&self, upload: NewUpload, commit: F) -> Result<UploadRecord, StorageError>
    where
        F: FnOnce(&sled::Tree, sled::Batch) -> Result<(), StorageError>,
    {
        let mut inner = self.lock();

        let record = UploadRecord::from_new(inner.next_id, Utc::now(), upload);
        let overflow = (inner.records.len() + 1).saturating_sub(self.capacity);

        if let Some(tree) = &inner.tree {
            let mut batch = sled::Batch::default();
            batch.insert(record.id.to_be_bytes().to_vec(), serde_json::to_vec(&record)?);
            for evicted in inner.records.iter().take(overflow) {
                batch.remove(evicted.id.to_be_bytes().to_vec());
            }
            commit(tree, batch)?;
        }

        inner.next_id += 1;
        inner.records.push_back(record.clone());
        for _ in 0..overflow {
            if let Some(evicted) = inner.records.pop_front() {
                debug!(id = evicted.id, filename = %evicted.filename, "Evicted upload from history");
            }
        }

        Ok(record)
    }

    /// All retained records, newest first.
    pub fn list(&self) -> Vec<UploadRecord> {
        self.lock().records.iter().rev().cloned().collect()
    }

    /// Fetch one record by id.
    pub fn get(&self, id: u64) -> Result<UploadRecord, StorageError> {
        self.lock()
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryStats;

    fn upload(name: &str) -> NewUpload {
        NewUpload {
            filename: name.to_string(),
            row_count: 0,
            error_count: 0,
            checksum: String::new(),
            summary: SummaryStats::default(),
        }
    }

    #[test]
    fn test_ids_follow_upload_order() {
        let store = HistoryStore::in_memory(DEFAULT_CAPACITY);
        let a = store.insert(upload("a.csv")).unwrap();
        let b = store.insert(upload("b.csv")).unwrap();
        assert!(b.id > a.id);
        assert!(b.uploaded_at >= a.uploaded_at);
    }

    #[test]
    fn test_sixth_insert_evicts_oldest() {
        let store = HistoryStore::in_memory(5);
        let first = store.insert(upload("0.csv")).unwrap();
        for i in 1..6 {
            store.insert(upload(&format!("{i}.csv"))).unwrap();
        }

        assert_eq!(store.len(), 5);
        assert!(matches!(store.get(first.id), Err(StorageError::NotFound(_))));

        let names: Vec<_> = store.list().into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["5.csv", "4.csv", "3.csv", "2.csv", "1.csv"]);
    }

    #[test]
    fn test_get_unknown_id() {
        let store = HistoryStore::in_memory(5);
        assert!(matches!(store.get(42), Err(StorageError::NotFound(42))));
    }

    #[test]
    fn test_concurrent_inserts_respect_capacity() {
        let store = HistoryStore::in_memory(5);
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.insert(upload(&format!("{i}.csv"))).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = store.list();
        assert_eq!(records.len(), 5);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![16, 15, 14, 13, 12]);
    }

    #[test]
    fn test_persistent_store_restores_newest() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = HistoryStore::open(dir.path(), 5).unwrap();
            for i in 0..7 {
                store.insert(upload(&format!("{i}.csv"))).unwrap();
            }
        }

        let reopened = HistoryStore::open(dir.path(), 3).unwrap();
        let names: Vec<_> = reopened.list().into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["6.csv", "5.csv", "4.csv"]);

        let next = reopened.insert(upload("7.csv")).unwrap();
        assert_eq!(next.id, 8);
        assert_eq!(reopened.len(), 3);
    }

    #[test]
    fn test_failed_write_leaves_history_untouched() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = HistoryStore::open(dir.path(), 2).unwrap();
            store.insert(upload("a.csv")).unwrap();
            store.insert(upload("b.csv")).unwrap();

            let err = store
                .insert_with(upload("c.csv"), |_, _| {
                    Err(StorageError::Database(sled::Error::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "disk full",
                    ))))
                })
                .unwrap_err();
            assert!(matches!(err, StorageError::Database(_)));

            let names: Vec<_> = store.list().into_iter().map(|r| r.filename).collect();
            assert_eq!(names, vec!["b.csv", "a.csv"]);
            assert!(matches!(store.get(3), Err(StorageError::NotFound(3))));

            // The failed id is not burned
            let c = store.insert(upload("c.csv")).unwrap();
            assert_eq!(c.id, 3);
        }

        let reopened = HistoryStore::open(dir.path(), 2).unwrap();
        let names: Vec<_> = reopened.list().into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["c.csv", "b.csv"]);
    }

    #[test]
    fn test_eviction_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = HistoryStore::open(dir.path(), 2).unwrap();
            for name in ["a.csv", "b.csv", "c.csv"] {
                store.insert(upload(name)).unwrap();
            }
        }

        // A larger capacity would resurrect "a.csv" if its removal was lost
        let reopened = HistoryStore::open(dir.path(), 5).unwrap();
        let names: Vec<_> = reopened.list().into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["c.csv", "b.csv"]);
    }
}
