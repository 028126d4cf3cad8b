use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{DocPath, DocumentStore, Documents, Snapshot, Write};
use crate::error::StoreError;

/// Process-local document store.
#[derive(Debug)]
pub struct MemoryStore {
    docs: Mutex<Documents>,
    revision: watch::Sender<u64>,
    reads: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            docs: Mutex::new(Documents::default()),
            revision,
            reads: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_document` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Documents> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, path: &DocPath) -> Result<Snapshot, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().get(path))
    }

    async fn batch_write(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        self.lock().apply(writes)?;
        self.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
