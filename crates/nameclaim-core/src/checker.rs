//! Debounced username availability checks.
//!
//! `Debouncer` delays a future until calls have been quiet for a window; a new
//! call cancels the pending one. Once the window elapses the future runs to
//! completion even if newer calls arrive, so consumers must still discard
//! stale completions (see the request tokens in the TUI reducer).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::username::{self, Availability, MIN_LEN};

/// Trailing-edge debounce over spawned futures.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedules `fut` to run after the window, superseding any pending call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<Fut>(&mut self, fut: Fut) -> JoinHandle<()>
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => fut.await,
            }
        })
    }

    /// Drops the pending call, if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Debounced existence check against `usernames/{candidate}`.
pub struct AvailabilityChecker {
    store: Arc<dyn DocumentStore>,
    debouncer: Debouncer,
}

impl AvailabilityChecker {
    pub fn new(store: Arc<dyn DocumentStore>, window: Duration) -> Self {
        Self {
            store,
            debouncer: Debouncer::new(window),
        }
    }

    /// Schedules a lookup for `candidate`; `on_result` receives the candidate
    /// and the outcome once the lookup lands.
    ///
    /// Candidates shorter than `MIN_LEN` never reach the store: they only
    /// cancel whatever lookup was pending.
    pub fn check<F>(&mut self, candidate: String, on_result: F)
    where
        F: FnOnce(String, Result<Availability, StoreError>) + Send + 'static,
    {
        if candidate.chars().count() < MIN_LEN {
            self.debouncer.cancel();
            return;
        }
        let store = Arc::clone(&self.store);
        self.debouncer.call(async move {
            let result = username::lookup(store.as_ref(), &candidate).await;
            on_result(candidate, result);
        });
    }

    /// Drops the pending lookup, if it has not fired yet.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::{mpsc, watch};

    use super::*;
    use crate::store::{DocPath, MemoryStore, Snapshot, Write, WriteBatch};

    const WINDOW: Duration = Duration::from_millis(500);

    type Results = mpsc::UnboundedReceiver<(String, Result<Availability, StoreError>)>;

    fn collector() -> (
        impl Fn() -> Box<dyn FnOnce(String, Result<Availability, StoreError>) + Send>,
        Results,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let make = move || {
            let tx = tx.clone();
            Box::new(move |candidate, result| {
                let _ = tx.send((candidate, result));
            }) as Box<dyn FnOnce(String, Result<Availability, StoreError>) + Send>
        };
        (make, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_changes_issues_one_lookup_for_last_value() {
        let store = Arc::new(MemoryStore::new());
        let mut checker =
            AvailabilityChecker::new(Arc::clone(&store) as Arc<dyn DocumentStore>, WINDOW);
        let (make, mut rx) = collector();

        for candidate in ["ali", "alic", "alice", "alicex", "alicexy"] {
            checker.check(candidate.to_string(), make());
            tokio::time::sleep(Duration::from_millis(90)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(store.read_count(), 1);
        let (candidate, result) = rx.recv().await.unwrap();
        assert_eq!(candidate, "alicexy");
        assert_eq!(result.unwrap(), Availability::Available);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_candidate_never_reaches_store() {
        let store = Arc::new(MemoryStore::new());
        let mut checker =
            AvailabilityChecker::new(Arc::clone(&store) as Arc<dyn DocumentStore>, WINDOW);
        let (make, mut rx) = collector();

        checker.check("abc".to_string(), make());
        tokio::time::sleep(Duration::from_millis(100)).await;
        checker.check("ab".to_string(), make());
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(store.read_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_taken_name_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let mut batch = WriteBatch::new();
        batch
            .set(DocPath::username("alice").unwrap(), &json!({"ownerId": "u1"}))
            .unwrap();
        batch.commit(store.as_ref()).await.unwrap();

        let mut checker = AvailabilityChecker::new(store, WINDOW);
        let (make, mut rx) = collector();
        checker.check("alice".to_string(), make());

        let (_, result) = rx.recv().await.unwrap();
        assert_eq!(result.unwrap(), Availability::Taken);
    }

    /// Store whose reads take a second, to observe in-flight lookups.
    struct SlowStore(MemoryStore);

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn get_document(&self, path: &DocPath) -> Result<Snapshot, StoreError> {
            tokio::time::sleep(Duration::from_secs(1)).await;
            self.0.get_document(path).await
        }

        async fn batch_write(&self, writes: Vec<Write>) -> Result<(), StoreError> {
            self.0.batch_write(writes).await
        }

        fn watch(&self) -> watch::Receiver<u64> {
            self.0.watch()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_lookup_still_completes_after_newer_call() {
        let store = Arc::new(SlowStore(MemoryStore::new()));
        let mut checker = AvailabilityChecker::new(store, WINDOW);
        let (make, mut rx) = collector();

        checker.check("alice".to_string(), make());
        tokio::time::sleep(Duration::from_millis(600)).await;
        checker.check("bobby".to_string(), make());
        tokio::time::sleep(Duration::from_secs(3)).await;

        let first = rx.recv().await.unwrap().0;
        let second = rx.recv().await.unwrap().0;
        assert_eq!((first.as_str(), second.as_str()), ("alice", "bobby"));
    }
}
