//! Session context: the signed-in identity plus its claimed username.
//!
//! The session is derived, never written by the page. A background task
//! recomputes it whenever the identity provider or the document store reports
//! a change, and publishes it through a `watch` channel.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::identity::{IdentityProvider, UserIdentity};
use crate::store::DocumentStore;
use crate::username;

/// What the page knows about the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<UserIdentity>,
    pub claimed_username: Option<String>,
}

impl Session {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: UserIdentity, claimed_username: Option<String>) -> Self {
        Self {
            identity: Some(identity),
            claimed_username,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }
}

/// Observable session, kept in sync with the provider and the store.
pub struct SessionContext {
    rx: watch::Receiver<Session>,
    task: JoinHandle<()>,
}

impl SessionContext {
    /// Resolves the initial session and starts following changes.
    pub async fn spawn(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let mut identity_rx = provider.watch();
        let mut store_rx = store.watch();

        let identity = identity_rx.borrow_and_update().clone();
        store_rx.mark_unchanged();
        let initial = resolve(store.as_ref(), identity, &Session::signed_out()).await;
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = identity_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = store_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    () = tx.closed() => break,
                }

                let identity = identity_rx.borrow_and_update().clone();
                store_rx.mark_unchanged();
                let previous = tx.borrow().clone();
                let next = resolve(store.as_ref(), identity, &previous).await;
                tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        tracing::debug!(
                            user_id = next.user_id().unwrap_or("-"),
                            claimed = next.claimed_username.as_deref().unwrap_or("-"),
                            "session changed"
                        );
                        *current = next;
                        true
                    }
                });
            }
        });

        Self { rx, task }
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.rx.clone()
    }

    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn resolve(
    store: &dyn DocumentStore,
    identity: Option<UserIdentity>,
    previous: &Session,
) -> Session {
    let Some(identity) = identity else {
        return Session::signed_out();
    };
    match username::claimed_by(store, &identity.id).await {
        Ok(claimed) => Session::signed_in(identity, claimed),
        Err(err) => {
            tracing::warn!(user_id = %identity.id, error = %err, "failed to read claimed username");
            let claimed = if previous.user_id() == Some(identity.id.as_str()) {
                previous.claimed_username.clone()
            } else {
                None
            };
            Session::signed_in(identity, claimed)
        }
    }
}
