//! Identity provider capability.
//!
//! The provider owns the authentication state. The page only triggers
//! sign-in/sign-out and observes the resulting identity through `watch()`.

mod local;

use async_trait::async_trait;
pub use local::LocalProfileProvider;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::AuthError;

/// Snapshot of the signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Human-readable provider name, shown on the sign-in control.
    fn label(&self) -> &str;

    /// Runs the provider's interactive sign-in flow.
    async fn sign_in_with_popup(&self) -> Result<UserIdentity, AuthError>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Current identity, updated on every sign-in/sign-out.
    fn watch(&self) -> watch::Receiver<Option<UserIdentity>>;
}
