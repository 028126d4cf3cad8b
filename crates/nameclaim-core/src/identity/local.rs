use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::{IdentityProvider, UserIdentity};
use crate::config::IdentityConfig;
use crate::error::AuthError;

const CODE_NOT_ALLOWED: &str = "auth/operation-not-allowed";
const CODE_INTERNAL: &str = "auth/internal-error";

/// Persisted sign-in state (`identity.json`).
///
/// The id outlives sign-out so the same local profile keeps its claimed
/// username across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedIdentity {
    id: String,
    signed_in: bool,
}

/// Identity provider backed by the profile configured in `config.toml`.
#[derive(Debug)]
pub struct LocalProfileProvider {
    profile: IdentityConfig,
    state_path: PathBuf,
    current: watch::Sender<Option<UserIdentity>>,
}

impl LocalProfileProvider {
    /// Creates the provider, restoring a previous sign-in from `state_path`.
    ///
    /// An unreadable state file is logged and treated as signed out.
    pub fn new(profile: IdentityConfig, state_path: impl Into<PathBuf>) -> Self {
        let state_path = state_path.into();
        let restored = match load_state(&state_path) {
            Ok(Some(state)) if state.signed_in => identity_for(&profile, &state.id),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable identity state");
                None
            }
        };
        let (current, _) = watch::channel(restored);
        Self {
            profile,
            state_path,
            current,
        }
    }

    /// Currently signed-in identity, if any.
    pub fn current(&self) -> Option<UserIdentity> {
        self.current.borrow().clone()
    }
}

fn identity_for(profile: &IdentityConfig, id: &str) -> Option<UserIdentity> {
    let display_name = profile.display_name.as_deref()?.trim();
    if display_name.is_empty() || id.is_empty() {
        return None;
    }
    Some(UserIdentity {
        id: id.to_string(),
        display_name: display_name.to_string(),
        avatar_url: profile.avatar_url.clone().unwrap_or_default(),
    })
}

fn load_state(path: &Path) -> Result<Option<PersistedIdentity>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read identity state from {}", path.display()))?;
    let state = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse identity state from {}", path.display()))?;
    Ok(Some(state))
}

fn save_state(path: &Path, state: &PersistedIdentity) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(state)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write identity state to {}", path.display()))
}

fn internal(err: &anyhow::Error) -> AuthError {
    AuthError::new(CODE_INTERNAL, format!("{err:#}"))
}

#[async_trait]
impl IdentityProvider for LocalProfileProvider {
    fn label(&self) -> &str {
        "Local Profile"
    }

    async fn sign_in_with_popup(&self) -> Result<UserIdentity, AuthError> {
        let has_name = self
            .profile
            .display_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_name {
            return Err(AuthError::new(
                CODE_NOT_ALLOWED,
                "No local profile configured. Set [identity] display_name in config.toml.",
            ));
        }

        let mut state = load_state(&self.state_path)
            .map_err(|e| internal(&e))?
            .unwrap_or_default();
        if let Some(id) = self.profile.id.as_deref().filter(|id| !id.is_empty()) {
            state.id = id.to_string();
        } else if state.id.is_empty() {
            state.id = uuid::Uuid::new_v4().to_string();
        }
        state.signed_in = true;
        save_state(&self.state_path, &state).map_err(|e| internal(&e))?;

        let identity = identity_for(&self.profile, &state.id).ok_or_else(|| {
            AuthError::new(CODE_NOT_ALLOWED, "Local profile is missing a display name.")
        })?;
        tracing::info!(user_id = %identity.id, "signed in");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(mut state) = load_state(&self.state_path).map_err(|e| internal(&e))? {
            state.signed_in = false;
            save_state(&self.state_path, &state).map_err(|e| internal(&e))?;
        }
        tracing::info!("signed out");
        self.current.send_replace(None);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Option<UserIdentity>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn profile(name: Option<&str>) -> IdentityConfig {
        IdentityConfig {
            id: None,
            display_name: name.map(str::to_string),
            avatar_url: Some("https://example.com/ada.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sign_in_requires_display_name() {
        let dir = tempdir().unwrap();
        let provider = LocalProfileProvider::new(profile(None), dir.path().join("identity.json"));

        let err = provider.sign_in_with_popup().await.unwrap_err();
        assert_eq!(err.code, CODE_NOT_ALLOWED);
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_is_restored_and_id_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let provider = LocalProfileProvider::new(profile(Some("Ada")), &path);
        let mut rx = provider.watch();
        let first = provider.sign_in_with_popup().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&first));
        assert_eq!(first.display_name, "Ada");

        let restored = LocalProfileProvider::new(profile(Some("Ada")), &path);
        assert_eq!(restored.current(), Some(first.clone()));

        restored.sign_out().await.unwrap();
        assert!(restored.current().is_none());
        let after = LocalProfileProvider::new(profile(Some("Ada")), &path);
        assert!(after.current().is_none());

        let again = after.sign_in_with_popup().await.unwrap();
        assert_eq!(again.id, first.id);
    }

    #[tokio::test]
    async fn test_configured_id_wins() {
        let dir = tempdir().unwrap();
        let mut config = profile(Some("Ada"));
        config.id = Some("ada-1".to_string());
        let provider = LocalProfileProvider::new(config, dir.path().join("identity.json"));

        let identity = provider.sign_in_with_popup().await.unwrap();
        assert_eq!(identity.id, "ada-1");
    }
}
