//! Identity provider handlers.

use std::sync::Arc;

use nameclaim_core::identity::IdentityProvider;

use crate::events::UiEvent;

pub async fn sign_in(provider: Arc<dyn IdentityProvider>) -> UiEvent {
    UiEvent::SignInFinished(provider.sign_in_with_popup().await)
}

pub async fn sign_out(provider: Arc<dyn IdentityProvider>) -> UiEvent {
    UiEvent::SignOutFinished(provider.sign_out().await)
}
