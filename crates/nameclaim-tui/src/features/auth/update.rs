//! Auth feature reducer.

use nameclaim_core::error::AuthError;
use nameclaim_core::identity::UserIdentity;

use super::AuthState;
use crate::effects::UiEffect;
use crate::features::toast::ToastState;

/// Starts an interactive sign-in unless one is already running.
pub fn sign_in(auth: &mut AuthState) -> Vec<UiEffect> {
    if auth.sign_in_pending {
        return vec![];
    }
    auth.sign_in_pending = true;
    vec![UiEffect::SignIn]
}

pub fn sign_out(auth: &mut AuthState) -> Vec<UiEffect> {
    if auth.sign_out_pending {
        return vec![];
    }
    auth.sign_out_pending = true;
    vec![UiEffect::SignOut]
}

/// Success needs no local action: the session context reports the new
/// identity. Failures surface the provider message as a toast.
pub fn handle_sign_in_result(
    auth: &mut AuthState,
    toasts: &mut ToastState,
    result: Result<UserIdentity, AuthError>,
) {
    auth.sign_in_pending = false;
    match result {
        Ok(identity) => {
            tracing::debug!(user_id = %identity.id, "sign-in completed");
        }
        Err(err) => {
            tracing::warn!(code = %err.code, "sign-in failed");
            toasts.error(err.message);
        }
    }
}

/// Sign-out failures are not actionable for the user; they are only logged.
pub fn handle_sign_out_result(auth: &mut AuthState, result: Result<(), AuthError>) {
    auth.sign_out_pending = false;
    if let Err(err) = result {
        tracing::warn!(code = %err.code, message = %err.message, "sign-out failed");
    }
}
