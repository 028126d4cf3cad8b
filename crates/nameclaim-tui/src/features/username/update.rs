//! Username form reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nameclaim_core::error::StoreError;
use nameclaim_core::identity::UserIdentity;
use nameclaim_core::username::{self, Availability, Candidate};

use super::UsernameFormState;
use crate::common::{LatestOnly, RequestId};
use crate::effects::UiEffect;
use crate::features::toast::ToastState;

/// Applies a new raw field value.
///
/// The value is lowercased first. Short values are accepted without a lookup,
/// values matching the username pattern schedule a debounced lookup, and
/// anything else is dropped, leaving the previous value in place.
pub fn handle_input(
    form: &mut UsernameFormState,
    lookups: &mut LatestOnly,
    raw: &str,
) -> Vec<UiEffect> {
    let candidate = username::normalize(raw);
    match username::classify(&candidate) {
        Candidate::TooShort => {
            form.candidate = candidate;
            form.is_loading = false;
            form.is_valid = false;
            lookups.cancel();
            vec![UiEffect::CancelUsernameCheck]
        }
        Candidate::Acceptable => {
            form.candidate.clone_from(&candidate);
            form.is_loading = true;
            form.is_valid = false;
            let request = lookups.begin();
            vec![UiEffect::ScheduleUsernameCheck { request, candidate }]
        }
        Candidate::Rejected => vec![],
    }
}

/// Applies a lookup result if it still belongs to the current candidate.
pub fn handle_check_result(
    form: &mut UsernameFormState,
    lookups: &mut LatestOnly,
    request: RequestId,
    candidate: &str,
    result: Result<Availability, StoreError>,
) {
    if !lookups.finish_if_active(request) || form.candidate != candidate {
        tracing::debug!(candidate, "dropping stale availability result");
        return;
    }

    form.is_loading = false;
    match result {
        Ok(availability) => form.is_valid = availability.is_available(),
        Err(err) => {
            form.is_valid = false;
            tracing::warn!(candidate, error = %err, "availability lookup failed");
        }
    }
}

/// Starts the claim write when the form allows it.
pub fn submit(
    form: &mut UsernameFormState,
    claims: &mut LatestOnly,
    identity: Option<&UserIdentity>,
) -> Vec<UiEffect> {
    if !form.can_submit() {
        return vec![];
    }
    let Some(identity) = identity else {
        return vec![];
    };

    form.is_submitting = true;
    let request = claims.begin();
    vec![UiEffect::ClaimUsername {
        request,
        identity: identity.clone(),
        username: form.candidate.clone(),
    }]
}

/// Leaves the submitting state whatever the outcome.
///
/// The page switch after a successful claim is driven by the session, which
/// may lag (or fail to re-read the store); the claimed name is marked
/// unavailable so it cannot be submitted a second time meanwhile.
pub fn handle_claim_result(
    form: &mut UsernameFormState,
    claims: &mut LatestOnly,
    toasts: &mut ToastState,
    request: RequestId,
    username: &str,
    result: Result<(), StoreError>,
) {
    if !claims.finish_if_active(request) {
        return;
    }
    form.is_submitting = false;

    let Err(err) = result else {
        if form.candidate == username {
            form.is_valid = false;
        }
        toasts.info(format!("'{username}' is now yours."));
        return;
    };

    tracing::warn!(username, error = %err, "claim failed");
    if err.is_conflict() {
        if form.candidate == username {
            form.is_valid = false;
        }
        toasts.error(format!("'{username}' was just taken by someone else."));
    } else {
        toasts.error(format!("Could not claim '{username}': {err}"));
    }
}

/// Key handling while the form page is shown.
pub fn handle_key(
    form: &mut UsernameFormState,
    lookups: &mut LatestOnly,
    claims: &mut LatestOnly,
    identity: Option<&UserIdentity>,
    key: KeyEvent,
) -> Vec<UiEffect> {
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Enter => submit(form, claims, identity),
        _ if form.is_submitting => vec![],
        KeyCode::Char(c) if plain => {
            let mut raw = form.candidate.clone();
            raw.push(c);
            handle_input(form, lookups, &raw)
        }
        KeyCode::Backspace => {
            let mut raw = form.candidate.clone();
            raw.pop();
            handle_input(form, lookups, &raw)
        }
        _ => vec![],
    }
}
