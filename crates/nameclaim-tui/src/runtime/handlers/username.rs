//! Availability lookup and claim handlers.

use std::sync::Arc;

use nameclaim_core::checker::AvailabilityChecker;
use nameclaim_core::identity::UserIdentity;
use nameclaim_core::store::DocumentStore;
use nameclaim_core::username;

use crate::common::RequestId;
use crate::events::UiEvent;
use crate::runtime::inbox::UiEventSender;

/// Hands `candidate` to the debounced checker; the result lands in the inbox
/// tagged with `request`.
pub fn schedule_username_check(
    checker: &mut AvailabilityChecker,
    inbox: &UiEventSender,
    request: RequestId,
    candidate: String,
) {
    let tx = inbox.clone();
    checker.check(candidate, move |candidate, result| {
        let _ = tx.send(UiEvent::UsernameChecked {
            request,
            candidate,
            result,
        });
    });
}

pub async fn claim_username(
    store: Arc<dyn DocumentStore>,
    request: RequestId,
    identity: UserIdentity,
    username: String,
) -> UiEvent {
    let result = username::claim(store.as_ref(), &identity, &username).await;
    UiEvent::ClaimFinished {
        request,
        username,
        result,
    }
}
