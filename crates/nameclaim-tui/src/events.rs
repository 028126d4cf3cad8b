//! UI events consumed by the reducer.
//!
//! Terminal input, timer ticks, session changes and the results of effects
//! spawned by the runtime all arrive here as `UiEvent`s.

use crossterm::event::Event;
use nameclaim_core::error::{AuthError, StoreError};
use nameclaim_core::identity::UserIdentity;
use nameclaim_core::session::Session;
use nameclaim_core::username::Availability;

use crate::common::RequestId;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner, toast expiry).
    Tick,

    /// Raw terminal input.
    Terminal(Event),

    /// The session context published a new value.
    SessionChanged(Session),

    /// Interactive sign-in finished.
    SignInFinished(Result<UserIdentity, AuthError>),

    /// Sign-out finished.
    SignOutFinished(Result<(), AuthError>),

    /// A debounced availability lookup landed.
    UsernameChecked {
        request: RequestId,
        candidate: String,
        result: Result<Availability, StoreError>,
    },

    /// The claim batch write finished.
    ClaimFinished {
        request: RequestId,
        username: String,
        result: Result<(), StoreError>,
    },
}
