//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

use nameclaim_core::identity::UserIdentity;

use crate::common::RequestId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Run the provider's interactive sign-in.
    SignIn,

    /// Sign the current user out.
    SignOut,

    /// Debounce, then look up `usernames/{candidate}`.
    ScheduleUsernameCheck {
        request: RequestId,
        candidate: String,
    },

    /// Drop the pending lookup, if it has not fired yet.
    CancelUsernameCheck,

    /// Write the user profile and username reservation as one batch.
    ClaimUsername {
        request: RequestId,
        identity: UserIdentity,
        username: String,
    },
}
