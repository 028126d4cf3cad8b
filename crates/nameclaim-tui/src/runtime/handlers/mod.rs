//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return `UiEvent`. The runtime uses
//! `spawn_effect` to spawn them and send results to the inbox. They never
//! mutate state directly.

pub mod auth;
pub mod username;

pub use auth::*;
pub use username::*;
