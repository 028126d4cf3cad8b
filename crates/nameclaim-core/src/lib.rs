//! Core domain for nameclaim: identity, document store, session and username claims.

pub mod checker;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod session;
pub mod store;
pub mod username;
