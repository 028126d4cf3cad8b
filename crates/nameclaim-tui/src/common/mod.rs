//! Shared helpers for TUI features.

pub mod render_utils;
pub mod request;
pub mod text;

pub use request::{LatestOnly, RequestId};
pub use text::truncate_with_ellipsis;
