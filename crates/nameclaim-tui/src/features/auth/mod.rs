//! Sign-in and sign-out controls.

mod render;
mod update;

pub use render::{render_sign_in_page, render_sign_out_page};
pub use update::{handle_sign_in_result, handle_sign_out_result, sign_in, sign_out};

/// State of the provider controls.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    /// Provider name shown on the sign-in button.
    pub provider_label: String,
    /// An interactive sign-in is running.
    pub sign_in_pending: bool,
    /// A sign-out is running.
    pub sign_out_pending: bool,
}

impl AuthState {
    pub fn new(provider_label: impl Into<String>) -> Self {
        Self {
            provider_label: provider_label.into(),
            ..Self::default()
        }
    }
}
