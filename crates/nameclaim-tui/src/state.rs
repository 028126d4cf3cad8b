//! Application state for the enter page.
//!
//! ```text
//! AppState
//! ├── session: Session            (latest value from the session context)
//! ├── page: Page                  (derived from session)
//! ├── form: UsernameFormState     (reset on every remount of the form)
//! ├── lookups / claims: LatestOnly (request tokens, never reset)
//! ├── auth: AuthState             (sign-in/out controls)
//! └── toasts: ToastState          (notifications)
//! ```

use nameclaim_core::config::Config;
use nameclaim_core::session::Session;

use crate::auth::AuthState;
use crate::common::LatestOnly;
use crate::page::Page;
use crate::toast::ToastState;
use crate::username::UsernameFormState;

/// Spinner frames for pending operations.
pub const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub config: Config,
    pub session: Session,
    pub page: Page,
    pub form: UsernameFormState,
    /// Availability lookups; outlives form remounts so old results stay stale.
    pub lookups: LatestOnly,
    /// Claim writes.
    pub claims: LatestOnly,
    pub auth: AuthState,
    pub toasts: ToastState,
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(config: Config, provider_label: impl Into<String>, session: Session) -> Self {
        let toasts = ToastState::new(config.toast_lifetime());
        Self {
            should_quit: false,
            page: Page::compose(&session),
            session,
            config,
            form: UsernameFormState::default(),
            lookups: LatestOnly::default(),
            claims: LatestOnly::default(),
            auth: AuthState::new(provider_label),
            toasts,
            spinner_frame: 0,
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }
}
