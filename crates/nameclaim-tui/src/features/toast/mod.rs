//! Transient, dismissible notifications shown at the top of the screen.

mod render;
mod state;

pub use render::render_toasts;
pub use state::{Toast, ToastKind, ToastState};
