//! Username form: input validation, availability feedback and the claim.

mod render;
mod state;
mod update;

pub use render::render_username_form;
pub use state::{HelperText, UsernameFormState};
pub use update::{handle_check_result, handle_claim_result, handle_input, handle_key, submit};
