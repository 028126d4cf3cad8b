//! Full-screen enter page: sign in, claim a username, sign out.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod page;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};
use std::sync::Arc;

use anyhow::Result;
pub use features::{auth, toast, username};
use nameclaim_core::config::Config;
use nameclaim_core::identity::IdentityProvider;
use nameclaim_core::session::SessionContext;
use nameclaim_core::store::DocumentStore;
pub use page::Page;
pub use runtime::TuiRuntime;

/// Runs the enter page until the user quits.
///
/// Must be called from a multi-threaded tokio runtime: the event loop blocks
/// its worker while lookups and provider calls run on the others.
///
/// # Errors
/// Returns an error if stdout is not a terminal or the terminal fails.
pub async fn run_enter_page(
    config: Config,
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The enter page requires a terminal.\n\
             Use `nameclaim login`, `nameclaim check` or `nameclaim claim` instead."
        );
    }

    let session = SessionContext::spawn(Arc::clone(&provider), Arc::clone(&store)).await;
    tracing::info!(provider = provider.label(), "starting enter page");

    tokio::task::block_in_place(|| {
        let mut runtime = TuiRuntime::new(config, provider, store, &session)?;
        runtime.run()
    })
}
