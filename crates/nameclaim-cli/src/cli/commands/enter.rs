//! Interactive enter page.

use anyhow::Result;

use crate::cli::Services;

#[cfg(feature = "tui")]
pub async fn run(services: Services) -> Result<()> {
    use std::sync::Arc;

    use nameclaim_core::identity::IdentityProvider;

    let Services {
        config,
        provider,
        store,
    } = services;
    let provider: Arc<dyn IdentityProvider> = provider;
    nameclaim_tui::run_enter_page(config, provider, store).await
}

#[cfg(not(feature = "tui"))]
#[allow(clippy::unused_async)]
pub async fn run(_services: Services) -> Result<()> {
    anyhow::bail!(
        "nameclaim was built without the `tui` feature.\n\
         Use `nameclaim login`, `nameclaim check` or `nameclaim claim` instead."
    )
}
