//! Sign-in, sign-out and session commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use nameclaim_core::identity::IdentityProvider;
use nameclaim_core::session::SessionContext;

use crate::cli::Services;

pub async fn login(services: &Services) -> Result<()> {
    let identity = services
        .provider
        .sign_in_with_popup()
        .await
        .context("sign in")?;
    println!("Signed in as {} ({})", identity.display_name, identity.id);
    Ok(())
}

pub async fn logout(services: &Services) -> Result<()> {
    services.provider.sign_out().await.context("sign out")?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(services: &Services, json: bool) -> Result<()> {
    let session = SessionContext::spawn(
        Arc::clone(&services.provider) as Arc<dyn IdentityProvider>,
        Arc::clone(&services.store),
    )
    .await
    .current();

    if json {
        let value = serde_json::json!({
            "signedIn": session.identity.is_some(),
            "identity": session.identity,
            "username": session.claimed_username,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let Some(identity) = &session.identity else {
        println!("Not signed in");
        return Ok(());
    };
    println!("{} ({})", identity.display_name, identity.id);
    match &session.claimed_username {
        Some(username) => println!("username: @{username}"),
        None => println!("username: (none)"),
    }
    Ok(())
}
