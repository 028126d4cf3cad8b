//! Headless username checks and claims.

use anyhow::{Context, Result};
use nameclaim_core::username::{self, Availability, Candidate, MAX_LEN, MIN_LEN};

use crate::cli::Services;

/// Validates `raw` the way the form does and returns the normalized name.
fn validated(raw: &str) -> Result<String> {
    let candidate = username::normalize(raw.trim());
    match username::classify(&candidate) {
        Candidate::Acceptable => Ok(candidate),
        Candidate::TooShort => {
            anyhow::bail!("Username must be at least {MIN_LEN} characters.")
        }
        Candidate::Rejected => anyhow::bail!(
            "'{candidate}' is not a valid username: use {MIN_LEN}-{MAX_LEN} letters, digits, \
             '.' or '_', not starting or ending with a separator and never two in a row."
        ),
    }
}

pub async fn check(services: &Services, raw: &str) -> Result<()> {
    let candidate = validated(raw)?;
    match username::lookup(services.store.as_ref(), &candidate)
        .await
        .context("look up username")?
    {
        Availability::Available => {
            println!("'{candidate}' is available");
            Ok(())
        }
        Availability::Taken => anyhow::bail!("Username is taken, try a different username."),
    }
}

pub async fn claim(services: &Services, raw: &str) -> Result<()> {
    let Some(identity) = services.provider.current() else {
        anyhow::bail!("Not signed in. Run `nameclaim login` first.");
    };
    let store = services.store.as_ref();

    if let Some(existing) = username::claimed_by(store, &identity.id)
        .await
        .context("read claimed username")?
    {
        anyhow::bail!("You already claimed '@{existing}'.");
    }

    let candidate = validated(raw)?;
    let availability = username::lookup(store, &candidate)
        .await
        .context("look up username")?;
    if availability == Availability::Taken {
        anyhow::bail!("Username is taken, try a different username.");
    }

    match username::claim(store, &identity, &candidate).await {
        Ok(()) => {
            println!("Claimed '@{candidate}'");
            Ok(())
        }
        Err(err) if err.is_conflict() => {
            anyhow::bail!("Username is taken, try a different username.")
        }
        Err(err) => Err(err).context("claim username"),
    }
}
