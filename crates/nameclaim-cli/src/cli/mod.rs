//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nameclaim_core::config::{self, Config};
use nameclaim_core::identity::LocalProfileProvider;
use nameclaim_core::logging;
use nameclaim_core::store::{DocumentStore, JsonFileStore, MemoryStore};

mod commands;

#[derive(Parser)]
#[command(name = "nameclaim")]
#[command(version)]
#[command(about = "Sign in and claim a unique username")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Keep documents in memory instead of the store file
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check whether a username is valid and still available
    Check {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
    /// Claim a username for the signed-in user
    Claim {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
    /// Sign in with the local profile from config.toml
    Login,
    /// Sign out
    Logout,
    /// Show the signed-in user and their username
    Whoami {
        /// Print the session as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

/// Collaborators shared by the commands.
pub struct Services {
    pub config: Config,
    pub provider: Arc<LocalProfileProvider>,
    pub store: Arc<dyn DocumentStore>,
}

impl Services {
    fn open(config: Config, ephemeral: bool) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            let path = config.store_path();
            Arc::new(
                JsonFileStore::open(&path)
                    .with_context(|| format!("open store at {}", path.display()))?,
            )
        };
        let provider = Arc::new(LocalProfileProvider::new(
            config.identity.clone(),
            config::paths::identity_state_path(),
        ));
        Ok(Self {
            config,
            provider,
            store,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("load config")?;
    let _log_guard = match logging::init(&config.log, &config::paths::logs_dir()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli, config).await })
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let Cli { command, ephemeral } = cli;
    tracing::debug!(ephemeral, store = %config.store_path().display(), "starting");
    let open = move || Services::open(config, ephemeral);

    // default to the enter page
    let Some(command) = command else {
        return commands::enter::run(open()?).await;
    };

    match command {
        Commands::Check { username } => commands::username::check(&open()?, &username).await,
        Commands::Claim { username } => commands::username::claim(&open()?, &username).await,
        Commands::Login => commands::auth::login(&open()?).await,
        Commands::Logout => commands::auth::logout(&open()?).await,
        Commands::Whoami { json } => commands::auth::whoami(&open()?, json).await,
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
