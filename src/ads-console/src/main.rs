//! Ads console: manage campaigns, ad sets, creatives and ads from the shell.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ads_client::{ApiClient, FileSessionStore, SessionHandle};
use ads_core::config::{AppConfig, CascadeMode};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::commands::{
    AdCreativeFields, AdFields, AdSetFields, CampaignFields, Console, EntityFields,
};
use ads_core::types::{EntityId, EntityKind};

#[derive(Parser, Debug)]
#[command(name = "ads-console")]
#[command(about = "Manage campaigns, ad sets, creatives and ads")]
#[command(version)]
struct Cli {
    /// API base URL (overrides config)
    #[arg(long, global = true, env = "ADS_CONSOLE__API__BASE_URL")]
    api_url: Option<String>,

    /// Where the login session is kept (overrides config)
    #[arg(long, global = true, env = "ADS_CONSOLE__SESSION__PATH")]
    session_file: Option<PathBuf>,

    /// How deletes cascade: server or client (overrides config)
    #[arg(long, global = true)]
    cascade: Option<CascadeMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account
    Register(CredentialArgs),

    /// Log in and keep the session for later commands
    Login(CredentialArgs),

    /// Forget the stored session
    Logout,

    /// Show all four lists
    Dashboard,

    /// Manage campaigns
    Campaigns {
        #[command(subcommand)]
        action: EntityAction<CampaignFields>,
    },

    /// Manage ad sets
    AdSets {
        #[command(subcommand)]
        action: EntityAction<AdSetFields>,
    },

    /// Manage ad creatives
    Creatives {
        #[command(subcommand)]
        action: EntityAction<AdCreativeFields>,
    },

    /// Manage ads
    Ads {
        #[command(subcommand)]
        action: EntityAction<AdFields>,
    },
}

#[derive(Subcommand, Debug)]
enum EntityAction<F: Args> {
    /// List everything of this kind
    List,

    /// Create a new one
    Create {
        #[command(flatten)]
        fields: F,
    },

    /// Edit an existing one; omitted fields keep their current value
    Edit {
        id: EntityId,

        #[command(flatten)]
        fields: F,
    },

    /// Delete one, cascading to its dependents
    Delete {
        id: EntityId,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

/// Exit status when the command needs a (new) login.
const EXIT_LOGIN_REQUIRED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ads_console=warn".into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if commands::needs_login(&e) {
                ExitCode::from(EXIT_LOGIN_REQUIRED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session.path = path;
    }
    if let Some(mode) = cli.cascade {
        config.delete.cascade = mode;
    }
    config.validate()?;
    debug!(base_url = %config.api.base_url, cascade = %config.delete.cascade, "Configuration loaded");

    let session = SessionHandle::new(Arc::new(FileSessionStore::new(&config.session.path)))?;
    let client = ApiClient::new(&config.api.base_url, session)?;
    let console = Console::new(client, config.delete.cascade);

    match cli.command {
        Commands::Register(args) => console.register(&args.email, &args.password).await,
        Commands::Login(args) => console.login(&args.email, &args.password).await,
        Commands::Logout => {
            console.logout();
            Ok(())
        }
        Commands::Dashboard => console.dashboard().await,
        Commands::Campaigns { action } => dispatch(&console, EntityKind::Campaign, action).await,
        Commands::AdSets { action } => dispatch(&console, EntityKind::AdSet, action).await,
        Commands::Creatives { action } => dispatch(&console, EntityKind::AdCreative, action).await,
        Commands::Ads { action } => dispatch(&console, EntityKind::Ad, action).await,
    }
}

async fn dispatch<F>(console: &Console, kind: EntityKind, action: EntityAction<F>) -> anyhow::Result<()>
where
    F: Args + EntityFields,
{
    match action {
        EntityAction::List => console.list(kind).await,
        EntityAction::Create { fields } => console.create(&fields).await,
        EntityAction::Edit { id, fields } => console.edit(id, &fields).await,
        EntityAction::Delete { id, yes } => console.delete(kind, id, yes).await,
    }
}
