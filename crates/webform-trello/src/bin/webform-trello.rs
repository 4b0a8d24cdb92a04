//! webform-trello - service and CLI for creating Trello cards from form
//! submissions.
//!
//! # Environment Variables
//!
//! - `WEBFORM_TRELLO_PORT` - HTTP port for `serve` (default 8080)
//! - `WEBFORM_TRELLO_CONFIG_DIR` - directory of stored settings (default `./config`)
//! - `TRELLO_API_URL` - Trello API base URL
//! - `TRELLO_API_KEY` / `TRELLO_TOKEN` - override the stored credentials (all commands but `serve`)
//! - `LOG_FORMAT` - `json` for JSON logs
//!
//! # Examples
//!
//! ```bash
//! # Run the HTTP service
//! webform-trello serve
//!
//! # Check a key/token pair
//! webform-trello check-auth --api-key KEY --token TOKEN
//!
//! # Browse boards and lists
//! webform-trello boards
//! webform-trello lists 5f1a...
//!
//! # Create a card by hand
//! webform-trello create-card 5f1b... "Bug report" --desc "Steps..." --labels L1,L2
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trello::{
    board_label_options, board_list_options, board_member_options, board_options,
    CardPosition, CredentialProvider, Credentials, NewCard, Options, TrelloApi, TrelloClient,
};
use webform_trello::{server, Config, FileConfigStore, SettingsRepository};

/// Create Trello cards from web form submissions.
#[derive(Parser)]
#[command(name = "webform-trello")]
#[command(about = "Create Trello cards from web form submissions")]
#[command(version)]
struct Cli {
    /// Directory holding stored settings (or set `WEBFORM_TRELLO_CONFIG_DIR`)
    #[arg(long, env = "WEBFORM_TRELLO_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Trello API base URL (or set `TRELLO_API_URL`)
    #[arg(long, env = "TRELLO_API_URL")]
    api_url: Option<String>,

    /// Trello API key, overrides the stored one
    #[arg(long, env = "TRELLO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Trello token, overrides the stored one
    #[arg(long, env = "TRELLO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port to listen on (or set `WEBFORM_TRELLO_PORT`)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Check that the key and token are accepted by Trello
    CheckAuth,

    /// List the boards of the token's member
    Boards,

    /// List the lists of a board
    Lists {
        /// Board ID
        board: String,
    },

    /// List the labels of a board
    Labels {
        /// Board ID
        board: String,
    },

    /// List the members of a board
    Members {
        /// Board ID
        board: String,
    },

    /// Create a card in a list
    CreateCard {
        /// List ID
        list: String,

        /// Card title
        name: String,

        /// Card description
        #[arg(long, default_value = "")]
        desc: String,

        /// Position in the list (top or bottom)
        #[arg(long, default_value = "top")]
        position: CardPosition,

        /// Comma-separated label IDs
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Comma-separated member IDs
        #[arg(long, value_delimiter = ',')]
        members: Vec<String>,
    },
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("webform_trello=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
    Ok(())
}

fn print_options(options: &Options) {
    if options.is_empty() {
        println!("(none)");
    }
    for (id, name) in options.iter() {
        println!("{id}\t{name}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::default();
    if let Some(dir) = cli.config_dir {
        config.config_dir = dir;
    }
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    init_tracing(config.json_logs)?;

    let settings = SettingsRepository::new(Arc::new(FileConfigStore::new(&config.config_dir)));
    let overrides = Credentials::new(
        cli.api_key.unwrap_or_default(),
        cli.token.unwrap_or_default(),
    );
    let credentials: Arc<dyn CredentialProvider> = if overrides.is_complete() {
        Arc::new(overrides)
    } else {
        Arc::new(settings)
    };

    let client = TrelloClient::with_url(credentials.clone(), &config.api_url)
        .context("Failed to create Trello client")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(&config).await?;
        }

        Commands::CheckAuth => {
            let creds = credentials.credentials().await;
            if !creds.is_complete() {
                warn!("No credentials configured; pass --api-key and --token or save settings first");
            }
            if client.check_authorization(&creds.key, &creds.token).await {
                let me = client.get_me().await?;
                println!("Authorized as {} ({})", me.full_name, me.username);
            } else {
                anyhow::bail!("Trello rejected the key/token pair");
            }
        }

        Commands::Boards => print_options(&board_options(&client).await?),

        Commands::Lists { board } => print_options(&board_list_options(&client, &board).await?),

        Commands::Labels { board } => {
            print_options(&board_label_options(&client, &board).await?);
        }

        Commands::Members { board } => {
            print_options(&board_member_options(&client, &board).await?);
        }

        Commands::CreateCard {
            list,
            name,
            desc,
            position,
            labels,
            members,
        } => {
            let card = NewCard::new(name, desc)
                .with_position(position)
                .with_labels(labels)
                .with_members(members);
            let created = client
                .create_card(&list, &card)
                .await
                .context("Failed to create card")?;
            println!(
                "Created card {} {}",
                created.id,
                created.short_url.unwrap_or_default()
            );
        }
    }

    Ok(())
}

async fn serve(config: &Config) -> Result<()> {
    info!("Starting webform-trello service...");

    // Build application state
    let state = server::AppState::from_config(config).context("Failed to build Trello client")?;
    info!(
        config_dir = %config.config_dir.display(),
        api_url = %config.api_url,
        "Config store ready"
    );

    // Build router
    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "webform-trello service listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
