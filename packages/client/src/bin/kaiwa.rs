//! Kaiwa terminal chat client.
//!
//! Accounts are managed with one-shot subcommands; `chat` (the default) opens
//! the interactive session. The auth token is kept in a local storage file
//! between runs. With `--ephemeral` nothing is kept, so `login` and `signup`
//! go straight into the chat and `chat` asks for credentials.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kaiwa -- signup --name alice --email alice@example.com
//! cargo run --bin kaiwa -- login --email alice@example.com
//! cargo run --bin kaiwa
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kaiwa_client::{
    client::{ChatContext, account, run_chat},
    config::{ClientConfig, DEFAULT_API_URL, DEFAULT_SOCKET_URL, StorageMode},
    error::ClientError,
};
use kaiwa_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kaiwa")]
#[command(about = "Terminal chat client with realtime rooms", long_about = None)]
struct Args {
    /// Base URL of the REST API
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// WebSocket URL of the push channel
    #[arg(long, global = true, default_value = DEFAULT_SOCKET_URL)]
    socket_url: String,

    /// Token storage file (default: ~/.kaiwa/storage.json)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Keep the token in memory only
    #[arg(long, global = true, conflicts_with = "storage")]
    ephemeral: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the token
    Login {
        #[arg(long)]
        email: String,
        /// Prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and store the token
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Prompted twice when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Log out and forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Open the interactive chat (default)
    Chat,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let storage = if self.ephemeral {
            StorageMode::Memory
        } else if let Some(path) = &self.storage {
            StorageMode::File(path.clone())
        } else {
            defaults.storage
        };
        ClientConfig {
            api_url: self.api_url.clone(),
            socket_url: self.socket_url.clone(),
            storage,
        }
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let ctx = ChatContext::new(&args.client_config());

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Login { email, password } => {
            account::login(&ctx, &email, password).await?;
            chat_if_ephemeral(&ctx).await
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            account::signup(&ctx, &name, &email, password).await?;
            chat_if_ephemeral(&ctx).await
        }
        Commands::Logout => account::logout(&ctx).await,
        Commands::Whoami => account::whoami(&ctx).await,
        Commands::Chat => run_chat(&ctx).await.map(|_| ()),
    }
}

/// A memory-only token would be lost on exit, so use it right away
async fn chat_if_ephemeral(ctx: &ChatContext) -> Result<(), ClientError> {
    if ctx.is_ephemeral() {
        run_chat(ctx).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(args).await {
        tracing::error!("Client error: {}", e);
        if matches!(e, ClientError::NotAuthenticated | ClientError::Unauthorized) {
            eprintln!("Run `kaiwa login --email <email>` first.");
        }
        std::process::exit(1);
    }
}
