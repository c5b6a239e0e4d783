//! CartChat CLI - terminal front end for the shopping assistant.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cartchat_client::{ClientConfig, HttpSearchClient};
use cartchat_session::{ConversationStore, StoreConfig, StoreEvent};

mod commands;
mod render;
mod repl;

const DEFAULT_LOG_FILTER: &str = "cartchat=info,cartchat_session=info,cartchat_client=info";

/// CartChat - grocery shopping assistant in the terminal
#[derive(Parser)]
#[command(name = "cartchat")]
#[command(about = "Chat with the CartChat shopping assistant", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CARTCHAT_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Backend request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Delay before local assistant follow-ups, in milliseconds
    #[arg(long, default_value = "2000")]
    follow_up_ms: u64,

    /// Log file
    #[arg(long, default_value = "cartchat.log")]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (default)
    Chat,

    /// Ask one question and print the reply
    Ask {
        /// Question for the assistant
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Log to a file so the transcript stays readable
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let client_config = ClientConfig {
        base_url: cli.api_url,
        timeout_secs: cli.timeout_secs,
    };
    let store_config = StoreConfig {
        follow_up_delay: Duration::from_millis(cli.follow_up_ms),
    };

    info!(api_url = %client_config.base_url, "Starting CartChat");

    let backend = Arc::new(HttpSearchClient::with_config(&client_config)?);
    let (store, events) = ConversationStore::new(backend, store_config);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => repl::run(store, events).await?,
        Commands::Ask { text } => ask(store, events, &text).await,
    }

    info!("CartChat stopped");
    Ok(())
}

async fn ask(
    store: ConversationStore,
    mut events: tokio::sync::mpsc::UnboundedReceiver<StoreEvent>,
    text: &str,
) {
    if store.submit(text).await.is_none() {
        eprintln!("Nada para enviar.");
        return;
    }

    while let Ok(event) = events.try_recv() {
        if let StoreEvent::Alert { title, body } = event {
            eprintln!("{}: {}", title, body);
        }
    }

    if let Some(reply) = render::last_message(&store.snapshot().await) {
        println!("{}", reply);
    }
}
