use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

mod app;
mod client;
mod config;
mod controller;
mod conversation;
mod ui;

use crate::app::App;
use crate::client::QueryClient;
use crate::config::Config;
use crate::controller::ConversationController;
use crate::conversation::Origin;

#[derive(Parser)]
#[command(name = "parley")]
#[command(version = "0.1.0")]
#[command(about = "Terminal chat client for an AI assistant backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and PARLEY_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single question and print the reply
    Ask { message: Vec<String> },
    /// Check whether the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }

    init_logging(&config)?;

    let client = QueryClient::with_timeout(
        config.api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );

    match cli.command {
        None => {
            let controller = ConversationController::new(Arc::new(client));
            App::new(controller, config).run().await
        }
        Some(Commands::Ask { message }) => ask(client, message.join(" ")).await,
        Some(Commands::Health) => health(client).await,
    }
}

/// One-shot query: run a single submission cycle and print the outcome
async fn ask(client: QueryClient, message: String) -> Result<()> {
    let mut controller = ConversationController::new(Arc::new(client));
    controller.set_input(message);

    if !controller.submit() {
        anyhow::bail!("Nothing to ask. Provide a non-empty message.");
    }
    controller.resolve_pending().await;

    let reply = controller
        .conversation()
        .messages()
        .iter()
        .rev()
        .find(|m| m.origin == Origin::Agent)
        .context("No reply received")?;

    if reply.is_error {
        eprintln!("{}", reply.text);
        std::process::exit(1);
    }

    println!("{}", reply.text);
    Ok(())
}

async fn health(client: QueryClient) -> Result<()> {
    match client.health().await {
        Ok(()) => {
            println!("✅ Backend is healthy at {}", client.base_url());
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {}", err.user_message());
            std::process::exit(1);
        }
    }
}

/// Route tracing to a file so it never fights the terminal UI
fn init_logging(config: &Config) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}
