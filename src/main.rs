use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chatbot_client::{ChatApiClient, ChatSession, ClientConfig, repl};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is normal; the variables may come from the shell.
        eprintln!("No .env loaded: {e}");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_env().context("Failed to load chatbot configuration")?;
    let client = ChatApiClient::new(&config).context("Failed to build chatbot client")?;
    info!(endpoint = %client.endpoint(), "chatbot client ready");

    // Installed once for the whole session so no Ctrl-C is lost between requests.
    let (tx, mut interrupts) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C");
                break;
            }
            if tx.send(()).is_err() {
                break;
            }
        }
    });

    let mut session = ChatSession::new(client);
    println!("Connected to {}. Type /quit to leave.", session.api().endpoint());

    repl::run(
        &mut session,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &mut interrupts,
    )
    .await?;

    info!(session = %session.id(), messages = session.len(), "chat session ended");
    Ok(())
}
