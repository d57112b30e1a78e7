// src/repl.rs
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::{
    error::ChatError,
    services::{chatbot::ChatApi, session::ChatSession},
};

/// Reads one message per line from `input` and writes the bot's replies to `output`.
///
/// Each value on `interrupts` is one Ctrl-C: at the prompt it ends the loop,
/// while a request is in flight it drops that request and returns to the
/// prompt. EOF or `/quit` also end the loop.
pub async fn run<C, R, W>(
    session: &mut ChatSession<C>,
    input: R,
    mut output: W,
    interrupts: &mut UnboundedReceiver<()>,
) -> std::io::Result<()>
where
    C: ChatApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            Some(()) = interrupts.recv() => {
                output.write_all(b"\n").await?;
                info!(session = %session.id(), "interrupted at prompt");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let text = tokio::select! {
            result = session.send(line) => match result {
                Ok(resp) => format!("bot: {}\n", resp.reply),
                Err(ChatError::Protocol { status, .. }) => {
                    warn!(%status, "chatbot rejected the message");
                    format!("Server error ({status}). Please try again later.\n")
                }
                Err(ChatError::Network(e)) if e.is_timeout() => {
                    "Connection timeout. Server may be slow or unreachable.\n".to_string()
                }
                Err(e) => format!("Error: {e}\n"),
            },
            Some(()) = interrupts.recv() => "\nRequest cancelled.\n".to_string(),
        };
        output.write_all(text.as_bytes()).await?;
    }

    output.flush().await
}
