//! Terminal command input.
//!
//! Reads line commands from stdin on a blocking task and forwards them to
//! the audition loop over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards parsed stdin commands to the audition loop.
pub struct InputReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputReader {
    /// Create a reader that forwards commands over `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Parse one input line into a command, if it is one.
    pub fn parse(line: &str) -> Option<AppCommand> {
        match line.trim().to_lowercase().as_str() {
            "stop" | "s" => Some(AppCommand::StopRecording),
            "next" | "n" => Some(AppCommand::Advance),
            "quit" | "q" => Some(AppCommand::Shutdown),
            _ => None,
        }
    }

    /// Run the input forwarding loop.
    ///
    /// Returns when a shutdown signal is received or stdin closes. A closed
    /// stdin is not an error: the audition continues hands-free on the
    /// timeout policy alone.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task that reads stdin lines.
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if line_tx.blocking_send(line.trim().to_string()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input reader shutting down");
                    break;
                }
                maybe_line = line_rx.recv() => {
                    match maybe_line {
                        Some(line) => {
                            match Self::parse(&line) {
                                Some(command) => {
                                    self.command_tx.send(command).await.map_err(|e| {
                                        AppError::ChannelSendFailed {
                                            message: format!("Failed to send {:?}: {}", command, e),
                                            location: ErrorLocation::from(Location::caller()),
                                        }
                                    })?;
                                }
                                None => {
                                    warn!(%line, "Unrecognized command, expected stop / next / quit");
                                }
                            }
                        }
                        None => {
                            info!("Stdin closed, audition continues hands-free");
                            break;
                        }
                    }
                }
            }
        }

        // Drop line_rx to unblock the blocking task's next blocking_send().
        drop(line_rx);

        // Best-effort join: the blocking task may be stuck in read_line()
        // if no input arrives after shutdown. Use a timeout to avoid
        // hanging; the runtime cleans the task up on process exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => debug!(
                "Stdin forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }
}
