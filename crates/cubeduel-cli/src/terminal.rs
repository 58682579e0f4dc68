//! Terminal driver for the line-oriented client.
//!
//! Implements the [`Driver`] trait over stdin lines, a text writer and a
//! WebSocket connection. Lines are read on a separate task and handed over
//! through a channel so that waiting for input never blocks incoming frames.

use std::{
    io::{self, IsTerminal, Stdout, Write},
    time::Duration,
};

use cubeduel_app::{App, Driver, Incoming};
use cubeduel_client::transport::{self, ConnectedClient, TransportError, TransportEvent};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::render;

/// How long a poll waits for input before letting the runtime continue.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Buffered stdin lines.
const LINE_CHANNEL_CAPACITY: usize = 16;

/// Clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error writing to the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The connection task is gone.
    #[error("channel send error")]
    ChannelSend,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Generic over the output so tests can render into a buffer.
pub struct TerminalDriver<W: Write + Send> {
    lines: mpsc::Receiver<String>,
    out: W,
    clear: bool,
    connection: Option<ConnectedClient>,
    pending: Option<Incoming>,
    last_screen: String,
}

impl TerminalDriver<Stdout> {
    /// Driver reading stdin and rendering to stdout.
    ///
    /// Must be called inside a tokio runtime.
    pub fn stdio() -> Self {
        let out = io::stdout();
        let clear = out.is_terminal();
        Self::new(spawn_stdin_reader(), out, clear)
    }
}

impl<W: Write + Send> TerminalDriver<W> {
    /// Create a driver from a line source and an output.
    ///
    /// With `clear` set, every render replaces the previous screen.
    pub fn new(lines: mpsc::Receiver<String>, out: W, clear: bool) -> Self {
        Self { lines, out, clear, connection: None, pending: None, last_screen: String::new() }
    }

    /// The output.
    pub fn output(&self) -> &W {
        &self.out
    }
}

/// Forward stdin lines to a channel until EOF.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                },
            }
        }
        tracing::debug!("stdin closed");
    });
    rx
}

async fn next_event(connection: Option<&mut ConnectedClient>) -> Option<TransportEvent> {
    match connection {
        Some(conn) => conn.from_server.recv().await,
        None => std::future::pending().await,
    }
}

fn incoming(event: Option<TransportEvent>) -> Incoming {
    match event {
        Some(TransportEvent::Text(text)) => Incoming::Text(text),
        Some(TransportEvent::Error(detail)) => Incoming::Error(detail),
        Some(TransportEvent::Closed) | None => Incoming::Closed,
    }
}

impl<W: Write + Send> Driver for TerminalDriver<W> {
    type Error = TerminalError;

    async fn poll_command(&mut self) -> Result<Option<String>, Self::Error> {
        if self.pending.is_some() {
            return Ok(None);
        }

        let Self { lines, connection, pending, .. } = self;
        tokio::select! {
            biased;

            line = lines.recv() => Ok(Some(line.unwrap_or_else(|| "quit".to_string()))),

            event = next_event(connection.as_mut()) => {
                *pending = Some(incoming(event));
                Ok(None)
            }

            () = tokio::time::sleep(POLL_INTERVAL) => Ok(None),
        }
    }

    async fn send_frame(&mut self, text: String) -> Result<(), Self::Error> {
        if let Some(conn) = &self.connection {
            conn.to_server.send(text).await.map_err(|_| TerminalError::ChannelSend)?;
        }
        Ok(())
    }

    async fn recv_frame(&mut self) -> Option<Incoming> {
        let next = match self.pending.take() {
            Some(incoming) => Some(incoming),
            None => {
                let conn = self.connection.as_mut()?;
                match conn.from_server.try_recv() {
                    Ok(event) => Some(incoming(Some(event))),
                    Err(mpsc::error::TryRecvError::Empty) => None,
                    Err(mpsc::error::TryRecvError::Disconnected) => Some(Incoming::Closed),
                }
            },
        };

        if next == Some(Incoming::Closed) {
            self.connection = None;
        }
        next
    }

    async fn connect(&mut self, url: &str) -> Result<(), Self::Error> {
        let client = transport::connect(url).await?;
        self.connection = Some(client);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some() || self.pending.is_some()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let screen = render::render(app);
        if screen == self.last_screen {
            return Ok(());
        }

        if self.clear {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(screen.as_bytes())?;
        self.out.flush()?;
        self.last_screen = screen;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(conn) = self.connection.take() {
            drop(conn.stop());
        }
        self.pending = None;
    }
}
