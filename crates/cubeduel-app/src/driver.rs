//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use crate::App;

/// Something received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A text frame.
    Text(String),
    /// A transport error. Advisory; the connection may still be usable.
    Error(String),
    /// The connection closed.
    Closed,
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and in
/// simulation.
///
/// # Implementations
///
/// - **Terminal**: stdin lines, tokio-tungstenite WebSocket
/// - **Simulation**: scripted commands, in-process server
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next user command line.
    ///
    /// Returns `None` if no input is ready.
    fn poll_command(&mut self) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Send a text frame to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or send fails.
    fn send_frame(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receive from the server.
    ///
    /// Returns `None` if nothing is ready.
    fn recv_frame(&mut self) -> impl Future<Output = Option<Incoming>> + Send;

    /// Establish a connection to the server. Resolves once it is open.
    ///
    /// # Errors
    ///
    /// Returns an error if connection cannot be established.
    fn connect(&mut self, url: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check if connected to server.
    fn is_connected(&self) -> bool;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    ///
    /// Must be safe to call more than once.
    fn stop(&mut self);
}
