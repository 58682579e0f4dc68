//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Protocol bridge to Client
//! - [`Driver`]: Platform-specific I/O
//!
//! The connection is torn down on every exit path: after the loop ends
//! normally, after a driver error, and when the runtime is dropped without
//! having run to completion.

use cubeduel_client::{ClientConfig, Identity};

use crate::{App, AppAction, AppEvent, Bridge, Driver, driver::Incoming};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    bridge: Bridge,
    server_url: String,
    stopped: bool,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and identity.
    pub fn new(driver: D, identity: Identity, config: ClientConfig, server_url: String) -> Self {
        let app = App::new(server_url.clone(), identity.clone(), config);
        let bridge = Bridge::new(identity, config);
        Self { driver, app, bridge, server_url, stopped: false }
    }

    /// Run the main event loop until the user quits.
    ///
    /// This is the core orchestration loop that:
    /// 1. Connects to the server
    /// 2. Polls for user commands from the driver
    /// 3. Receives frames from the server
    /// 4. Processes actions and events between App and Bridge
    /// 5. Sends outgoing frames through the driver
    ///
    /// The connection is stopped before this returns, whether or not the
    /// loop failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "runtime stopped on driver error");
        }
        self.shutdown();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.connect();
        if self.process_actions(actions).await? {
            return Ok(());
        }

        loop {
            if self.process_cycle().await? {
                return Ok(());
            }
        }
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(line) = self.driver.poll_command().await? {
            let actions = self.app.handle(AppEvent::Line(line));
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        if self.driver.is_connected()
            && let Some(incoming) = self.driver.recv_frame().await
        {
            let events = match incoming {
                Incoming::Text(text) => self.bridge.handle_frame(text),
                Incoming::Error(detail) => self.bridge.handle_transport_error(detail),
                Incoming::Closed => self.bridge.handle_closed(),
            };
            if self.apply_events(events)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect { server_url: _ } => self.connect().await?,

                    // Protocol operations go through the bridge
                    AppAction::CreateMatch
                    | AppAction::JoinMatch { .. }
                    | AppAction::ToggleReady
                    | AppAction::StartMatch
                    | AppAction::SubmitMove { .. } => {
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                        self.send_outgoing_frames().await?;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Feed bridge events to the App and run the resulting UI actions.
    ///
    /// Returns `true` if should quit.
    fn apply_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        let mut quit = false;
        for event in events {
            for action in self.app.handle(event) {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => quit = true,
                    other => tracing::warn!(action = ?other, "unexpected protocol action from bridge event"),
                }
            }
        }
        Ok(quit)
    }

    /// Connect to the server. A failed connect is reported, not fatal.
    async fn connect(&mut self) -> Result<(), D::Error> {
        self.apply_events(vec![AppEvent::Connecting])?;

        let events = match self.driver.connect(&self.server_url).await {
            Ok(()) => self.bridge.handle_opened(),
            Err(e) => {
                tracing::warn!(url = %self.server_url, error = %e, "connect failed");
                self.bridge.handle_transport_error(e.to_string())
            },
        };
        self.apply_events(events)?;
        Ok(())
    }

    /// Send all pending outgoing frames to the server.
    ///
    /// A failed send is reported as a transport error.
    async fn send_outgoing_frames(&mut self) -> Result<(), D::Error> {
        let frames = self.bridge.take_outgoing();
        for frame in frames {
            if let Err(e) = self.driver.send_frame(frame).await {
                tracing::warn!(error = %e, "send failed");
                let events = self.bridge.handle_transport_error(e.to_string());
                self.apply_events(events)?;
            }
        }
        Ok(())
    }

    /// Close the connection and stop the driver. Idempotent.
    fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        let close = self.bridge.shutdown();
        tracing::debug!(close, "shutting down runtime");
        self.driver.stop();
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: Driver> Drop for Runtime<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
