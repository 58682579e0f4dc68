//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`cubeduel_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input comes from a script of [`Step`]s. A step can wait for a
//! [`Condition`] on the client's view, which is how two clients sharing one
//! [`SimServer`](crate::SimServer) take turns: the host waits for the guest
//! to join, the guest waits for the match to start, and so on.
//!
//! Every poll yields to the scheduler, so two runtimes joined on the same
//! task interleave one cycle at a time.

use std::{collections::VecDeque, sync::PoisonError};

use cubeduel_app::{App, Driver, Incoming};
use cubeduel_client::{ClientViewState, Identity, View};

use crate::{
    invariants::{ClientSnapshot, InvariantRegistry, SystemSnapshot},
    sim_server::{SessionId, SharedSimServer, SimServer},
};

/// Idle polls allowed before a waiting step is declared stalled.
pub const DEFAULT_STALL_LIMIT: usize = 10_000;

/// Error type for simulation driver.
#[derive(Debug, thiserror::Error)]
pub enum SimDriverError {
    /// A frame was sent before connecting.
    #[error("not connected")]
    NotConnected,

    /// A step waited longer than the stall limit.
    #[error("stalled after {polls} polls waiting for {waiting}")]
    Stalled {
        /// The step that never completed.
        waiting: String,
        /// Idle polls spent.
        polls: usize,
    },

    /// A state invariant failed after a render.
    #[error("invariant violated after render {render}: {details}")]
    Invariant {
        /// Render count at the time of the check.
        render: usize,
        /// All violation messages, joined.
        details: String,
    },
}

/// A predicate over the client's last rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The client is in a match.
    InMatch,
    /// The match shows exactly this many players.
    PlayerCount(usize),
    /// Two players, both ready.
    AllReady,
    /// The match has started.
    Started,
    /// The move log holds at least this many moves.
    MovesSeen(usize),
    /// A cube is displayed and it is solved.
    Solved,
    /// A server error is displayed.
    ErrorShown,
}

impl Condition {
    /// Whether the condition holds for `view`.
    pub fn holds(&self, view: &View<'_>) -> bool {
        let state = view.state();
        match self {
            Self::InMatch => view.is_in_match(),
            Self::PlayerCount(n) => state.players.len() == *n,
            Self::AllReady => view.all_ready(),
            Self::Started => state.started,
            Self::MovesSeen(n) => state.moves.len() >= *n,
            Self::Solved => state.cube.as_ref().is_some_and(|c| c.solved),
            Self::ErrorShown => state.last_error.is_some(),
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Type a command line.
    Command(String),
    /// Join the match most recently created on the server.
    JoinCreated,
    /// Wait until the condition holds.
    Until(Condition),
}

impl Step {
    /// A command line step.
    pub fn command(line: impl Into<String>) -> Self {
        Self::Command(line.into())
    }
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] so the same [`cubeduel_app::Runtime`]
/// orchestration code runs in both the terminal client and simulation tests.
#[derive(Debug)]
pub struct SimDriver {
    server: SharedSimServer,
    session: Option<SessionId>,
    script: VecDeque<Step>,
    identity: Option<Identity>,
    state: ClientViewState,
    snapshot: ClientSnapshot,
    invariants: Option<InvariantRegistry>,
    idle_polls: usize,
    stall_limit: usize,
    renders: usize,
    stops: usize,
}

impl SimDriver {
    /// Create a driver that runs `script` against `server`.
    pub fn new(server: SharedSimServer, script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            server,
            session: None,
            script: script.into_iter().collect(),
            identity: None,
            state: ClientViewState::new(),
            snapshot: ClientSnapshot::default(),
            invariants: None,
            idle_polls: 0,
            stall_limit: DEFAULT_STALL_LIMIT,
            renders: 0,
            stops: 0,
        }
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Override the stall limit.
    #[must_use]
    pub fn with_stall_limit(mut self, limit: usize) -> Self {
        self.stall_limit = limit;
        self
    }

    /// Server session of this client. `None` before connect or after stop.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Steps not yet executed.
    pub fn remaining_steps(&self) -> usize {
        self.script.len()
    }

    /// Invariant snapshot accumulated so far.
    pub fn snapshot(&self) -> &ClientSnapshot {
        &self.snapshot
    }

    /// Number of renders.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Number of times the connection was stopped.
    pub fn stops(&self) -> usize {
        self.stops
    }

    fn server(&self) -> std::sync::MutexGuard<'_, SimServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn condition_holds(&self, condition: &Condition) -> bool {
        self.identity.as_ref().is_some_and(|identity| condition.holds(&View::new(&self.state, identity)))
    }

    fn pending_inbound(&self) -> bool {
        self.session.is_some_and(|session| self.server().has_pending(session))
    }

    /// Count an idle poll against the step at the head of the script.
    fn idle(&mut self, waiting: &Step) -> Result<Option<String>, SimDriverError> {
        self.idle_polls += 1;
        if self.idle_polls > self.stall_limit {
            return Err(SimDriverError::Stalled { waiting: format!("{waiting:?}"), polls: self.idle_polls });
        }
        Ok(None)
    }

    fn next_command(&mut self) -> Result<Option<String>, SimDriverError> {
        loop {
            let Some(step) = self.script.front().cloned() else {
                if self.pending_inbound() {
                    return Ok(None);
                }
                return Ok(Some("quit".to_string()));
            };

            match step {
                Step::Command(line) => {
                    self.script.pop_front();
                    self.idle_polls = 0;
                    return Ok(Some(line));
                },
                Step::JoinCreated => {
                    let created = self.server().last_created_match().map(str::to_string);
                    let Some(match_id) = created else {
                        return self.idle(&Step::JoinCreated);
                    };
                    self.script.pop_front();
                    self.idle_polls = 0;
                    return Ok(Some(format!("join {match_id}")));
                },
                Step::Until(condition) => {
                    if !self.condition_holds(&condition) {
                        return self.idle(&Step::Until(condition));
                    }
                    self.script.pop_front();
                    self.idle_polls = 0;
                },
            }
        }
    }

    fn check_invariants(&mut self, app: &App) -> Result<(), SimDriverError> {
        let player_id = app.identity().player_id().as_str().to_string();
        if self.snapshot.player_id != player_id {
            self.snapshot = ClientSnapshot::new(player_id.clone());
        }
        self.snapshot.observe(app.state());
        let pushes = self.server().cube_pushes(&player_id).to_vec();
        self.snapshot.cube_pushes = pushes;

        let Some(registry) = &self.invariants else {
            return Ok(());
        };
        registry.check_all(&SystemSnapshot::single(self.snapshot.clone())).map_err(|violations| {
            let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
            SimDriverError::Invariant { render: self.renders, details: details.join("; ") }
        })
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_command(&mut self) -> Result<Option<String>, Self::Error> {
        tokio::task::yield_now().await;
        self.next_command()
    }

    async fn send_frame(&mut self, text: String) -> Result<(), Self::Error> {
        let session = self.session.ok_or(SimDriverError::NotConnected)?;
        self.server().receive(session, &text);
        Ok(())
    }

    async fn recv_frame(&mut self) -> Option<Incoming> {
        let session = self.session?;
        self.server().next_frame(session).map(Incoming::Text)
    }

    async fn connect(&mut self, url: &str) -> Result<(), Self::Error> {
        let session = self.server().connect();
        tracing::debug!(url, session, "simulated connect");
        self.session = Some(session);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.renders += 1;
        self.identity = Some(app.identity().clone());
        self.state.clone_from(app.state());
        self.check_invariants(app)
    }

    fn stop(&mut self) {
        self.stops += 1;
        if let Some(session) = self.session.take() {
            self.server().disconnect(session);
        }
    }
}

#[cfg(test)]
mod tests {
    use cubeduel_app::{Driver, Runtime};
    use cubeduel_client::ClientConfig;

    use super::*;
    use crate::{SimEnv, create_shared_server};

    fn runtime(server: &SharedSimServer, player: &str, script: Vec<Step>) -> Runtime<SimDriver> {
        let driver = SimDriver::new(server.clone(), script).with_invariants(InvariantRegistry::standard());
        Runtime::new(driver, Identity::new(player), ClientConfig::default(), "ws://sim/ws".into())
    }

    #[tokio::test]
    async fn send_before_connect_fails() {
        let server = create_shared_server(SimEnv::new());
        let mut driver = SimDriver::new(server, []);
        assert!(matches!(driver.send_frame("{}".into()).await, Err(SimDriverError::NotConnected)));
        assert_eq!(driver.recv_frame().await, None);
    }

    #[tokio::test]
    async fn empty_script_quits_after_connecting() {
        let server = create_shared_server(SimEnv::new());
        let mut rt = runtime(&server, "p1", vec![]);
        rt.run().await.unwrap();

        assert_eq!(rt.driver().stops(), 1);
        assert_eq!(rt.driver().session(), None);
        assert_eq!(server.lock().unwrap().session_count(), 0);
        assert_eq!(rt.app().log().latest(), Some("connected as playerId=p1"));
    }

    #[tokio::test]
    async fn create_reaches_lobby() {
        let server = create_shared_server(SimEnv::new());
        let script = vec![Step::command("create"), Step::Until(Condition::PlayerCount(1))];
        let mut rt = runtime(&server, "p1", script);
        rt.run().await.unwrap();

        assert_eq!(rt.driver().remaining_steps(), 0);
        let created = server.lock().unwrap().last_created_match().map(str::to_string);
        assert_eq!(rt.app().state().match_id, created);
        assert!(rt.app().view().is_host());
    }

    #[tokio::test]
    async fn unsatisfiable_wait_stalls() {
        let server = create_shared_server(SimEnv::new());
        let driver = SimDriver::new(server, [Step::Until(Condition::Started)]).with_stall_limit(5);
        let mut rt = Runtime::new(driver, Identity::new("p1"), ClientConfig::default(), "ws://sim/ws".into());

        let err = rt.run().await.unwrap_err();
        assert!(matches!(err, SimDriverError::Stalled { polls: 6, .. }), "{err}");
        assert_eq!(rt.driver().stops(), 1);
    }

    #[tokio::test]
    async fn join_created_waits_for_a_match() {
        let server = create_shared_server(SimEnv::new());
        let mut driver = SimDriver::new(server.clone(), [Step::JoinCreated]);
        assert_eq!(driver.poll_command().await.unwrap(), None);

        let session = server.lock().unwrap().connect();
        server.lock().unwrap().receive(session, r#"{"type":"LOBBY_CREATE_MATCH","payload":{"playerId":"p0"}}"#);
        let id = server.lock().unwrap().last_created_match().unwrap().to_string();

        assert_eq!(driver.poll_command().await.unwrap(), Some(format!("join {id}")));
    }
}
