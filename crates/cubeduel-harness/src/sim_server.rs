//! In-memory authoritative server for simulation.
//!
//! `SimServer` plays the game server's part of the protocol: it owns
//! matches, assigns roles and move sequence numbers, keeps one cube per
//! player and answers with the same messages and error texts a real server
//! sends. It has no sockets. Each connected session gets an outbox of
//! encoded text frames that a [`crate::SimDriver`] drains.
//!
//! Time and randomness come from a [`SimEnv`], so match ids, scramble seeds
//! and timestamps are reproducible.

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use cubeduel_core::Environment;
use cubeduel_proto::{
    Inbound, Outbound, decode,
    payloads::{
        PlayerInfo, Role,
        game::{CubeState, MatchStarted, MoveApplied, SubmitMove},
        lobby::{
            CreateMatch, JoinMatch, MatchCreated, PlayerJoined, PlayerLeft, ReadyUpdated,
            SetReady, StartMatch,
        },
        system::{ErrorReport, Severity},
    },
};

use crate::{
    SimEnv,
    cube::{CubeModel, SCRAMBLE_LENGTH, Turn, scramble},
};

/// Players per match.
pub const MAX_PLAYERS: usize = 2;

/// Virtual time consumed by each request the server handles.
const REQUEST_COST: Duration = Duration::from_millis(1);

/// Server-side connection identifier.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchPhase {
    Lobby,
    Running,
}

#[derive(Debug, Clone)]
struct Participant {
    player_id: String,
    session: SessionId,
    ready: bool,
}

#[derive(Debug, Clone)]
struct PlayerCube {
    cube: CubeModel,
    move_count: u32,
}

#[derive(Debug, Clone)]
struct SimMatch {
    id: String,
    phase: MatchPhase,
    participants: Vec<Participant>,
    host: Option<String>,
    move_seq: u64,
    started_at: Option<i64>,
    scramble_seed: Option<i64>,
    scramble: Vec<Turn>,
    cubes: HashMap<String, PlayerCube>,
}

impl SimMatch {
    fn new(id: String) -> Self {
        Self {
            id,
            phase: MatchPhase::Lobby,
            participants: Vec::new(),
            host: None,
            move_seq: 0,
            started_at: None,
            scramble_seed: None,
            scramble: Vec::new(),
            cubes: HashMap::new(),
        }
    }

    fn contains(&self, player_id: &str) -> bool {
        self.participants.iter().any(|p| p.player_id == player_id)
    }

    fn by_session(&self, session: SessionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.session == session)
    }

    fn add(&mut self, player_id: &str, session: SessionId) {
        if self.host.is_none() && self.participants.is_empty() {
            self.host = Some(player_id.to_string());
        }
        self.participants.push(Participant { player_id: player_id.to_string(), session, ready: false });
    }

    fn remove(&mut self, player_id: &str) {
        self.participants.retain(|p| p.player_id != player_id);
        if self.host.as_deref() == Some(player_id) {
            self.host = self.participants.first().map(|p| p.player_id.clone());
        }
    }

    fn all_ready(&self) -> bool {
        self.participants.len() >= MAX_PLAYERS && self.participants.iter().all(|p| p.ready)
    }

    fn sessions(&self) -> Vec<SessionId> {
        self.participants.iter().map(|p| p.session).collect()
    }

    fn player_infos(&self) -> Vec<PlayerInfo> {
        self.participants
            .iter()
            .map(|p| {
                let role =
                    if self.host.as_deref() == Some(p.player_id.as_str()) { Role::Host } else { Role::Guest };
                PlayerInfo::new(p.player_id.clone(), p.ready, role)
            })
            .collect()
    }
}

/// Simulated game server.
#[derive(Debug)]
pub struct SimServer {
    env: SimEnv,
    matches: BTreeMap<String, SimMatch>,
    session_match: HashMap<SessionId, String>,
    outboxes: BTreeMap<SessionId, VecDeque<String>>,
    cube_pushes: HashMap<String, Vec<String>>,
    next_session: SessionId,
    last_created: Option<String>,
}

impl SimServer {
    /// Create a server using `env` for ids, seeds and timestamps.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            matches: BTreeMap::new(),
            session_match: HashMap::new(),
            outboxes: BTreeMap::new(),
            cube_pushes: HashMap::new(),
            next_session: 1,
            last_created: None,
        }
    }

    /// The server's environment.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// Accept a new connection.
    pub fn connect(&mut self) -> SessionId {
        let session = self.next_session;
        self.next_session += 1;
        self.outboxes.insert(session, VecDeque::new());
        tracing::debug!(session, "session connected");
        session
    }

    /// Whether `session` is connected.
    pub fn is_connected(&self, session: SessionId) -> bool {
        self.outboxes.contains_key(&session)
    }

    /// Number of connected sessions.
    pub fn session_count(&self) -> usize {
        self.outboxes.len()
    }

    /// Drop a connection. The session leaves its match and the remaining
    /// players are told.
    pub fn disconnect(&mut self, session: SessionId) {
        if self.outboxes.remove(&session).is_none() {
            return;
        }
        tracing::debug!(session, "session disconnected");
        self.leave(session);
    }

    /// Handle one text frame from `session`.
    pub fn receive(&mut self, session: SessionId, raw: &str) {
        if !self.is_connected(session) {
            tracing::warn!(session, "frame from unknown session dropped");
            return;
        }
        self.env.advance(REQUEST_COST);

        let envelope = match decode(raw) {
            Ok(envelope) => envelope,
            Err(failure) => {
                tracing::warn!(session, reason = %failure, "malformed request");
                self.error(session, "Malformed message".to_string(), Severity::Critical);
                return;
            },
        };

        let kind = envelope.kind.clone();
        match Outbound::from_envelope(envelope) {
            Some(Outbound::CreateMatch(request)) => self.create_match(session, &request),
            Some(Outbound::JoinMatch(request)) => self.join_match(session, &request),
            Some(Outbound::SetReady(request)) => self.set_ready(session, &request),
            Some(Outbound::StartMatch(request)) => self.start_match(session, &request),
            Some(Outbound::SubmitMove(request)) => self.submit_move(session, &request),
            None => {
                self.error(session, format!("Unhandled message type: {kind}"), Severity::Warning);
            },
        }
    }

    /// Queue a raw frame for `session`, bypassing match logic.
    ///
    /// Used to inject reordered, duplicated or foreign messages.
    pub fn inject(&mut self, session: SessionId, raw: impl Into<String>) {
        if let Some(outbox) = self.outboxes.get_mut(&session) {
            outbox.push_back(raw.into());
        }
    }

    /// Pop the next frame queued for `session`.
    pub fn next_frame(&mut self, session: SessionId) -> Option<String> {
        self.outboxes.get_mut(&session)?.pop_front()
    }

    /// Take every frame queued for `session`.
    pub fn take_frames(&mut self, session: SessionId) -> Vec<String> {
        self.outboxes.get_mut(&session).map(|q| q.drain(..).collect()).unwrap_or_default()
    }

    /// Whether frames are queued for `session`.
    pub fn has_pending(&self, session: SessionId) -> bool {
        self.outboxes.get(&session).is_some_and(|q| !q.is_empty())
    }

    /// Id of the most recently created match.
    pub fn last_created_match(&self) -> Option<&str> {
        self.last_created.as_deref()
    }

    /// Number of live matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Players of a match as the server sees them.
    pub fn players(&self, match_id: &str) -> Option<Vec<PlayerInfo>> {
        self.matches.get(match_id).map(SimMatch::player_infos)
    }

    /// Whether a match has started.
    pub fn is_running(&self, match_id: &str) -> bool {
        self.matches.get(match_id).is_some_and(|m| m.phase == MatchPhase::Running)
    }

    /// Scramble of a started match.
    pub fn scramble(&self, match_id: &str) -> Option<Vec<String>> {
        self.matches.get(match_id).map(|m| m.scramble.iter().map(|t| t.notation()).collect())
    }

    /// Every facelet string pushed to `player_id`, oldest first.
    pub fn cube_pushes(&self, player_id: &str) -> &[String] {
        self.cube_pushes.get(player_id).map_or(&[], Vec::as_slice)
    }

    fn create_match(&mut self, session: SessionId, request: &CreateMatch) {
        let match_id = self.new_match_id();
        self.matches.insert(match_id.clone(), SimMatch::new(match_id.clone()));
        self.last_created = Some(match_id.clone());
        tracing::info!(%match_id, player_id = %request.player_id, "match created");

        if let Err(rejection) = self.admit(&match_id, session, &request.player_id) {
            self.error(
                session,
                format!("Failed to join created match: {rejection:?}"),
                Severity::Critical,
            );
            return;
        }

        self.send(session, &Inbound::MatchCreated(MatchCreated { match_id: match_id.clone() }));
        self.broadcast_joined(&match_id, &request.player_id);
    }

    fn join_match(&mut self, session: SessionId, request: &JoinMatch) {
        let message = match self.admit(&request.match_id, session, &request.player_id) {
            Ok(()) => {
                self.broadcast_joined(&request.match_id, &request.player_id);
                return;
            },
            Err(JoinRejection::NotFound) => {
                (format!("Match not found: {}", request.match_id), Severity::Warning)
            },
            Err(JoinRejection::AlreadyInMatch) => {
                (format!("Player already in match: {}", request.player_id), Severity::Info)
            },
            Err(JoinRejection::Full) => {
                (format!("Match is already full: {}", request.match_id), Severity::Info)
            },
            Err(JoinRejection::NotInLobby) => {
                (format!("The Match has already started: {}", request.match_id), Severity::Info)
            },
        };
        self.error(session, message.0, message.1);
    }

    fn set_ready(&mut self, session: SessionId, request: &SetReady) {
        let Some(m) = self.matches.get_mut(&request.match_id) else {
            let message = format!("Match not found: {}", request.match_id);
            self.error(session, message, Severity::Critical);
            return;
        };
        if m.phase != MatchPhase::Lobby {
            let message = format!("The game has already started: {}", request.match_id);
            self.error(session, message, Severity::Warning);
            return;
        }
        let Some(participant) = m.participants.iter_mut().find(|p| p.player_id == request.player_id)
        else {
            let message = format!("You are not part of this match: {}", request.match_id);
            self.error(session, message, Severity::Critical);
            return;
        };
        participant.ready = request.ready;

        let update = Inbound::ReadyUpdated(ReadyUpdated {
            match_id: m.id.clone(),
            changed_player_id: String::new(),
            player_id: request.player_id.clone(),
            ready: request.ready,
            players: m.player_infos(),
        });
        let sessions = m.sessions();
        self.broadcast(&sessions, &update);
    }

    fn start_match(&mut self, session: SessionId, request: &StartMatch) {
        let seed = self.env.random_u64() >> 12;
        let started_at = i64::try_from(self.env.wall_clock_millis()).unwrap_or(i64::MAX);

        let Some(m) = self.matches.get_mut(&request.match_id) else {
            let message = format!("Match not found: {}", request.match_id);
            self.error(session, message, Severity::Critical);
            return;
        };
        let rejection = if m.phase != MatchPhase::Lobby {
            Some((format!("The match has already started: {}", m.id), Severity::Warning))
        } else if let Some(caller) = m.by_session(session) {
            if m.host.as_deref() != Some(caller.player_id.as_str()) {
                Some((format!("You are not the host of this match: {}", m.id), Severity::Warning))
            } else if !m.all_ready() {
                Some((format!("Not all players are ready: {}", m.id), Severity::Warning))
            } else {
                None
            }
        } else {
            Some((format!("You are not part of this match: {}", m.id), Severity::Critical))
        };
        if let Some((message, severity)) = rejection {
            self.error(session, message, severity);
            return;
        }

        let turns = scramble(seed, SCRAMBLE_LENGTH);
        m.phase = MatchPhase::Running;
        m.started_at = Some(started_at);
        m.scramble_seed = i64::try_from(seed).ok();
        m.scramble.clone_from(&turns);
        for p in &mut m.participants {
            m.cubes.insert(
                p.player_id.clone(),
                PlayerCube { cube: CubeModel::scrambled(&turns), move_count: 0 },
            );
            p.ready = false;
        }
        tracing::info!(match_id = %m.id, seed, "match started");

        let started = Inbound::MatchStarted(MatchStarted {
            match_id: m.id.clone(),
            started_at: m.started_at,
            scramble_seed: m.scramble_seed,
            scramble: turns.iter().map(|t| t.notation()).collect(),
            players: Some(m.player_infos()),
        });
        let pushes: Vec<(SessionId, CubeState)> = m
            .participants
            .iter()
            .filter_map(|p| {
                let cube = m.cubes.get(&p.player_id)?;
                Some((p.session, CubeState {
                    match_id: m.id.clone(),
                    player_id: p.player_id.clone(),
                    facelets: cube.cube.facelets(),
                    move_count: 0,
                    solved: false,
                }))
            })
            .collect();
        let sessions = m.sessions();

        self.broadcast(&sessions, &started);
        for (target, push) in pushes {
            self.push_cube(target, push);
        }
    }

    fn submit_move(&mut self, session: SessionId, request: &SubmitMove) {
        let server_ts = i64::try_from(self.env.wall_clock_millis()).unwrap_or(i64::MAX);

        let Some(m) = self.matches.get_mut(&request.match_id) else {
            let message = format!("Match not found: {}", request.match_id);
            self.error(session, message, Severity::Critical);
            return;
        };
        if m.phase != MatchPhase::Running {
            let message = format!("The game has not started yet: {}", m.id);
            self.error(session, message, Severity::Warning);
            return;
        }
        let Some(player_id) = m.by_session(session).map(|p| p.player_id.clone()) else {
            let message = format!("You are not part of this match: {}", m.id);
            self.error(session, message, Severity::Critical);
            return;
        };
        let Some(turn) = Turn::parse(&request.notation) else {
            let message = format!("Invalid move: {}", request.notation);
            self.error(session, message, Severity::Warning);
            return;
        };

        let scramble = &m.scramble;
        let entry = m
            .cubes
            .entry(player_id.clone())
            .or_insert_with(|| PlayerCube { cube: CubeModel::scrambled(scramble), move_count: 0 });
        entry.cube.apply(turn);
        entry.move_count += 1;
        m.move_seq += 1;

        let applied = Inbound::MoveApplied(MoveApplied {
            match_id: m.id.clone(),
            player_id: player_id.clone(),
            notation: request.notation.clone(),
            seq: m.move_seq,
            server_ts,
        });
        let push = CubeState {
            match_id: m.id.clone(),
            player_id,
            facelets: entry.cube.facelets(),
            move_count: entry.move_count,
            solved: entry.cube.is_solved(),
        };
        let sessions = m.sessions();

        self.broadcast(&sessions, &applied);
        self.push_cube(session, push);
    }

    /// Add a player to a match. A session already in another match leaves
    /// it first.
    fn admit(&mut self, match_id: &str, session: SessionId, player_id: &str) -> Result<(), JoinRejection> {
        let m = self.matches.get(match_id).ok_or(JoinRejection::NotFound)?;
        if m.phase != MatchPhase::Lobby {
            return Err(JoinRejection::NotInLobby);
        }
        if m.contains(player_id) {
            return Err(JoinRejection::AlreadyInMatch);
        }
        if m.participants.len() >= MAX_PLAYERS {
            return Err(JoinRejection::Full);
        }

        if self.session_match.get(&session).is_some_and(|current| current != match_id) {
            self.leave(session);
        }
        if let Some(m) = self.matches.get_mut(match_id) {
            m.add(player_id, session);
        }
        self.session_match.insert(session, match_id.to_string());
        Ok(())
    }

    fn leave(&mut self, session: SessionId) {
        let Some(match_id) = self.session_match.remove(&session) else {
            return;
        };
        let Some(m) = self.matches.get_mut(&match_id) else {
            return;
        };
        let Some(player_id) = m.by_session(session).map(|p| p.player_id.clone()) else {
            return;
        };
        m.remove(&player_id);
        tracing::info!(%match_id, %player_id, "player left");

        if m.participants.is_empty() {
            self.matches.remove(&match_id);
            return;
        }

        let left = Inbound::PlayerLeft(PlayerLeft {
            match_id: m.id.clone(),
            left_player_id: player_id,
            players: m.player_infos(),
        });
        let sessions = m.sessions();
        self.broadcast(&sessions, &left);
    }

    fn broadcast_joined(&mut self, match_id: &str, player_id: &str) {
        let Some(m) = self.matches.get(match_id) else {
            return;
        };
        let joined = Inbound::PlayerJoined(PlayerJoined {
            match_id: m.id.clone(),
            joined_player_id: player_id.to_string(),
            players: m.player_infos(),
        });
        let sessions = m.sessions();
        self.broadcast(&sessions, &joined);
    }

    fn push_cube(&mut self, session: SessionId, push: CubeState) {
        self.cube_pushes.entry(push.player_id.clone()).or_default().push(push.facelets.clone());
        self.send(session, &Inbound::CubeState(push));
    }

    fn error(&mut self, session: SessionId, message: String, severity: Severity) {
        tracing::debug!(session, %message, "request rejected");
        let report = ErrorReport { message: Some(message), error_type: severity };
        self.send(session, &Inbound::Error(report));
    }

    fn broadcast(&mut self, sessions: &[SessionId], message: &Inbound) {
        for &session in sessions {
            self.send(session, message);
        }
    }

    fn send(&mut self, session: SessionId, message: &Inbound) {
        let text = match message.to_envelope().to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(kind = message.kind(), error = %e, "failed to encode message");
                return;
            },
        };
        if let Some(outbox) = self.outboxes.get_mut(&session) {
            outbox.push_back(text);
        }
    }

    fn new_match_id(&self) -> String {
        let mut bytes = [0u8; 16];
        self.env.random_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinRejection {
    NotFound,
    NotInLobby,
    AlreadyInMatch,
    Full,
}

/// A server shared between simulated clients.
pub type SharedSimServer = Arc<Mutex<SimServer>>;

/// Create a shared server.
pub fn create_shared_server(env: SimEnv) -> SharedSimServer {
    Arc::new(Mutex::new(SimServer::new(env)))
}
