//! Fuzz target for the client reducer
//!
//! Drives a connected client with an arbitrary mix of server frames, raw
//! text and user intents.
//!
//! # Invariants
//!
//! - NEVER panics
//! - The move log stays strictly ascending by `seq`
//! - A displayed cube always came from a push addressed to the local player
//! - At most two players are shown

#![no_main]

use arbitrary::Arbitrary;
use cubeduel_client::{Client, ClientConfig, ClientEvent, Identity};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

const ME: &str = "p1";

#[derive(Debug, Arbitrary)]
enum Player {
    Me,
    Other,
}

impl Player {
    fn id(&self) -> &'static str {
        match self {
            Self::Me => ME,
            Self::Other => "p2",
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Input {
    Created,
    Joined { host: Player, both: bool, ready: [bool; 2] },
    Left { who: Player },
    Started,
    Move { seq: u8, who: Player },
    Cube { who: Player, facelets: String },
    Raw(String),
    Create,
    Ready,
    Start,
    Submit(String),
    Close,
}

fn frame(kind: &str, payload: serde_json::Value) -> String {
    json!({"type": kind, "payload": payload}).to_string()
}

fn players(host: &Player, both: bool, ready: [bool; 2]) -> serde_json::Value {
    let guest = match host {
        Player::Me => "p2",
        Player::Other => ME,
    };
    let mut list = vec![json!({"playerId": host.id(), "ready": ready[0], "role": "HOST"})];
    if both {
        list.push(json!({"playerId": guest, "ready": ready[1], "role": "GUEST"}));
    }
    serde_json::Value::Array(list)
}

fuzz_target!(|inputs: Vec<Input>| {
    let mut client = Client::new(Identity::new(ME), ClientConfig::default());
    let _ = client.handle(ClientEvent::Opened);
    let mut own_cubes: Vec<String> = Vec::new();

    for input in inputs {
        let event = match input {
            Input::Created => ClientEvent::FrameReceived(frame("LOBBY_MATCH_CREATED", json!({"matchId": "m1"}))),
            Input::Joined { host, both, ready } => ClientEvent::FrameReceived(frame(
                "LOBBY_PLAYER_JOINED",
                json!({"matchId": "m1", "players": players(&host, both, ready)}),
            )),
            Input::Left { who } => ClientEvent::FrameReceived(frame(
                "LOBBY_LEFT_MATCH",
                json!({"matchId": "m1", "leftPlayerId": who.id(), "players": []}),
            )),
            Input::Started => ClientEvent::FrameReceived(frame(
                "GAME_MATCH_STARTED",
                json!({"matchId": "m1", "scramble": ["R"], "scrambleSeed": 1}),
            )),
            Input::Move { seq, who } => ClientEvent::FrameReceived(frame(
                "GAME_MOVE_APPLIED",
                json!({"matchId": "m1", "playerId": who.id(), "move": "R", "seq": seq}),
            )),
            Input::Cube { who, facelets } => {
                if matches!(who, Player::Me) {
                    own_cubes.push(facelets.clone());
                }
                ClientEvent::FrameReceived(frame(
                    "GAME_CUBE_STATE",
                    json!({"matchId": "m1", "playerId": who.id(), "facelets": facelets, "moveCount": 1}),
                ))
            }
            Input::Raw(text) => ClientEvent::FrameReceived(text),
            Input::Create => ClientEvent::CreateMatch,
            Input::Ready => ClientEvent::ToggleReady,
            Input::Start => ClientEvent::StartMatch,
            Input::Submit(token) => ClientEvent::SubmitMove(token),
            Input::Close => ClientEvent::Closed,
        };
        let _ = client.handle(event);

        let state = client.state();
        let seqs: Vec<u64> = state.moves.iter().map(|m| m.seq).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]), "unsorted moves: {seqs:?}");
        assert!(state.players.len() <= 2);
        if let Some(cube) = &state.cube {
            assert!(own_cubes.contains(&cube.facelets), "foreign cube displayed");
        }
    }
});
