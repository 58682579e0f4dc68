//! Full matches between two simulated clients.
//!
//! Both clients run the production [`Runtime`] against one in-memory server.
//! Every render is checked against the standard invariants, so any run that
//! returns `Ok` kept them throughout.

use cubeduel_app::Runtime;
use cubeduel_client::{ClientConfig, ClientViewState, Identity, Phase};
use cubeduel_harness::{
    Condition, CubeModel, InvariantRegistry, SharedSimServer, SimDriver, SimEnv, Step, Turn,
    create_shared_server,
};
use cubeduel_proto::payloads::Role;

fn client(server: &SharedSimServer, player: &str, script: Vec<Step>) -> Runtime<SimDriver> {
    let driver = SimDriver::new(server.clone(), script).with_invariants(InvariantRegistry::standard());
    Runtime::new(driver, Identity::new(player), ClientConfig::default(), "ws://sim/ws".into())
}

fn cmd(line: &str) -> Step {
    Step::command(line)
}

fn until(condition: Condition) -> Step {
    Step::Until(condition)
}

fn host_script() -> Vec<Step> {
    vec![
        cmd("create"),
        until(Condition::PlayerCount(2)),
        cmd("ready"),
        until(Condition::AllReady),
        cmd("start"),
        until(Condition::Started),
        cmd("move R"),
        cmd("move U"),
        until(Condition::MovesSeen(4)),
    ]
}

fn guest_script() -> Vec<Step> {
    vec![
        Step::JoinCreated,
        until(Condition::InMatch),
        cmd("ready"),
        until(Condition::Started),
        cmd("move F"),
        cmd("move D'"),
        until(Condition::MovesSeen(4)),
    ]
}

async fn play(seed: u64) -> (Runtime<SimDriver>, Runtime<SimDriver>, SharedSimServer) {
    let server = create_shared_server(SimEnv::with_seed(seed));
    let mut host = client(&server, "alice", host_script());
    let mut guest = client(&server, "bob", guest_script());

    let (host_result, guest_result) = tokio::join!(host.run(), guest.run());
    host_result.unwrap();
    guest_result.unwrap();
    (host, guest, server)
}

fn expected_cube(state: &ClientViewState, own_moves: &[&str]) -> String {
    let mut turns: Vec<Turn> = state.scramble.iter().map(|n| Turn::parse(n).unwrap()).collect();
    turns.extend(own_moves.iter().map(|n| Turn::parse(n).unwrap()));
    CubeModel::scrambled(&turns).facelets()
}

#[tokio::test]
async fn full_match_converges() {
    let (host, guest, _server) = play(1).await;
    let (h, g) = (host.app().state(), guest.app().state());

    for state in [h, g] {
        assert!(state.started);
        assert_eq!(state.moves.len(), 4);
        let seqs: Vec<u64> = state.moves.iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(state.scramble.len(), 20);
        assert!(state.scramble_seed.is_some());
    }

    let moves = |s: &ClientViewState| -> Vec<(String, String)> {
        s.moves.iter().map(|m| (m.player_id.clone(), m.notation.clone())).collect()
    };
    assert_eq!(moves(h), moves(g));
    assert_eq!(h.scramble, g.scramble);
    assert_eq!(h.match_id, g.match_id);

    let host_cube = h.cube.as_ref().unwrap();
    let guest_cube = g.cube.as_ref().unwrap();
    assert_eq!(host_cube.move_count, 2);
    assert_eq!(guest_cube.move_count, 2);
    assert_eq!(host_cube.facelets, expected_cube(h, &["R", "U"]));
    assert_eq!(guest_cube.facelets, expected_cube(g, &["F", "D'"]));

    assert_eq!(host.driver().stops(), 1);
    assert_eq!(guest.driver().stops(), 1);
}

#[tokio::test]
async fn same_seed_same_run() {
    let (host_a, guest_a, _) = play(42).await;
    let (host_b, guest_b, _) = play(42).await;
    assert_eq!(host_a.app().state(), host_b.app().state());
    assert_eq!(guest_a.app().state(), guest_b.app().state());

    let (host_c, _, _) = play(43).await;
    assert_ne!(host_a.app().state().match_id, host_c.app().state().match_id);
}

#[tokio::test]
async fn host_sees_guest_leave() {
    let server = create_shared_server(SimEnv::with_seed(2));
    let mut host = client(&server, "alice", vec![
        cmd("create"),
        until(Condition::PlayerCount(2)),
        until(Condition::PlayerCount(1)),
    ]);
    let mut guest = client(&server, "bob", vec![Step::JoinCreated, until(Condition::InMatch)]);

    let (h, g) = tokio::join!(host.run(), guest.run());
    h.unwrap();
    g.unwrap();

    let state = host.app().state();
    assert_eq!(state.phase(), Phase::Lobby);
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].player_id, "alice");
    assert!(host.app().log().iter().any(|line| line.starts_with("<= LOBBY_LEFT_MATCH")));
}

#[tokio::test]
async fn guest_is_promoted_when_host_leaves() {
    let server = create_shared_server(SimEnv::with_seed(3));
    let mut host = client(&server, "alice", vec![cmd("create"), until(Condition::PlayerCount(2))]);
    let mut guest = client(&server, "bob", vec![
        Step::JoinCreated,
        until(Condition::InMatch),
        until(Condition::PlayerCount(1)),
    ]);

    let (h, g) = tokio::join!(host.run(), guest.run());
    h.unwrap();
    g.unwrap();

    let view = guest.app().view();
    assert!(view.is_host());
    assert_eq!(view.me().map(|p| p.role), Some(Role::Host));
}

#[tokio::test]
async fn joining_a_missing_match_shows_server_error() {
    let server = create_shared_server(SimEnv::new());
    let mut rt = client(&server, "carol", vec![cmd("join nope"), until(Condition::ErrorShown)]);
    rt.run().await.unwrap();

    let state = rt.app().state();
    let error = state.last_error.as_ref().unwrap();
    assert_eq!(error.message, "Match not found: nope");
    assert_eq!(state.join_target, "nope");
    assert_eq!(state.phase(), Phase::Idle);
}

#[tokio::test]
async fn guest_cannot_start() {
    let server = create_shared_server(SimEnv::with_seed(4));
    let mut host = client(&server, "alice", vec![
        cmd("create"),
        until(Condition::PlayerCount(2)),
        cmd("ready"),
        until(Condition::PlayerCount(1)),
    ]);
    let mut guest = client(&server, "bob", vec![
        Step::JoinCreated,
        until(Condition::InMatch),
        cmd("ready"),
        until(Condition::AllReady),
        cmd("start"),
    ]);

    let (h, g) = tokio::join!(host.run(), guest.run());
    h.unwrap();
    g.unwrap();

    assert!(!guest.app().state().started);
    assert!(guest.app().log().iter().any(|line| line.starts_with("!! cannot start")));
    assert_eq!(host.app().state().phase(), Phase::Lobby);
}
