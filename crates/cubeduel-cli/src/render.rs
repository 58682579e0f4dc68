//! Plain-text rendering of the application state.
//!
//! Rendering is a pure function of [`App`] so the layout can be checked with
//! exact-string tests. The terminal driver only decides where the text goes.

use cubeduel_app::{App, ConnectionStatus};
use cubeduel_client::{ClientViewState, CubeView, LastError};
use cubeduel_core::{FaceName, Faces};
use cubeduel_proto::payloads::{PlayerInfo, Role, system::Severity};

/// Diagnostic lines shown under the state, newest first.
pub const LOG_LINES: usize = 8;

/// Render the whole screen.
pub fn render(app: &App) -> String {
    let state = app.state();
    let mut lines = vec![header(app), status_line(state)];

    if !state.players.is_empty() {
        lines.push("players:".to_string());
        lines.extend(state.players.iter().map(|p| player_line(p, app.identity().is(&p.player_id))));
    }
    if state.started {
        lines.push(scramble_line(state));
    }
    if !state.moves.is_empty() {
        lines.extend(moves(state, app.recent_moves()));
    }
    if let Some(cube) = &state.cube {
        lines.extend(cube_lines(cube));
    }
    if let Some(error) = &state.last_error {
        lines.push(error_line(error));
    }
    if let Some(message) = app.status_message() {
        lines.push(format!("> {message}"));
    }
    if !app.log().is_empty() {
        lines.push("log:".to_string());
        lines.extend(app.log().iter().take(LOG_LINES).map(|line| format!("  {line}")));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn header(app: &App) -> String {
    format!(
        "cubeduel | you: {} | {} | {}",
        app.identity().player_id(),
        app.server_url(),
        connection_label(app.connection_status())
    )
}

fn connection_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Disconnected => "disconnected",
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "connected",
    }
}

/// `status: PHASE`, with the match id once there is one.
pub fn status_line(state: &ClientViewState) -> String {
    match &state.match_id {
        Some(id) => format!("status: {} | match: {id}", state.phase().label()),
        None => format!("status: {}", state.phase().label()),
    }
}

fn player_line(player: &PlayerInfo, is_me: bool) -> String {
    let role = match player.role {
        Role::Host => "HOST",
        Role::Guest => "GUEST",
        Role::Unknown => "?",
    };
    let ready = if player.ready { "ready" } else { "waiting" };
    let me = if is_me { " (you)" } else { "" };
    format!("  {} {role} {ready}{me}", player.player_id)
}

fn scramble_line(state: &ClientViewState) -> String {
    let scramble = if state.scramble.is_empty() { "-".to_string() } else { state.scramble.join(" ") };
    match state.scramble_seed {
        Some(seed) => format!("scramble: {scramble} (seed {seed})"),
        None => format!("scramble: {scramble}"),
    }
}

fn moves(state: &ClientViewState, recent: usize) -> Vec<String> {
    let shown = state.moves.recent(recent);
    let mut lines = vec![if shown.len() < state.moves.len() {
        format!("moves (last {} of {}):", shown.len(), state.moves.len())
    } else {
        format!("moves ({}):", state.moves.len())
    }];
    lines.extend(shown.iter().map(|m| format!("  #{} {} {}", m.seq, m.player_id, m.notation)));
    lines
}

fn cube_lines(cube: &CubeView) -> Vec<String> {
    let solved = if cube.solved { " SOLVED" } else { "" };
    let mut lines = vec![format!("cube: {} moves{solved}", cube.move_count)];
    lines.extend(cube_net(&cube.faces()));
    lines
}

/// Unfolded cube: U on top, then L F R B, then D.
pub fn cube_net(faces: &Faces) -> Vec<String> {
    let row = |name: FaceName, i: usize| -> String {
        faces.get(name).stickers().skip(i * 3).take(3).map(cubeduel_core::Sticker::glyph).collect()
    };

    let mut lines = Vec::with_capacity(9);
    lines.extend((0..3).map(|i| format!("    {}", row(FaceName::U, i))));
    lines.extend((0..3).map(|i| {
        [FaceName::L, FaceName::F, FaceName::R, FaceName::B].map(|face| row(face, i)).join(" ")
    }));
    lines.extend((0..3).map(|i| format!("    {}", row(FaceName::D, i))));
    lines
}

fn error_line(error: &LastError) -> String {
    let severity = match error.severity {
        Severity::Critical => "CRITICAL",
        Severity::Warning => "WARNING",
        Severity::Info => "INFO",
        Severity::Unknown => "ERROR",
    };
    format!("error: [{severity}] {}", error.message)
}

#[cfg(test)]
mod tests {
    use cubeduel_app::AppEvent;
    use cubeduel_client::{ClientConfig, Identity};
    use cubeduel_core::{MoveLog, facelets};
    use cubeduel_proto::payloads::game::MoveApplied;

    use super::*;

    const SOLVED: &str = "WWWWWWWWWYYYYYYYYYOOOOOOOOORRRRRRRRRGGGGGGGGGBBBBBBBBB";

    fn app_with(state: ClientViewState) -> App {
        let mut app = App::new("ws://localhost:8083/ws".into(), Identity::new("p1"), ClientConfig::default());
        app.handle(AppEvent::StateChanged(Box::new(state)));
        app
    }

    fn applied(seq: u64, player: &str, notation: &str) -> MoveApplied {
        MoveApplied {
            match_id: "m1".into(),
            player_id: player.into(),
            notation: notation.into(),
            seq,
            server_ts: 0,
        }
    }

    #[test]
    fn idle_screen() {
        let app = app_with(ClientViewState::new());
        assert_eq!(
            render(&app),
            "cubeduel | you: p1 | ws://localhost:8083/ws | disconnected\nstatus: IDLE\n"
        );
    }

    #[test]
    fn lobby_screen() {
        let state = ClientViewState {
            match_id: Some("m1".into()),
            players: vec![PlayerInfo::new("p1", true, Role::Host), PlayerInfo::new("p2", false, Role::Guest)],
            ..Default::default()
        };
        let mut app = app_with(state);
        app.handle(AppEvent::Connected);
        app.handle(AppEvent::Diagnostic("<= LOBBY_PLAYER_JOINED {}".into()));

        assert_eq!(
            render(&app),
            "cubeduel | you: p1 | ws://localhost:8083/ws | connected\n\
             status: LOBBY | match: m1\n\
             players:\n\
             \x20 p1 HOST ready (you)\n\
             \x20 p2 GUEST waiting\n\
             log:\n\
             \x20 <= LOBBY_PLAYER_JOINED {}\n"
        );
    }

    #[test]
    fn running_screen_with_cube() {
        let mut moves = MoveLog::new();
        moves.append(applied(2, "p2", "U'"));
        moves.append(applied(1, "p1", "R"));
        let state = ClientViewState {
            match_id: Some("m1".into()),
            started: true,
            scramble_seed: Some(42),
            scramble: vec!["R".into(), "U2".into()],
            moves,
            cube: Some(CubeView { facelets: SOLVED.into(), move_count: 1, solved: true }),
            ..Default::default()
        };

        let screen = render(&app_with(state));
        let lines: Vec<&str> = screen.lines().collect();
        assert_eq!(&lines[1..], &[
            "status: RUNNING | match: m1",
            "scramble: R U2 (seed 42)",
            "moves (2):",
            "  #1 p1 R",
            "  #2 p2 U'",
            "cube: 1 moves SOLVED",
            "    WWW",
            "    WWW",
            "    WWW",
            "OOO GGG RRR BBB",
            "OOO GGG RRR BBB",
            "OOO GGG RRR BBB",
            "    YYY",
            "    YYY",
            "    YYY",
        ]);
    }

    #[test]
    fn recent_moves_are_limited() {
        let mut moves = MoveLog::new();
        for seq in 1..=5 {
            moves.append(applied(seq, "p2", "F"));
        }
        let state = ClientViewState { match_id: Some("m1".into()), moves, ..Default::default() };
        let config = ClientConfig { recent_moves: 2, ..ClientConfig::default() };
        let mut app = App::new("ws://x".into(), Identity::new("p1"), config);
        app.handle(AppEvent::StateChanged(Box::new(state)));

        let screen = render(&app);
        assert!(screen.contains("moves (last 2 of 5):\n  #4 p2 F\n  #5 p2 F\n"));
    }

    #[test]
    fn partial_cube_is_padded() {
        let net = cube_net(&facelets::decode("WYOR"));
        assert_eq!(net[0], "    WYO");
        assert_eq!(net[1], "    R..");
        assert_eq!(net[3], "... ... ... ...");
        assert_eq!(net.len(), 9);
    }

    #[test]
    fn error_and_status_message() {
        let state = ClientViewState {
            last_error: Some(LastError { message: "Match not found: m9".into(), severity: Severity::Warning }),
            ..Default::default()
        };
        let mut app = app_with(state);
        app.set_status("Joining m9...");

        let screen = render(&app);
        assert!(screen.contains("\nerror: [WARNING] Match not found: m9\n> Joining m9...\n"));
    }

    #[test]
    fn log_shows_newest_lines_only() {
        let mut app = app_with(ClientViewState::new());
        for i in 0..20 {
            app.handle(AppEvent::Diagnostic(format!("line {i}")));
        }

        let screen = render(&app);
        let log: Vec<&str> = screen.lines().skip_while(|l| *l != "log:").skip(1).collect();
        assert_eq!(log.len(), LOG_LINES);
        assert_eq!(log[0], "  line 19");
    }
}
