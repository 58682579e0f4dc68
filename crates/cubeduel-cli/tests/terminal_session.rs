//! The terminal driver against a real WebSocket server.
//!
//! The server answers every create request with a fixed match id. Lines are
//! fed through the driver's channel and the rendered screens are captured in
//! a shared buffer.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
    time::Duration,
};

use cubeduel_cli::{Driver as _, Runtime, TerminalDriver};
use cubeduel_client::{ClientConfig, Identity, Phase};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::tungstenite::Message;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        while let Some(Ok(message)) = ws.next().await {
            match message {
                Message::Text(text) if text.as_str().contains("LOBBY_CREATE_MATCH") => {
                    let reply = r#"{"type":"LOBBY_MATCH_CREATED","payload":{"matchId":"m1"}}"#;
                    ws.send(Message::Text(reply.into())).await.unwrap();
                },
                Message::Close(_) => break,
                _ => {},
            }
        }
    });

    format!("ws://{addr}/ws")
}

async fn wait_for(buf: &SharedBuf, needle: &str) {
    let found = timeout(Duration::from_secs(5), async {
        while !buf.text().contains(needle) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(found.is_ok(), "never rendered {needle:?}:\n{}", buf.text());
}

#[tokio::test]
async fn create_match_over_websocket() {
    let url = start_server().await;
    let (lines, rx) = mpsc::channel(4);
    let out = SharedBuf::default();
    let driver = TerminalDriver::new(rx, out.clone(), false);
    let mut runtime = Runtime::new(driver, Identity::new("p1"), ClientConfig::default(), url);

    let feed = async {
        wait_for(&out, "| connected").await;
        lines.send("create".into()).await.unwrap();
        wait_for(&out, "status: LOBBY | match: m1").await;
        lines.send("quit".into()).await.unwrap();
    };
    let (result, ()) = tokio::join!(runtime.run(), feed);
    result.unwrap();

    assert_eq!(runtime.app().state().phase(), Phase::Lobby);
    assert!(out.text().contains(r#"=> LOBBY_CREATE_MATCH {"playerId":"p1"}"#));
    assert!(!runtime.driver().is_connected());
}

#[tokio::test]
async fn unreachable_server_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    drop(listener);

    let (lines, rx) = mpsc::channel(4);
    let out = SharedBuf::default();
    let driver = TerminalDriver::new(rx, out.clone(), false);
    let mut runtime = Runtime::new(driver, Identity::new("p1"), ClientConfig::default(), url);

    lines.send("ready".into()).await.unwrap();
    lines.send("quit".into()).await.unwrap();
    runtime.run().await.unwrap();

    let screen = out.text();
    assert!(screen.contains("error (see console)"));
    assert!(screen.contains("!! not in a match"));
}
