mod support;

use axum::{
    Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use chalkboom_server::domain::Team;
use chalkboom_server::interface_adapters::clients::ChatBotClient;
use chalkboom_server::use_cases::GameEvent;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// Handshakes received by the mock relay, as (bot name, first frame).
type Handshakes = Arc<Mutex<Vec<(String, Value)>>>;

// Frames sent on every connection before the relay hangs up.
fn relay_frames() -> Vec<String> {
    vec![
        json!({ "event": "connected" }).to_string(),
        json!({
            "irc_username": "chalkboom",
            "data": { "message-text": "hello chat", "tags": { "display-name": "Ann" } }
        })
        .to_string(),
        json!({
            "irc_username": "chalkboom",
            "data": {
                "message-text": "!me",
                "tags": { "display-name": "Ann", "badge-info": "predictions/Red" }
            }
        })
        .to_string(),
        "not json".to_string(),
        json!({
            "irc_username": "chalkboom",
            "data": { "message-text": "!boom", "tags": { "display-name": "Ann" } }
        })
        .to_string(),
    ]
}

async fn chat_socket(
    ws: WebSocketUpgrade,
    Path(bot): Path<String>,
    State(handshakes): State<Handshakes>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay(socket, bot, handshakes))
}

async fn relay(mut socket: WebSocket, bot: String, handshakes: Handshakes) {
    let Some(Ok(Message::Text(hello))) = socket.recv().await else {
        return;
    };
    let hello: Value = serde_json::from_str(hello.as_str()).unwrap_or(Value::Null);
    handshakes.lock().expect("lock").push((bot, hello));

    for frame in relay_frames() {
        if socket.send(Message::Text(frame.into())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

async fn mock_relay() -> (String, Handshakes) {
    let handshakes: Handshakes = Arc::default();
    let app = Router::new()
        .route("/ws/chat-bots/{bot}/", get(chat_socket))
        .with_state(handshakes.clone());
    (support::serve_mock(app).await, handshakes)
}

async fn next_event(rx: &mut mpsc::Receiver<GameEvent>) -> GameEvent {
    tokio::time::timeout(Duration::from_secs(3), rx.recv())
        .await
        .expect("event in time")
        .expect("client still running")
}

#[tokio::test]
async fn forwards_commands_and_reconnects_after_close() {
    let (base_url, handshakes) = mock_relay().await;
    let client = ChatBotClient::new(&base_url, "chalk", "secret-token", Duration::from_millis(20));
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let task = tokio::spawn(client.run(events_tx));

    // Two connections' worth: the relay closes after each batch.
    for _ in 0..2 {
        match next_event(&mut events_rx).await {
            GameEvent::PlayerJoined { name, team_hint } => {
                assert_eq!(name, "Ann");
                assert_eq!(team_hint, Some(Team::Red));
            }
            other => panic!("expected a join, got {other:?}"),
        }
        match next_event(&mut events_rx).await {
            GameEvent::BoomTriggered { name } => assert_eq!(name, "Ann"),
            other => panic!("expected a boom, got {other:?}"),
        }
    }

    let seen = handshakes.lock().expect("lock").clone();
    assert!(seen.len() >= 2, "{seen:?}");
    for (bot, hello) in &seen {
        assert_eq!(bot, "chalk");
        assert_eq!(hello, &json!({ "token": "secret-token" }));
    }

    task.abort();
}

#[tokio::test]
async fn stops_once_the_match_queue_closes() {
    let (base_url, _handshakes) = mock_relay().await;
    let client = ChatBotClient::new(&base_url, "chalk", "secret-token", Duration::from_millis(20));
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let task = tokio::spawn(client.run(events_tx));

    next_event(&mut events_rx).await;
    drop(events_rx);

    tokio::time::timeout(Duration::from_secs(3), task)
        .await
        .expect("client stopped in time")
        .expect("client task did not panic");
}
