use crate::interface_adapters::protocol::{ServerMessage, WorldUpdateDto};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::rand_id;
use crate::use_cases::{MatchHandle, WorldUpdate};

use axum::{
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::SinkExt;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    WorldUpdatesClosed,
    StageClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each world update once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Latest bytes serve /state and lag recovery, with or without viewers.
                world_latest_tx.send_replace(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_match_serializer(game: &MatchHandle) {
    tokio::spawn(world_update_serializer(
        game.world_tx.subscribe(),
        game.world_bytes_tx.clone(),
        game.world_latest_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let game = state.game.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, game))
}

async fn handle_socket(mut socket: WebSocket, game: MatchHandle) {
    // Viewers are anonymous; the id only correlates log lines.
    let conn_id = rand_id();
    let span = info_span!("viewer", conn_id);

    async move {
        info!("viewer connected");
        match run_viewer_loop(&mut socket, &game).await {
            Ok(()) => info!("viewer disconnected"),
            Err(NetError::WorldUpdatesClosed) | Err(NetError::StageClosed) => {
                info!("match ended; closing viewer");
            }
            Err(e) => warn!(error = ?e, "viewer loop exited with error"),
        }
        if let Err(err) = socket.close().await {
            debug!(error = ?err, "socket close error");
        }
    }
    .instrument(span)
    .await
}

async fn run_viewer_loop(socket: &mut WebSocket, game: &MatchHandle) -> Result<(), NetError> {
    // Subscribe before sending anything so no frame falls in between.
    let mut world_bytes_rx = game.world_bytes_tx.subscribe();
    let world_latest_rx = game.world_latest_tx.subscribe();
    let mut stage_rx = game.stage_tx.subscribe();

    let stage = *stage_rx.borrow_and_update();
    send_message(socket, &ServerMessage::Stage(stage.into())).await?;

    let latest = world_latest_rx.borrow().clone();
    if !latest.is_empty() {
        socket.send(Message::Text(latest)).await?;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                // Viewers only listen; anything but a close is ignored.
                match incoming {
                    None | Some(Ok(Message::Close(_))) => return Ok(()),
                    Some(Err(e)) => return Err(NetError::Ws(e)),
                    Some(Ok(_)) => {}
                }
            }

            world_msg = world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => socket.send(Message::Text(bytes)).await?,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "world updates lagged; sending snapshot");
                        let latest = world_latest_rx.borrow().clone();
                        if !latest.is_empty() {
                            socket.send(Message::Text(latest)).await?;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(NetError::WorldUpdatesClosed);
                    }
                }
            }

            changed = stage_rx.changed() => {
                if changed.is_err() {
                    return Err(NetError::StageClosed);
                }
                let stage = *stage_rx.borrow_and_update();
                send_message(socket, &ServerMessage::Stage(stage.into())).await?;
            }
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    socket.send(Message::Text(txt.into())).await?;
    Ok(())
}
