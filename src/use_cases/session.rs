// Match orchestration: wiring channels and spawning the match task.

use crate::domain::tuning::{BoomTuning, PlayerTuning};
use crate::domain::{Arena, GameStage, GameState, PredictionService, RandomSource};
use crate::use_cases::game::match_task;
use crate::use_cases::{GameEvent, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};

/// Everything a match needs, passed in explicitly at spawn time.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub arena: Arena,
    pub player_tuning: PlayerTuning,
    pub boom_tuning: BoomTuning,
    /// Capacity for inbound chat/prediction events.
    pub event_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Frame interval for the match loop.
    pub tick_interval: Duration,
    pub wagering_duration: Duration,
    pub signup_duration: Duration,
    /// Wait between declaring a winner and resolving the prediction.
    pub prediction_resolve_delay: Duration,
}

/// Channels into and out of a running match.
#[derive(Clone)]
pub struct MatchHandle {
    /// Sender for events into the match task.
    pub events_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized world update.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    /// Watch sender for stage transitions.
    pub stage_tx: watch::Sender<GameStage>,
    shutdown: Arc<Notify>,
}

impl MatchHandle {
    /// Stops the frame loop at its next wake-up.
    pub fn shutdown(&self) {
        // notify_one keeps a permit if the task is between frames.
        self.shutdown.notify_one();
    }
}

/// Creates the match channels and spawns its task.
pub fn spawn_match(
    settings: MatchSettings,
    rng: Box<dyn RandomSource>,
    predictions: Arc<dyn PredictionService>,
) -> MatchHandle {
    let (events_tx, events_rx) = mpsc::channel::<GameEvent>(settings.event_channel_capacity);
    let (world_tx, _world_rx) = broadcast::channel::<WorldUpdate>(settings.world_broadcast_capacity);
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(settings.world_broadcast_capacity);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
    let (stage_tx, _stage_rx) = watch::channel::<GameStage>(GameStage::Wagering);
    let shutdown = Arc::new(Notify::new());

    let state = GameState::new(
        settings.arena,
        settings.player_tuning,
        settings.boom_tuning,
        rng,
    );

    tokio::spawn(match_task(
        state,
        settings,
        events_rx,
        events_tx.clone(),
        world_tx.clone(),
        stage_tx.clone(),
        predictions,
        shutdown.clone(),
    ));

    MatchHandle {
        events_tx,
        world_tx,
        world_bytes_tx,
        world_latest_tx,
        stage_tx,
        shutdown,
    }
}
