use super::session::MatchSettings;
use super::types::{GameEvent, WorldUpdate};
use crate::domain::{GameStage, GameState, PredictionDetails, PredictionService, Team};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const PREDICTION_TITLE: &str = "Chalkboom Wager";
pub const PREDICTION_OUTCOMES: [Team; 2] = [Team::Blue, Team::Red];

/// Drives one match from wagering to game over.
///
/// This task is the only owner of `GameState`; everything from outside
/// arrives through `events_rx` and is applied between frames.
#[allow(clippy::too_many_arguments)]
pub async fn match_task(
    mut state: GameState,
    settings: MatchSettings,
    mut events_rx: mpsc::Receiver<GameEvent>,
    events_tx: mpsc::Sender<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    stage_tx: watch::Sender<GameStage>,
    predictions: Arc<dyn PredictionService>,
    shutdown: Arc<Notify>,
) {
    let mut frame: u64 = 0;

    // send_replace stores the stage even while nobody is subscribed.
    stage_tx.send_replace(state.stage);
    info!(
        wagering_secs = settings.wagering_duration.as_secs_f64(),
        "wagering open"
    );
    spawn_prediction_open(predictions.clone(), events_tx);

    let mut stage_deadline = Instant::now() + settings.wagering_duration;
    let mut last_frame = Instant::now();

    // Frames are scheduled on a fixed interval; each frame measures its own
    // wall-clock progress.
    let mut interval = tokio::time::interval(settings.tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Exit cleanly on teardown.
                info!(frame, "match shut down");
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = events_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        let now = Instant::now();
        match state.stage {
            GameStage::Wagering if now >= stage_deadline => {
                state.open_signup();
                stage_deadline = now + settings.signup_duration;
                stage_tx.send_replace(state.stage);
            }
            GameStage::Signup if now >= stage_deadline => {
                state.start_playing();
                last_frame = now;
                stage_tx.send_replace(state.stage);
            }
            GameStage::Playing => {
                let progress_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
                last_frame = now;
                if let Some(winner) = state.step(progress_ms) {
                    stage_tx.send_replace(state.stage);
                    schedule_prediction_resolve(
                        predictions.clone(),
                        state.prediction.clone(),
                        winner,
                        settings.prediction_resolve_delay,
                    );
                }
            }
            _ => {}
        }

        frame += 1;
        let _ = world_tx.send(WorldUpdate::capture(frame, &state));

        if state.stage == GameStage::GameOver {
            break;
        }
    }
}

fn apply_event(state: &mut GameState, ev: GameEvent) {
    match ev {
        GameEvent::PlayerJoined { name, team_hint } => {
            if !state.add_player(&name, team_hint) {
                debug!(player = %name, stage = ?state.stage, "join ignored");
            }
        }
        GameEvent::BoomTriggered { name } => {
            if state.trigger_boom(&name).is_none() {
                debug!(player = %name, stage = ?state.stage, "boom ignored");
            }
        }
        GameEvent::PredictionOpened(details) => {
            state.set_prediction(details);
        }
    }
}

fn spawn_prediction_open(predictions: Arc<dyn PredictionService>, events_tx: mpsc::Sender<GameEvent>) {
    tokio::spawn(async move {
        match predictions.open(PREDICTION_TITLE, &PREDICTION_OUTCOMES).await {
            Ok(details) => {
                info!(prediction_id = %details.id, "prediction opened");
                if events_tx
                    .send(GameEvent::PredictionOpened(details))
                    .await
                    .is_err()
                {
                    warn!("match ended before the prediction opened");
                }
            }
            Err(e) => warn!(error = %e, "failed to open prediction"),
        }
    });
}

fn schedule_prediction_resolve(
    predictions: Arc<dyn PredictionService>,
    details: Option<PredictionDetails>,
    winner: Team,
    delay: Duration,
) {
    let Some(details) = details else {
        warn!(winner = winner.as_str(), "no open prediction to resolve");
        return;
    };
    let Some(outcome) = details.outcome_for(winner).cloned() else {
        warn!(
            prediction_id = %details.id,
            winner = winner.as_str(),
            "prediction has no outcome for the winner"
        );
        return;
    };

    // Give late wagers time to settle upstream before resolving.
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match predictions.resolve(&details.id, &outcome.id).await {
            Ok(()) => info!(prediction_id = %details.id, outcome_id = %outcome.id, "prediction resolved"),
            Err(e) => warn!(prediction_id = %details.id, error = %e, "failed to resolve prediction"),
        }
    });
}
