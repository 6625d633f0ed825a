// Framework bootstrap for the match server runtime.

use crate::frameworks::config;
use crate::interface_adapters::clients::{ChatBotClient, PredictionClient};
use crate::interface_adapters::net::{spawn_match_serializer, state_handler, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{PcgRandom, time_seed};
use crate::use_cases::spawn_match;

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state()?;
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/state", get(state_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let tau_url = config::tau_url();
    let token = config::tau_token();

    let prediction_timeout = config::prediction_timeout();
    let predictions = PredictionClient::new(
        tau_url.clone(),
        token.clone(),
        config::broadcaster_id(),
        config::PREDICTION_WINDOW_SECS,
        prediction_timeout,
    )
    .map_err(|e| std::io::Error::other(format!("failed to initialize prediction client: {e}")))?;
    tracing::debug!(
        tau_url = %tau_url,
        prediction_timeout_ms = prediction_timeout.as_millis(),
        "prediction client configured"
    );

    let seed = config::rng_seed().unwrap_or_else(time_seed);
    let settings = config::match_settings();
    tracing::info!(
        seed,
        arena_width = settings.arena.width,
        arena_height = settings.arena.height,
        "starting match"
    );

    let game = spawn_match(
        settings,
        Box::new(PcgRandom::seeded(seed)),
        Arc::new(predictions),
    );
    spawn_match_serializer(&game);

    // Chat feeds the match until its event queue closes.
    let chat = ChatBotClient::new(
        &tau_url,
        &config::bot_name(),
        token,
        config::CHAT_RECONNECT_DELAY,
    );
    tokio::spawn(chat.run(game.events_tx.clone()));

    Ok(Arc::new(AppState { game }))
}
