use crate::domain::Arena;
use crate::domain::tuning::{BoomTuning, PlayerTuning};
use crate::use_cases::MatchSettings;
use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("CHALKBOOM_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn tau_url() -> String {
    env::var("TAU_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

pub fn tau_token() -> String {
    env::var("TAU_TOKEN").unwrap_or_default()
}

pub fn bot_name() -> String {
    env::var("BOT_NAME").unwrap_or_else(|_| "chalkboom".to_string())
}

pub fn broadcaster_id() -> String {
    env::var("BROADCASTER_ID").unwrap_or_default()
}

pub fn arena() -> Arena {
    Arena {
        width: env_f64("ARENA_WIDTH").unwrap_or(1920.0),
        height: env_f64("ARENA_HEIGHT").unwrap_or(1080.0),
    }
}

// None means "derive one from the clock".
pub fn rng_seed() -> Option<u64> {
    env::var("RNG_SEED").ok().and_then(|v| v.parse().ok())
}

pub fn prediction_timeout() -> Duration {
    let millis = env::var("PREDICTION_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(5000);
    Duration::from_millis(millis)
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

pub const EVENT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);
pub const WAGERING_DURATION: Duration = Duration::from_secs(60);
pub const SIGNUP_DURATION: Duration = Duration::from_secs(20);

pub const PREDICTION_WINDOW_SECS: u32 = 60;
pub const PREDICTION_RESOLVE_DELAY: Duration = Duration::from_millis(7500);
pub const CHAT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

pub fn match_settings() -> MatchSettings {
    MatchSettings {
        arena: arena(),
        player_tuning: PlayerTuning::default(),
        boom_tuning: BoomTuning::default(),
        event_channel_capacity: EVENT_CHANNEL_CAPACITY,
        world_broadcast_capacity: WORLD_BROADCAST_CAPACITY,
        tick_interval: TICK_INTERVAL,
        wagering_duration: WAGERING_DURATION,
        signup_duration: SIGNUP_DURATION,
        prediction_resolve_delay: PREDICTION_RESOLVE_DELAY,
    }
}
