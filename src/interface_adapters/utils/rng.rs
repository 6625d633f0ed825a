use crate::domain::RandomSource;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Returns a process-unique, monotonically increasing identifier.
///
/// This avoids collisions that can happen with "timestamp only" IDs when multiple IDs are
/// generated in the same instant.
pub fn rand_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU64::new(now_nanos()));
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Seed for matches started without an explicit one.
pub fn time_seed() -> u64 {
    now_nanos()
}

/// Deterministic match RNG; the same seed replays the same spawns,
/// bounces, and team tie-breaks.
pub struct PcgRandom(Pcg32);

impl PcgRandom {
    pub fn seeded(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl RandomSource for PcgRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}
