// Pure per-frame systems driven by `GameState::step`.

pub mod booms;
pub mod motion;
pub mod scoring;
pub mod teams;
