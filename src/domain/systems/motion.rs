use crate::domain::ports::RandomSource;
use crate::domain::state::Player;
use std::f64::consts::{PI, TAU};

/// Trig components smaller than this are treated as exactly zero.
pub const AXIS_EPSILON: f64 = 1e-8;
/// Upper bound of the random heading change applied after a bounce.
pub const MAX_BOUNCE_JITTER: f64 = PI / 9.0;

#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    pub speed: f64, // px/s
    pub arena_width: f64,
    pub arena_height: f64,
}

pub fn advance(p: &mut Player, elapsed_ms: f64, cfg: MotionConfig, rng: &mut dyn RandomSource) {
    let max_x = (cfg.arena_width - p.sprite_width).max(0.0);
    let max_y = (cfg.arena_height - p.sprite_height).max(0.0);
    let distance = (elapsed_ms / 1000.0) * cfg.speed;

    // Screen y grows downwards, so a positive sine moves the player up.
    let (sin, cos) = p.angle.sin_cos();
    let mut x = p.position.x;
    if cos.abs() > AXIS_EPSILON {
        x += distance * cos;
    }
    let mut y = p.position.y;
    if sin.abs() > AXIS_EPSILON {
        y -= distance * sin;
    }

    let bounced = x > max_x || x < 0.0 || y > max_y || y < 0.0;

    if x > max_x {
        x = max_x - (x - max_x);
        p.angle = reflect_off_side_wall(p.angle, p.y_dir);
        p.x_dir = -1.0;
    } else if x < 0.0 {
        x = -x;
        p.angle = reflect_off_side_wall(p.angle, p.y_dir);
        p.x_dir = 1.0;
    }

    if y > max_y {
        y = max_y - (y - max_y);
        p.angle = reflect_off_floor_or_ceiling(p.angle);
        p.y_dir = -1.0;
    } else if y < 0.0 {
        y = -y;
        p.angle = reflect_off_floor_or_ceiling(p.angle);
        p.y_dir = 1.0;
    }

    if bounced {
        let jitter = rng.next_f64() * MAX_BOUNCE_JITTER;
        p.angle += sign(p.angle) * jitter;
        p.angle = p.angle.rem_euclid(TAU);
    }

    // An overshoot longer than the arena can still land outside after mirroring.
    p.position.x = x.max(0.0).min(max_x);
    p.position.y = y.max(0.0).min(max_y);
}

/// Adds `elapsed_ms` worth of charge at `charge_rate` per second, capped at 1.
pub fn accumulate_charge(p: &mut Player, elapsed_ms: f64, charge_rate: f64) {
    p.charge = (p.charge + (elapsed_ms / 1000.0) * charge_rate).min(1.0);
}

// Mirror about the vertical axis. Headings travelling down (y_dir > 0) sit in
// (pi, 2pi), so they are reflected about 3pi/2 to stay in range.
fn reflect_off_side_wall(angle: f64, y_dir: f64) -> f64 {
    if y_dir > 0.0 {
        let theta = angle - 3.0 * PI / 2.0;
        3.0 * PI / 2.0 - theta
    } else {
        let theta = PI / 2.0 - angle;
        PI / 2.0 + theta
    }
}

// Mirror about the horizontal axis; the same for both horizontal directions.
fn reflect_off_floor_or_ceiling(angle: f64) -> f64 {
    TAU - angle
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
