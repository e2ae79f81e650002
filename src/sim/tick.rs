//! Per-tick entity stepping
//!
//! Each entity kind is advanced and culled in a single `retain` pass, so an
//! entity removed this tick is never stepped again.

use super::state::{Balloon, FloatingText, Particle};
use crate::consts::PARTICLE_GRAVITY;

/// Outcome of stepping the balloon list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalloonStep {
    /// Horizontal positions of balloons that escaped unpopped
    pub escaped: Vec<f32>,
    /// Popped balloons whose animation finished
    pub faded: u32,
}

/// Rise unpopped balloons, age popped ones, cull escaped and faded
pub fn step_balloons(balloons: &mut Vec<Balloon>) -> BalloonStep {
    let mut result = BalloonStep::default();
    balloons.retain_mut(|b| {
        if b.popped {
            b.pop_age += 1;
            if b.faded() {
                result.faded += 1;
                return false;
            }
        } else {
            b.pos.y += b.vy;
            if b.escaped() {
                result.escaped.push(b.pos.x);
                return false;
            }
        }
        true
    });
    result
}

/// Integrate particles with gravity; returns number expired
pub fn step_particles(particles: &mut Vec<Particle>) -> usize {
    let before = particles.len();
    particles.retain_mut(|p| {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });
    before - particles.len()
}

/// Drift texts upward; returns number expired
pub fn step_texts(texts: &mut Vec<FloatingText>) -> usize {
    let before = texts.len();
    texts.retain_mut(|t| {
        t.pos.y -= 1.0;
        t.life = t.life.saturating_sub(1);
        t.life > 0
    });
    before - texts.len()
}

/// Whole seconds left in a round started at `start_ms`
///
/// Elapsed time is truncated to whole seconds, never rounded. A clock reading
/// before the start counts as no time elapsed.
pub fn seconds_remaining(start_ms: u64, now_ms: u64, round_seconds: u32) -> u32 {
    let elapsed_secs = now_ms.saturating_sub(start_ms) / 1000;
    (round_seconds as u64).saturating_sub(elapsed_secs) as u32
}
