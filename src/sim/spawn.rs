//! Randomized entity creation
//!
//! Every random draw goes through the caller's RNG so seeded runs replay
//! exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{Balloon, Particle, Rgb};
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::settings::GameConfig;

/// Roll the per-tick spawn chance
pub fn should_spawn<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> bool {
    rng.random_bool(config.spawn_chance)
}

/// New balloon just below the play area
pub fn spawn_balloon<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Balloon {
    let (x_lo, x_hi) = config.spawn_x_range();
    let x = rng.random_range(x_lo..=x_hi) as f32;
    let y = config.height + OFFSCREEN_MARGIN;
    let radius = rng.random_range(config.min_radius..=config.max_radius);
    let color = config.palette[rng.random_range(0..config.palette.len())];
    let speed = rng.random_range(config.min_speed..=config.max_speed);

    Balloon::new(Vec2::new(x, y), radius, color, -speed)
}

/// Burst of particles flying out of a popped balloon
pub fn particle_burst<R: Rng + ?Sized>(rng: &mut R, at: Vec2, color: Rgb) -> Vec<Particle> {
    (0..PARTICLES_PER_POP)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(PARTICLE_MIN_SPEED..=PARTICLE_MAX_SPEED);
            Particle {
                pos: at,
                vel: polar_to_cartesian(speed, angle),
                color,
                radius: rng.random_range(PARTICLE_MIN_RADIUS..=PARTICLE_MAX_RADIUS),
                life: PARTICLE_LIFE,
            }
        })
        .collect()
}
