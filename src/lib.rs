//! Balloon Pop - a 60 second arcade popping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balloons, particles, scoring, round timer)
//! - `highscores`: High score storage seam and error types
//! - `platform`: Native host helpers (fixed-step clock, file storage)
//! - `settings`: Immutable game configuration and difficulty labels

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreError, HighScoreStore, MemoryHighScoreStore};
pub use settings::{Difficulty, GameConfig};
pub use sim::{GameMode, GameSimulation};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation cadence; all entity timers are measured in ticks at this rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Length of one round
    pub const ROUND_SECONDS: u32 = 60;

    /// Per-tick probability of a new balloon
    pub const SPAWN_CHANCE: f64 = 0.08;
    /// Balloons spawn at least this far from the side edges
    pub const SPAWN_EDGE_MARGIN: i32 = 60;
    /// Distance beyond the play area where balloons spawn / count as escaped
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Popped balloons linger this many ticks for the pop animation
    pub const POP_FADE_TICKS: u32 = 10;

    /// Particle burst per popped balloon
    pub const PARTICLES_PER_POP: usize = 12;
    pub const PARTICLE_LIFE: u32 = 50;
    pub const PARTICLE_GRAVITY: f32 = 0.15;
    pub const PARTICLE_MIN_SPEED: f32 = 2.0;
    pub const PARTICLE_MAX_SPEED: f32 = 6.0;
    pub const PARTICLE_MIN_RADIUS: u32 = 2;
    pub const PARTICLE_MAX_RADIUS: u32 = 5;

    /// Floating text lifetimes (ticks)
    pub const POP_TEXT_LIFE: u32 = 40;
    pub const MISS_TEXT_LIFE: u32 = 30;
    pub const POWER_TEXT_LIFE: u32 = 60;

    /// Score for a pop with no combo; each combo step adds `COMBO_BONUS`
    pub const BASE_POP_SCORE: u64 = 10;
    pub const COMBO_BONUS: u64 = 2;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
