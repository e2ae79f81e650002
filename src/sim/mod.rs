//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-based timers only; wall-clock time arrives as a parameter
//! - Injected RNG only
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod game;
pub mod hit;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autoplay::{AutoAction, AutoPlayer};
pub use game::GameSimulation;
pub use hit::{hit_test, pop_reward};
pub use spawn::{particle_burst, spawn_balloon};
pub use state::{
    Balloon, FloatingText, GameEvent, GameMode, Particle, Rgb, RoundStats, RoundSummary,
};
pub use tick::{seconds_remaining, step_balloons, step_particles, step_texts};
