//! Game state and core simulation types
//!
//! Coordinates are logical: x grows to the right, y grows downward, so
//! balloons rise with a negative vertical velocity. Hosts flip y at render
//! time if their display convention differs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Difficulty;

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Difficulty selection screen
    #[default]
    Menu,
    /// Round in progress
    Playing,
    /// Round ended, summary on screen
    GameOver,
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GOLD: Rgb = Rgb::new(255, 215, 0);
    pub const RED: Rgb = Rgb::new(255, 60, 60);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
}

/// A rising balloon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub pos: Vec2,
    pub radius: u32,
    pub color: Rgb,
    /// Vertical velocity per tick (negative = upward)
    pub vy: f32,
    pub popped: bool,
    /// Ticks since popped (0 while unpopped)
    pub pop_age: u32,
}

impl Balloon {
    pub fn new(pos: Vec2, radius: u32, color: Rgb, vy: f32) -> Self {
        Self {
            pos,
            radius,
            color,
            vy,
            popped: false,
            pop_age: 0,
        }
    }

    /// Whether `point` lies on or inside the balloon
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius as f32
    }

    /// Unpopped balloon has risen past the top of the play area
    pub fn escaped(&self) -> bool {
        !self.popped && self.pos.y < -OFFSCREEN_MARGIN
    }

    /// Popped balloon has finished its pop animation
    pub fn faded(&self) -> bool {
        self.popped && self.pop_age > POP_FADE_TICKS
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub radius: u32,
    /// Ticks remaining
    pub life: u32,
}

/// Drifting text (score popups, announcements)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: Rgb,
    /// Ticks remaining
    pub life: u32,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: Rgb, life: u32) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            life,
        }
    }
}

/// Gameplay events for the host (sound, logging, analytics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BalloonPopped { pos: Vec2, reward: u64, combo: u32 },
    BalloonMissed { x: f32 },
    SpecialPowerUsed { uses: u32, popped: u32 },
    RoundStarted { difficulty: Difficulty },
    RoundOver { score: u64, new_record: bool },
}

/// Scores and counters for the current round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub pop_count: u32,
    pub miss_count: u32,
    pub special_power_uses: u32,
}

/// Game over screen contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub difficulty: Difficulty,
    pub score: u64,
    pub high_score: u64,
    pub new_record: bool,
    pub max_combo: u32,
    pub pop_count: u32,
    pub miss_count: u32,
    pub special_power_uses: u32,
    /// Pops / (pops + misses), 0 when nothing happened
    pub accuracy: f32,
    /// Seconds of frame time fed to the round
    pub play_time: f32,
}

impl RoundSummary {
    pub fn accuracy_of(pops: u32, misses: u32) -> f32 {
        let total = pops + misses;
        if total == 0 {
            0.0
        } else {
            pops as f32 / total as f32
        }
    }
}
