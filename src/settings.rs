//! Game configuration and difficulty labels
//!
//! The simulation receives one `GameConfig` at construction and never mutates
//! it. Hosts may load an override from a JSON file.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Rgb;

/// Difficulty selection from the menu
///
/// Stored on the simulation and reported in the round summary. No rule
/// currently varies by difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, normal or hard)")),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default balloon colors
pub const DEFAULT_PALETTE: [Rgb; 8] = [
    Rgb::new(255, 69, 58),
    Rgb::new(255, 159, 10),
    Rgb::new(255, 214, 10),
    Rgb::new(48, 209, 88),
    Rgb::new(100, 210, 255),
    Rgb::new(10, 132, 255),
    Rgb::new(191, 90, 242),
    Rgb::new(255, 55, 95),
];

/// Immutable configuration for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical play area width
    pub width: f32,
    /// Logical play area height (larger y is lower on screen)
    pub height: f32,
    /// Balloon colors, picked uniformly
    pub palette: Vec<Rgb>,
    /// Balloon radius range (inclusive)
    pub min_radius: u32,
    pub max_radius: u32,
    /// Balloon rise speed range in units per tick (inclusive)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Per-tick probability of spawning a balloon
    pub spawn_chance: f64,
    /// Round length
    pub round_seconds: u32,
    /// Show a "MISS!" floating text when a balloon escapes
    pub miss_text: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            palette: DEFAULT_PALETTE.to_vec(),
            min_radius: 20,
            max_radius: 35,
            min_speed: 1.5,
            max_speed: 3.0,
            spawn_chance: SPAWN_CHANCE,
            round_seconds: ROUND_SECONDS,
            miss_text: false,
        }
    }
}

impl GameConfig {
    /// Horizontal spawn range for balloon centers (inclusive)
    pub fn spawn_x_range(&self) -> (i32, i32) {
        let lo = SPAWN_EDGE_MARGIN;
        let hi = (self.width as i32 - SPAWN_EDGE_MARGIN).max(lo);
        (lo, hi)
    }

    /// Center of the play area
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Fix values the simulation cannot work with
    pub fn validate(mut self) -> Self {
        let defaults = Self::default();

        if !(self.width.is_finite() && self.width > 0.0) {
            log::warn!("Invalid width {}, using {}", self.width, defaults.width);
            self.width = defaults.width;
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            log::warn!("Invalid height {}, using {}", self.height, defaults.height);
            self.height = defaults.height;
        }
        if self.palette.is_empty() {
            log::warn!("Empty palette, using default colors");
            self.palette = defaults.palette;
        }
        if self.min_radius == 0 || self.min_radius > self.max_radius {
            log::warn!(
                "Invalid radius range {}..={}, using {}..={}",
                self.min_radius,
                self.max_radius,
                defaults.min_radius,
                defaults.max_radius
            );
            self.min_radius = defaults.min_radius;
            self.max_radius = defaults.max_radius;
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed && self.max_speed.is_finite())
        {
            log::warn!(
                "Invalid speed range {}..={}, using {}..={}",
                self.min_speed,
                self.max_speed,
                defaults.min_speed,
                defaults.max_speed
            );
            self.min_speed = defaults.min_speed;
            self.max_speed = defaults.max_speed;
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            log::warn!("Spawn chance {} out of range, clamping", self.spawn_chance);
            self.spawn_chance = if self.spawn_chance.is_nan() {
                defaults.spawn_chance
            } else {
                self.spawn_chance.clamp(0.0, 1.0)
            };
        }
        if self.round_seconds == 0 {
            log::warn!("Round length of 0s, using {}s", defaults.round_seconds);
            self.round_seconds = defaults.round_seconds;
        }
        self
    }

    /// Load a config from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<GameConfig>(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config.validate()
                }
                Err(e) => {
                    log::warn!("Malformed config {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No config at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
