//! Idle/demo player
//!
//! Plays a round on its own: taps the balloon closest to escaping and fires
//! the special power when the screen gets crowded. Deterministic, so seeded
//! demo runs replay exactly.

use glam::Vec2;
use rand::Rng;

use super::game::GameSimulation;
use super::state::Balloon;

/// What the autoplayer wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoAction {
    Tap(Vec2),
    SpecialPower,
}

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    /// Ticks between actions
    tap_interval: u32,
    /// Unpopped on-screen balloons that trigger the special power (0 = never)
    power_threshold: usize,
    cooldown: u32,
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self::new(12, 6)
    }
}

impl AutoPlayer {
    pub fn new(tap_interval: u32, power_threshold: usize) -> Self {
        Self {
            tap_interval,
            power_threshold,
            cooldown: 0,
        }
    }

    /// Pick an action for the current scene, if the cooldown allows one
    pub fn decide(&mut self, balloons: &[Balloon], height: f32) -> Option<AutoAction> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        // Only balloons at least partly inside the play area can be seen
        let visible: Vec<&Balloon> = balloons
            .iter()
            .filter(|b| !b.popped && b.pos.y - (b.radius as f32) < height)
            .collect();

        let action = if self.power_threshold > 0 && visible.len() >= self.power_threshold {
            Some(AutoAction::SpecialPower)
        } else {
            visible
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .y
                        .partial_cmp(&b.pos.y)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|b| AutoAction::Tap(b.pos))
        };

        if action.is_some() {
            self.cooldown = self.tap_interval;
        }
        action
    }

    /// Decide and apply to the simulation
    pub fn play<R: Rng>(&mut self, sim: &mut GameSimulation<R>) -> Option<AutoAction> {
        let action = self.decide(sim.balloons(), sim.config().height)?;
        match action {
            AutoAction::Tap(point) => {
                sim.handle_tap(point);
            }
            AutoAction::SpecialPower => {
                sim.activate_special_power();
            }
        }
        Some(action)
    }
}
