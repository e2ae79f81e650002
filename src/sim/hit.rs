//! Tap hit testing and pop scoring

use glam::Vec2;

use super::state::Balloon;
use crate::consts::{BASE_POP_SCORE, COMBO_BONUS};

/// Index of the first unpopped balloon under `point`
///
/// Overlapping balloons resolve to collection order, so one tap pops at most
/// one balloon.
pub fn hit_test(point: Vec2, balloons: &[Balloon]) -> Option<usize> {
    balloons.iter().position(|b| !b.popped && b.contains(point))
}

/// Score for a pop given the combo before the pop
#[inline]
pub fn pop_reward(combo: u32) -> u64 {
    BASE_POP_SCORE + COMBO_BONUS * combo as u64
}
