//! Fixed timestep accumulator
//!
//! Turns variable frame deltas into a whole number of simulation ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Largest frame delta accepted (e.g. after the window was hidden)
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    /// f64 so tiny deltas still add up
    accumulator: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Feed one frame delta (seconds), returns how many ticks to run
    pub fn push(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt as f64;

        let step = self.step as f64;
        let mut substeps = 0;
        while self.accumulator >= step && substeps < self.max_substeps {
            self.accumulator -= step;
            substeps += 1;
        }
        // Drop backlog we refused to simulate
        if substeps == self.max_substeps && self.accumulator >= step {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Simulation step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
