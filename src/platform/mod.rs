//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame time accumulation into fixed simulation steps
//! - Storage (LocalStorage on web, a JSON directory natively)

pub mod storage;

pub use storage::{MemoryStorage, Storage};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame deltas into a count of fixed simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps,
        }
    }

    /// Add a frame's elapsed time; returns how many fixed steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        // Long stalls (tab switch) shouldn't fast-forward the round
        self.accumulator += frame_dt.min(0.1);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
