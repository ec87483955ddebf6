//! Seeded, resumable RNG
//!
//! Simulation code takes `&mut impl rand::Rng`, so tests can inject any
//! seeded generator. The engine's own generator counts PCG steps so a save
//! can restore the exact stream position.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Serializable RNG position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub steps: u64,
}

/// Pcg32 that remembers how far it has advanced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngState", into = "RngState")]
pub struct TrackedRng {
    seed: u64,
    steps: u64,
    inner: Pcg32,
}

impl TrackedRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            steps: 0,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            steps: self.steps,
        }
    }
}

impl From<RngState> for TrackedRng {
    fn from(state: RngState) -> Self {
        let mut inner = Pcg32::seed_from_u64(state.seed);
        inner.advance(state.steps);
        Self {
            seed: state.seed,
            steps: state.steps,
            inner,
        }
    }
}

impl From<TrackedRng> for RngState {
    fn from(rng: TrackedRng) -> Self {
        rng.state()
    }
}

impl RngCore for TrackedRng {
    fn next_u32(&mut self) -> u32 {
        self.steps += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dst)
    }
}
