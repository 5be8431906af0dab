use serde::{Deserialize, Serialize};

/// Runtime parameters derived from the configuration, consumed by the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    // Area
    pub area_height: u32,
    pub area_width: u32,
    pub pore_count: u32,

    // Particles
    pub radius_a: f64,
    pub radius_b: f64,
    pub speed: f64, // Distance multiplier per tick

    // Scheduling
    pub tick_interval_ms: u64,
    pub slow_tick_interval_ms: u64,

    // RNG seed for placement, scattering and direction resets
    pub seed: u64,
}

impl SimParams {
    /// Number of fast ticks that fit in one slow tick (at least 1).
    pub fn ticks_per_slow_tick(&self) -> u64 {
        if self.tick_interval_ms == 0 {
            return 1;
        }
        (self.slow_tick_interval_ms / self.tick_interval_ms).max(1)
    }

    /// Simulated seconds covered by `ticks` fast ticks.
    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.tick_interval_ms as f64 / 1000.0
    }
}

impl Default for SimParams {
    fn default() -> Self {
        use crate::limits::*;
        SimParams {
            area_height: DEFAULT_HEIGHT,
            area_width: DEFAULT_WIDTH,
            pore_count: DEFAULT_PORES,
            radius_a: 5.0,
            radius_b: 5.0,
            speed: DEFAULT_SPEED,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            slow_tick_interval_ms: DEFAULT_SLOW_TICK_INTERVAL_MS,
            seed: 0,
        }
    }
}
