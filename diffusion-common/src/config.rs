use crate::limits::*;
use crate::sim_params::SimParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the simulation area
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AreaConfig {
    pub height: u32,
    pub width: u32,
    pub pores: u32,
}

// Per-species particle sizes and the speed multiplier
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ParticleConfig {
    pub size_a: u32,
    pub size_b: u32,
    #[serde(default = "default_speed")]
    pub speed: f64,
}

// Initial population, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    pub initial_placement_seed: u64,
    #[serde(default)]
    pub a_left: u32,
    #[serde(default)]
    pub a_right: u32,
    #[serde(default)]
    pub b_left: u32,
    #[serde(default)]
    pub b_right: u32,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_slow_tick_interval_ms")]
    pub slow_tick_interval_ms: u64,
    pub total_time_s: f64,
    #[serde(default)]
    pub realtime: bool, // Drive the kernel from worker threads at wall-clock pace
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_positions: bool,
    pub save_stats: bool,
    #[serde(default)]
    pub save_positions_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_slow_tick_interval_ms() -> u64 {
    DEFAULT_SLOW_TICK_INTERVAL_MS
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub area: AreaConfig,
    pub particles: ParticleConfig,
    pub initial_conditions: InitialConditions,
    pub timing: TimingConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;
        Ok(config)
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against the model limits.
    pub fn validate(&self) -> Result<()> {
        let area = &self.area;
        if !(MIN_HEIGHT..=MAX_HEIGHT).contains(&area.height) {
            anyhow::bail!("area.height must be within {}..={}, got {}.", MIN_HEIGHT, MAX_HEIGHT, area.height);
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&area.width) {
            anyhow::bail!("area.width must be within {}..={}, got {}.", MIN_WIDTH, MAX_WIDTH, area.width);
        }
        if !(MIN_PORES..=MAX_PORES).contains(&area.pores) {
            anyhow::bail!("area.pores must be within {}..={}, got {}.", MIN_PORES, MAX_PORES, area.pores);
        }
        if area.pores >= 2 && area.height as f64 <= area.pores as f64 * PORE_HEIGHT {
            anyhow::bail!("area.height {} is too small to contain {} pores.", area.height, area.pores);
        }

        let particles = &self.particles;
        for (name, size) in [("size_a", particles.size_a), ("size_b", particles.size_b)] {
            if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                anyhow::bail!("particles.{} must be within {}..={}, got {}.", name, MIN_SIZE, MAX_SIZE, size);
            }
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&particles.speed) {
            anyhow::bail!("particles.speed must be within {}..={}, got {}.", MIN_SPEED, MAX_SPEED, particles.speed);
        }

        let ic = &self.initial_conditions;
        let initial_total: usize = [ic.a_left, ic.a_right, ic.b_left, ic.b_right].iter().map(|&n| n as usize).sum();
        if initial_total > MAX_PARTICLES {
            anyhow::bail!("initial particle count {} exceeds the capacity of {}.", initial_total, MAX_PARTICLES);
        }

        if self.timing.tick_interval_ms == 0 {
            anyhow::bail!("timing.tick_interval_ms must be greater than 0.");
        }
        if self.timing.slow_tick_interval_ms < self.timing.tick_interval_ms {
            anyhow::bail!("timing.slow_tick_interval_ms must not be shorter than timing.tick_interval_ms.");
        }
        if !(self.timing.total_time_s > 0.0) {
            anyhow::bail!("timing.total_time_s must be positive.");
        }
        Ok(())
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            area_height: self.area.height,
            area_width: self.area.width,
            pore_count: self.area.pores,
            radius_a: self.particles.size_a as f64,
            radius_b: self.particles.size_b as f64,
            speed: self.particles.speed,
            tick_interval_ms: self.timing.tick_interval_ms,
            slow_tick_interval_ms: self.timing.slow_tick_interval_ms,
            seed: self.initial_conditions.initial_placement_seed,
        }
    }
}
