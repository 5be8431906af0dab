//! Fixed bounds and constants of the diffusion model.
//!
//! Everything here is a compile-time constant: the kernel validates user input
//! against the bounds, and the remaining values shape the collision model.

// Area
pub const MIN_HEIGHT: u32 = 100;
pub const MAX_HEIGHT: u32 = 600;
pub const MIN_WIDTH: u32 = 200;
pub const MAX_WIDTH: u32 = 1200;
pub const MIN_PORES: u32 = 0;
pub const MAX_PORES: u32 = 10;

// Particles
pub const MIN_SIZE: u32 = 1;
pub const MAX_SIZE: u32 = 20;
pub const MAX_PARTICLES: usize = 100;
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 10.0;

/// Height of every pore. Not configurable.
pub const PORE_HEIGHT: f64 = 30.0;
/// Width of every membrane segment.
pub const OBSTACLE_WIDTH: f64 = 10.0;
/// Half-width of the band around x = 0 treated as the segment face.
pub const MEMBRANE_FACE_BAND: f64 = OBSTACLE_WIDTH / 2.0;

/// Ticks before a particle may collide again with the same partner.
pub const COLLISION_COOLDOWN_TICKS: u32 = 20;
/// A pair collision scatters instead of reversing with odds 1 in this.
pub const SCATTER_ODDS: u32 = 8;

/// Candidate positions tried before an add is refused.
pub const PLACEMENT_ATTEMPTS: u32 = 5;
/// Extra clearance between a new particle and any existing one.
pub const PROXIMITY_MARGIN: f64 = 10.0;

/// Slow ticks before the first direction reset.
pub const RESET_DELAY: u32 = 101;
/// Slow ticks between subsequent direction resets.
pub const RESET_RATE: u32 = 50;

// Defaults
pub const DEFAULT_HEIGHT: u32 = 200;
pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_PORES: u32 = 3;
pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 20;
pub const DEFAULT_SLOW_TICK_INTERVAL_MS: u64 = 1000;
