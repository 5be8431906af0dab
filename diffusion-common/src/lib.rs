pub mod config;
pub mod limits;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{SimulationConfig, AreaConfig, ParticleConfig, InitialConditions, TimingConfig, OutputConfig};
pub use sim_params::SimParams;
pub use snapshot::{Concentration, DivisionShare, PositionRecord, Snapshot, Species};
pub use vecmath::{Vec2, clamp};
