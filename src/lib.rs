//! Two-species diffusion across a porous membrane.
//!
//! Particles are circles moving at unit heading times a global speed. Each
//! fast tick advances them and resolves pair, wall and membrane collisions
//! with simple reflections; each slow tick counts down to a global direction
//! reset and samples per-side concentrations.

pub mod collision;
pub mod concentration;
pub mod driver;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod heading;
pub mod placement;
pub mod registry;
pub mod simulation;
pub mod timer;

pub use driver::SimulationDriver;
pub use entity::{Obstacle, Particle, ParticleHandle, ParticleView, Side};
pub use error::{LayoutError, Result, SimError};
pub use geometry::{Area, Layout};
pub use simulation::{Simulation, SlowTickReport};

pub use diffusion_common::{Concentration, DivisionShare, SimParams, SimulationConfig, Snapshot, Species, Vec2};
