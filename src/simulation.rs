use crate::collision::{resolve_collisions, CollisionReport};
use crate::concentration::sample_concentration;
use crate::entity::{Obstacle, Particle, ParticleHandle, ParticleView, Side};
use crate::error::{Result, SimError};
use crate::geometry::{Area, Layout};
use crate::placement::find_placement;
use crate::registry::ParticleRegistry;
use crate::timer::DirectionResetTimer;
use diffusion_common::limits::{MAX_PARTICLES, MAX_SIZE, MAX_SPEED, MIN_SIZE, MIN_SPEED};
use diffusion_common::{
    clamp, Concentration, PositionRecord, SimParams, SimulationConfig, Snapshot, Species, Vec2,
};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// What one slow tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowTickReport {
    pub direction_reset: bool,
    pub countdown: u32,
    pub concentration: Concentration,
}

/// The whole diffusion model: area, membrane, particles, timers and the RNG
/// that drives placement, scattering and direction resets.
///
/// Every operation takes `&self` or `&mut self`; sharing across threads goes
/// through [`crate::driver::SimulationDriver`], which serializes passes.
pub struct Simulation {
    params: SimParams,
    area: Area,
    layout: Layout,
    registry: ParticleRegistry,
    timer: DirectionResetTimer,
    concentration: Concentration,
    speed: f64,
    paused: bool,
    /// Fast ticks since the area was last initialized.
    tick_count: u64,
    /// Seeded RNG; a fixed seed replays the same run.
    rng: StdRng,
    /// Include particle positions in recorded snapshots.
    positions_in_snapshot: bool,
    recorded_snapshots: Vec<Snapshot>,
}

impl Simulation {
    /// Creates an empty simulation from runtime parameters.
    pub fn new(params: SimParams) -> Result<Self> {
        for (name, radius) in [("radius_a", params.radius_a), ("radius_b", params.radius_b)] {
            if !(MIN_SIZE as f64..=MAX_SIZE as f64).contains(&radius) {
                return Err(SimError::InvalidParameter(format!(
                    "{} must be within {}..={}, got {}",
                    name, MIN_SIZE, MAX_SIZE, radius
                )));
            }
        }

        let area = Area {
            height: params.area_height,
            width: params.area_width,
            pore_count: params.pore_count,
        };
        let layout = Layout::generate(&area)?;
        let rng = StdRng::seed_from_u64(params.seed);

        let mut sim = Self {
            area,
            layout,
            registry: ParticleRegistry::new(MAX_PARTICLES),
            timer: DirectionResetTimer::new(),
            concentration: Concentration::default(),
            speed: params.speed,
            paused: false,
            tick_count: 0,
            rng,
            positions_in_snapshot: false,
            recorded_snapshots: Vec::new(),
            params,
        };
        sim.set_speed(sim.params.speed);
        Ok(sim)
    }

    /// Creates a simulation from a loaded configuration and places the
    /// configured initial population.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let mut sim = Self::new(config.get_sim_params())?;
        sim.positions_in_snapshot = config.output.save_positions_in_snapshot;

        let ic = &config.initial_conditions;
        let population = [
            (Species::A, Side::Left, ic.a_left),
            (Species::A, Side::Right, ic.a_right),
            (Species::B, Side::Left, ic.b_left),
            (Species::B, Side::Right, ic.b_right),
        ];
        let mut skipped = 0;
        for (species, side, count) in population {
            for _ in 0..count {
                match sim.add_particle(species, side) {
                    Ok(_) => {}
                    // A crowded side keeps what fit, like a refused add from the UI.
                    Err(SimError::NoSpaceAvailable { .. }) => skipped += 1,
                    Err(e) => return Err(e),
                }
            }
        }
        if skipped > 0 {
            warn!("{} initial particles did not fit and were skipped.", skipped);
        }
        info!(
            "Placed initial population: {} of A, {} of B.",
            sim.registry.count_of(Species::A),
            sim.registry.count_of(Species::B)
        );
        Ok(sim)
    }

    /// Rebuilds the membrane for a new area and starts over with no particles.
    ///
    /// The new layout is computed before anything is touched, so on error the
    /// previous area, membrane and particles are kept.
    pub fn initialize_area(&mut self, height: u32, width: u32, pore_count: u32) -> Result<()> {
        let area = Area { height, width, pore_count };
        let layout = Layout::generate(&area).map_err(|e| {
            warn!("Rejected area {}x{} with {} pores: {}", height, width, pore_count, e);
            e
        })?;

        self.area = area;
        self.layout = layout;
        self.registry.clear();
        self.timer.reset();
        self.concentration = Concentration::default();
        self.tick_count = 0;
        info!(
            "Initialized area {}x{} with {} pores ({} membrane segments, segment height {:.2}).",
            height,
            width,
            pore_count,
            self.layout.obstacles().len(),
            self.layout.segment_height()
        );
        Ok(())
    }

    /// Re-initializes with new dimensions, keeping the pore count.
    pub fn set_area_size(&mut self, height: u32, width: u32) -> Result<()> {
        self.initialize_area(height, width, self.area.pore_count)
    }

    /// Re-initializes with a new pore count, keeping the dimensions.
    pub fn set_pore_count(&mut self, pore_count: u32) -> Result<()> {
        self.initialize_area(self.area.height, self.area.width, pore_count)
    }

    /// Adds a particle of `species` at a random free spot on `side`.
    pub fn add_particle(&mut self, species: Species, side: Side) -> Result<ParticleHandle> {
        self.registry.ensure_room().map_err(|e| {
            warn!("Cannot add {} particle: {}", species, e);
            e
        })?;
        let radius = self.radius_of(species);
        let particle = find_placement(&self.registry, &self.area, species, radius, side, &mut self.rng)
            .map_err(|e| {
                warn!("Cannot add {} particle on the {:?} side: {}", species, side, e);
                e
            })?;
        let handle = self.registry.add(particle)?;
        debug!(
            "Added {} particle #{} on the {:?} side ({} total).",
            species,
            handle.index(),
            side,
            self.registry.len()
        );
        Ok(handle)
    }

    /// Adds a particle at an exact position and heading, skipping the
    /// placement search. The heading is normalized; the particle must lie
    /// inside the area.
    pub fn place_particle(&mut self, species: Species, position: Vec2, heading: Vec2) -> Result<ParticleHandle> {
        self.registry.ensure_room()?;
        let heading = heading.try_normalize().ok_or_else(|| {
            SimError::InvalidParameter(format!("heading ({}, {}) has no direction", heading.x, heading.y))
        })?;
        if !(position.x.abs() <= self.area.half_width() && position.y.abs() <= self.area.half_height()) {
            return Err(SimError::InvalidParameter(format!(
                "position ({}, {}) lies outside the {}x{} area",
                position.x, position.y, self.area.width, self.area.height
            )));
        }
        let particle = Particle::new(species, self.radius_of(species), position, heading);
        self.registry.add(particle)
    }

    /// Sets the distance multiplier applied to every particle's velocity each
    /// tick, clamped to the allowed range.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() {
            warn!("Ignoring non-finite speed {}", multiplier);
            return;
        }
        let speed = clamp(multiplier, MIN_SPEED, MAX_SPEED);
        if speed != multiplier {
            warn!("Speed {} clamped to {}", multiplier, speed);
        }
        self.speed = speed;
    }

    /// Suspends fast ticks. Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            debug!("Simulation paused at tick {}", self.tick_count);
        }
        self.paused = true;
    }

    /// Re-enables fast ticks. Idempotent.
    pub fn resume(&mut self) {
        if self.paused {
            debug!("Simulation resumed at tick {}", self.tick_count);
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advances every particle by `velocity * speed`, ages collision memory,
    /// then runs the collision passes. Does nothing while paused.
    pub fn tick(&mut self) -> Option<CollisionReport> {
        if self.paused {
            return None;
        }
        let speed = self.speed;
        self.registry.as_mut_slice().par_iter_mut().for_each(|particle| {
            particle.advance(speed);
            particle.pass_time();
        });

        let report = resolve_collisions(&mut self.registry, &self.area, &self.layout, &mut self.rng);
        self.tick_count += 1;
        if !report.is_quiet() {
            trace!("Tick {}: {:?}", self.tick_count, report);
        }
        Some(report)
    }

    /// Runs the direction reset timer, then samples concentrations.
    pub fn slow_tick(&mut self) -> SlowTickReport {
        let direction_reset = self.timer.advance(&mut self.registry, &mut self.rng);
        self.concentration = sample_concentration(&self.registry);
        SlowTickReport {
            direction_reset,
            countdown: self.timer.countdown(),
            concentration: self.concentration,
        }
    }

    /// Appends the current state to the snapshot history.
    pub fn record_snapshot(&mut self) -> &Snapshot {
        let positions = self.positions_in_snapshot.then(|| {
            self.registry
                .iter()
                .map(|p| PositionRecord { species: p.species(), x: p.position().x, y: p.position().y })
                .collect()
        });
        self.recorded_snapshots.push(Snapshot {
            tick: self.tick_count,
            time_s: self.params.ticks_to_seconds(self.tick_count),
            total_particle_count: self.registry.len() as u32,
            concentration: self.concentration,
            countdown: self.timer.countdown(),
            positions,
        });
        &self.recorded_snapshots[self.recorded_snapshots.len() - 1]
    }

    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }

    pub fn set_positions_in_snapshot(&mut self, enabled: bool) {
        self.positions_in_snapshot = enabled;
    }

    // --- Read accessors ---

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn area(&self) -> &Area {
        &self.area
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.layout.obstacles()
    }

    pub fn particles(&self) -> &[Particle] {
        self.registry.as_slice()
    }

    /// Copy of every particle for a renderer.
    pub fn particle_views(&self) -> Vec<ParticleView> {
        self.registry.iter().map(Particle::view).collect()
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.registry.get(handle)
    }

    pub fn particle_count(&self) -> usize {
        self.registry.len()
    }

    pub fn count_of(&self, species: Species) -> usize {
        self.registry.count_of(species)
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    /// Slow ticks left until the next direction reset.
    pub fn countdown(&self) -> u32 {
        self.timer.countdown()
    }

    /// Most recent concentration sample.
    pub fn concentration(&self) -> &Concentration {
        &self.concentration
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn radius_of(&self, species: Species) -> f64 {
        match species {
            Species::A => self.params.radius_a,
            Species::B => self.params.radius_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::UNIT_TOLERANCE;
    use diffusion_common::limits::RESET_DELAY;

    fn sim() -> Simulation {
        Simulation::new(SimParams { seed: 17, ..SimParams::default() }).expect("default params are valid")
    }

    #[test]
    fn new_rejects_bad_particle_size() {
        let err = Simulation::new(SimParams { radius_b: 25.0, ..SimParams::default() }).err();
        assert!(matches!(err, Some(SimError::InvalidParameter(_))));
    }

    #[test]
    fn paused_tick_leaves_positions() {
        let mut sim = sim();
        sim.place_particle(Species::A, Vec2::new(-50.0, 0.0), Vec2::new(1.0, 0.0)).expect("room");
        sim.pause();
        sim.pause();
        assert!(sim.tick().is_none());
        assert_eq!(sim.particles()[0].position(), Vec2::new(-50.0, 0.0));
        assert_eq!(sim.tick_count(), 0);
        sim.resume();
        sim.resume();
        assert!(!sim.is_paused());
        assert!(sim.tick().is_some());
        assert_eq!(sim.particles()[0].position(), Vec2::new(-49.0, 0.0));
    }

    #[test]
    fn speed_is_clamped() {
        let mut sim = sim();
        sim.set_speed(50.0);
        assert_eq!(sim.speed(), MAX_SPEED);
        sim.set_speed(0.0);
        assert_eq!(sim.speed(), MIN_SPEED);
        sim.set_speed(f64::NAN);
        assert_eq!(sim.speed(), MIN_SPEED);
    }

    #[test]
    fn place_particle_validates_input() {
        let mut sim = sim();
        assert!(matches!(
            sim.place_particle(Species::A, Vec2::new(0.0, 0.0), Vec2::zero()),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(matches!(
            sim.place_particle(Species::A, Vec2::new(250.0, 0.0), Vec2::new(1.0, 0.0)),
            Err(SimError::InvalidParameter(_))
        ));
        let handle = sim
            .place_particle(Species::B, Vec2::new(10.0, 10.0), Vec2::new(3.0, 4.0))
            .expect("valid placement");
        let p = sim.particle(handle).expect("live");
        assert!(p.velocity().is_unit(UNIT_TOLERANCE));
        assert_eq!(p.radius(), sim.radius_of(Species::B));
    }

    #[test]
    fn initialize_area_resets_everything() {
        let mut sim = sim();
        let handle = sim.add_particle(Species::A, Side::Left).expect("room");
        sim.tick();
        sim.slow_tick();
        assert_eq!(sim.countdown(), RESET_DELAY - 1);

        sim.initialize_area(300, 600, 4).expect("valid area");
        assert_eq!(sim.particle_count(), 0);
        assert!(sim.particle(handle).is_none());
        assert_eq!(sim.countdown(), RESET_DELAY);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.concentration(), &Concentration::default());
        assert_eq!(sim.obstacles().len(), 3);
    }

    #[test]
    fn area_setters_keep_the_other_dimension() {
        let mut sim = sim();
        sim.set_pore_count(5).expect("fits in 200");
        assert_eq!(sim.area(), &Area { height: 200, width: 400, pore_count: 5 });
        sim.set_area_size(400, 800).expect("valid size");
        assert_eq!(sim.area(), &Area { height: 400, width: 800, pore_count: 5 });
        assert!(sim.set_area_size(140, 800).is_err());
        assert_eq!(sim.area().height, 400);
    }

    #[test]
    fn snapshot_carries_positions_when_enabled() {
        let mut sim = sim();
        sim.add_particle(Species::A, Side::Right).expect("room");
        assert!(sim.record_snapshot().positions.is_none());
        sim.set_positions_in_snapshot(true);
        sim.slow_tick();
        let snapshot = sim.record_snapshot();
        let positions = snapshot.positions.as_ref().expect("positions recorded");
        assert_eq!(positions.len(), 1);
        assert_eq!(snapshot.concentration.species_a.right_count, 1);
        assert_eq!(sim.recorded_snapshots().len(), 2);
    }
}
