use crate::entity::{Particle, ParticleHandle};
use crate::error::{Result, SimError};
use diffusion_common::Species;

/// Holds the live particles in insertion order.
///
/// Particles are only ever appended or dropped all at once, so an index stays
/// valid until the next `clear`. Every `clear` starts a new generation; handles
/// issued before it stop resolving.
#[derive(Debug)] // Removed Clone: handles would alias across copies
pub struct ParticleRegistry {
    particles: Vec<Particle>,
    capacity: usize,
    generation: u32,
    species_counts: [usize; 2],
}

impl ParticleRegistry {
    /// Creates an empty registry that accepts up to `capacity` particles.
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
            generation: 0,
            species_counts: [0; 2],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn count_of(&self, species: Species) -> usize {
        self.species_counts[species_slot(species)]
    }

    /// Fails with `CapacityExceeded` when no more particles fit.
    pub fn ensure_room(&self) -> Result<()> {
        if self.is_full() {
            Err(SimError::CapacityExceeded { capacity: self.capacity })
        } else {
            Ok(())
        }
    }

    /// Appends a particle to the end of the registry.
    pub(crate) fn add(&mut self, particle: Particle) -> Result<ParticleHandle> {
        self.ensure_room()?;
        let handle = self.handle_at(self.particles.len());
        self.species_counts[species_slot(particle.species())] += 1;
        self.particles.push(particle);
        Ok(handle)
    }

    /// Drops every particle and invalidates all outstanding handles.
    pub(crate) fn clear(&mut self) {
        self.particles.clear();
        self.species_counts = [0; 2];
        self.generation = self.generation.wrapping_add(1);
    }

    /// Handle for the particle at `index` in the current generation.
    pub fn handle_at(&self, index: usize) -> ParticleHandle {
        ParticleHandle { index: index as u32, generation: self.generation }
    }

    /// Resolves a handle, or `None` if it is stale or out of range.
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        if handle.generation != self.generation {
            return None;
        }
        self.particles.get(handle.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

fn species_slot(species: Species) -> usize {
    match species {
        Species::A => 0,
        Species::B => 1,
    }
}
