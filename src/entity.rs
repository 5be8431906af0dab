//! Particle and obstacle records.

use diffusion_common::limits::{COLLISION_COOLDOWN_TICKS, OBSTACLE_WIDTH};
use diffusion_common::{Species, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking the unit-velocity invariant.
pub const UNIT_TOLERANCE: f64 = 1e-9;

/// Which half of the area, split at x = 0. x >= 0 counts as right.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn of(x: f64) -> Side {
        if x >= 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// -1 for left, +1 for right.
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Index into the registry tagged with the registry generation it was issued
/// under. A handle from before a `clear` never matches a live particle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ParticleHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A moving circular particle.
///
/// `velocity` is always a unit vector: it is only ever replaced by a
/// reflection or a fresh random heading, never scaled.
#[derive(Debug, Clone)]
pub struct Particle {
    species: Species,
    radius: f64,
    position: Vec2,
    velocity: Vec2,
    last_collided: Option<ParticleHandle>,
    cooldown: u32,
}

impl Particle {
    pub(crate) fn new(species: Species, radius: f64, position: Vec2, velocity: Vec2) -> Self {
        debug_assert!(velocity.is_unit(UNIT_TOLERANCE));
        Particle {
            species,
            radius,
            position,
            velocity,
            last_collided: None,
            cooldown: COLLISION_COOLDOWN_TICKS,
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn last_collided(&self) -> Option<ParticleHandle> {
        self.last_collided
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Moves by `velocity * speed`.
    pub(crate) fn advance(&mut self, speed: f64) {
        self.position = self.position + self.velocity * speed;
    }

    pub(crate) fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// One tick of collision cool-down. At zero the remembered partner is
    /// forgotten and the counter starts over.
    pub(crate) fn pass_time(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 {
            self.cooldown = COLLISION_COOLDOWN_TICKS;
            self.last_collided = None;
        }
    }

    /// Circles overlap.
    pub fn collides_with(&self, other: &Particle) -> bool {
        let min_dist = self.radius + other.radius;
        self.position.distance_squared(other.position) < min_dist * min_dist
    }

    /// Circles come within `margin` of each other.
    pub fn is_close_to(&self, other: &Particle, margin: f64) -> bool {
        let min_dist = self.radius + other.radius + margin;
        self.position.distance_squared(other.position) < min_dist * min_dist
    }

    pub(crate) fn record_collision(&mut self, partner: ParticleHandle) {
        self.last_collided = Some(partner);
        self.cooldown = COLLISION_COOLDOWN_TICKS;
    }

    pub(crate) fn set_heading(&mut self, heading: Vec2) {
        debug_assert!(heading.is_unit(UNIT_TOLERANCE));
        self.velocity = heading;
    }

    pub(crate) fn reflect_x(&mut self) {
        self.velocity = self.velocity.reflect_x();
    }

    pub(crate) fn reflect_y(&mut self) {
        self.velocity = self.velocity.reflect_y();
    }

    pub(crate) fn reverse(&mut self) {
        self.velocity = -self.velocity;
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            species: self.species,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
        }
    }
}

/// What a renderer needs to draw a particle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub species: Species,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
}

/// A membrane segment centered on x = 0.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center_y: f64,
    pub half_height: f64,
}

impl Obstacle {
    pub fn new(center_y: f64, height: f64) -> Self {
        Obstacle { center_y, half_height: height / 2.0 }
    }

    pub fn height(&self) -> f64 {
        self.half_height * 2.0
    }

    pub fn width(&self) -> f64 {
        OBSTACLE_WIDTH
    }

    pub fn top(&self) -> f64 {
        self.center_y + self.half_height
    }

    pub fn bottom(&self) -> f64 {
        self.center_y - self.half_height
    }
}
