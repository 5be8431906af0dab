//! Per-tick collision detection and response.
//!
//! Three passes run in a fixed order over the positions produced by the
//! preceding advance: particle pairs, outer walls, membrane segments. A
//! reflection in an earlier pass is not re-checked by a later one.

use crate::entity::{Particle, ParticleHandle, Side};
use crate::geometry::{Area, Layout};
use crate::heading::random_heading_away_from;
use crate::registry::ParticleRegistry;
use diffusion_common::limits::{MEMBRANE_FACE_BAND, SCATTER_ODDS};
use rand::Rng;
use serde::Serialize;

/// Counts of what the collision passes did during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollisionReport {
    pub pair_collisions: u32,
    pub suppressed_pairs: u32,
    pub scatter_events: u32,
    pub boundary_reflections: u32,
    pub obstacle_reflections: u32,
}

impl CollisionReport {
    pub fn is_quiet(&self) -> bool {
        *self == CollisionReport::default()
    }
}

/// Runs all three passes over the registry.
pub fn resolve_collisions<R: Rng + ?Sized>(
    registry: &mut ParticleRegistry,
    area: &Area,
    layout: &Layout,
    rng: &mut R,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let generation = registry.generation();
    let particles = registry.as_mut_slice();

    resolve_pairs(particles, generation, rng, &mut report);
    for particle in particles.iter_mut() {
        report.boundary_reflections += reflect_off_walls(particle, area);
        if reflect_off_membrane(particle, layout) {
            report.obstacle_reflections += 1;
        }
    }
    report
}

/// Particle-particle pass over every ordered pair.
///
/// A hit is ignored when the partner is the particle's remembered last
/// collision. Otherwise both particles reverse, or with odds 1 in
/// `SCATTER_ODDS` each takes a random heading into the opposite quadrant.
/// Both sides then remember each other, which also suppresses the mirrored
/// `(j, i)` visit in the same tick.
fn resolve_pairs<R: Rng + ?Sized>(
    particles: &mut [Particle],
    generation: u32,
    rng: &mut R,
    report: &mut CollisionReport,
) {
    let handle = |index: usize| ParticleHandle { index: index as u32, generation };
    let n = particles.len();
    for i in 0..n {
        for j in 0..n {
            if i == j || !particles[i].collides_with(&particles[j]) {
                continue;
            }
            if particles[i].last_collided() == Some(handle(j)) {
                report.suppressed_pairs += 1;
                continue;
            }

            report.pair_collisions += 1;
            let scatter = rng.random_ratio(1, SCATTER_ODDS);
            let (first, second) = pair_mut(particles, i, j);
            if scatter {
                report.scatter_events += 1;
                let first_heading = random_heading_away_from(first.velocity(), rng);
                let second_heading = random_heading_away_from(second.velocity(), rng);
                first.set_heading(first_heading);
                second.set_heading(second_heading);
            } else {
                first.reverse();
                second.reverse();
            }
            first.record_collision(handle(j));
            second.record_collision(handle(i));
        }
    }
}

/// Mutable references to two distinct elements.
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = particles.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = particles.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Reflects off the outer walls. A particle touching a wall flips the matching
/// velocity component only while still heading outward; each axis flips at
/// most once. Returns the number of flips.
fn reflect_off_walls(particle: &mut Particle, area: &Area) -> u32 {
    let mut flips = 0;
    let pos = particle.position();
    let vel = particle.velocity();
    let r = particle.radius();

    let (hw, hh) = (area.half_width(), area.half_height());
    if (pos.x >= hw - r && vel.x > 0.0) || (pos.x <= -hw + r && vel.x < 0.0) {
        particle.reflect_x();
        flips += 1;
    }
    if (pos.y >= hh - r && vel.y > 0.0) || (pos.y <= -hh + r && vel.y < 0.0) {
        particle.reflect_y();
        flips += 1;
    }
    flips
}

/// Reflects off the first membrane segment the particle overlaps.
///
/// Only particles whose edge reaches the membrane band are tested. A particle
/// heading toward the membrane bounces back to its own side. One whose center
/// is within `MEMBRANE_FACE_BAND` of x = 0 is treated as sitting on a segment's
/// top or bottom face and also flips vertically; this is a geometric
/// simplification, not a contact model.
fn reflect_off_membrane(particle: &mut Particle, layout: &Layout) -> bool {
    let pos = particle.position();
    let r = particle.radius();
    if pos.x < -MEMBRANE_FACE_BAND - r || pos.x > MEMBRANE_FACE_BAND + r {
        return false;
    }

    let reach = layout.segment_height() / 2.0 + r;
    let hit = layout
        .obstacles()
        .iter()
        .any(|segment| pos.y < segment.center_y + reach && pos.y > segment.center_y - reach);
    if !hit {
        return false;
    }

    let vx = particle.velocity().x;
    let heading_in = match Side::of(pos.x) {
        Side::Left => vx > 0.0,
        Side::Right => vx < 0.0,
    };
    if heading_in {
        particle.reflect_x();
    }
    let on_face = pos.x > -MEMBRANE_FACE_BAND && pos.x < MEMBRANE_FACE_BAND;
    if on_face {
        particle.reflect_y();
    }
    heading_in || on_face
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffusion_common::{Species, Vec2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Particle {
        let heading = Vec2::new(vx, vy).try_normalize().expect("non-zero heading");
        Particle::new(Species::A, radius, Vec2::new(x, y), heading)
    }

    fn open_layout(area: &Area) -> Layout {
        Layout::generate(area).expect("valid layout")
    }

    #[test]
    fn head_on_pair_reverses_or_scatters_apart() {
        let area = Area::default();
        let layout = open_layout(&area);
        for seed in 0..64 {
            let mut registry = ParticleRegistry::new(4);
            let a = registry.add(particle(-104.0, 50.0, 1.0, 0.0, 5.0)).expect("room");
            let b = registry.add(particle(-96.0, 50.0, -1.0, 0.0, 5.0)).expect("room");
            let mut rng = StdRng::seed_from_u64(seed);

            let report = resolve_collisions(&mut registry, &area, &layout, &mut rng);
            assert_eq!(report.pair_collisions, 1);
            assert_eq!(report.suppressed_pairs, 1);

            let pa = registry.get(a).expect("live");
            let pb = registry.get(b).expect("live");
            assert!(pa.velocity().x < 0.0, "left particle must head left");
            assert!(pb.velocity().x > 0.0, "right particle must head right");
            assert_eq!(pa.last_collided(), Some(b));
            assert_eq!(pb.last_collided(), Some(a));
            if report.scatter_events == 0 {
                assert_eq!(pa.velocity(), Vec2::new(-1.0, 0.0));
                assert_eq!(pb.velocity(), Vec2::new(1.0, 0.0));
            }
        }
    }

    #[test]
    fn remembered_partner_is_not_hit_again() {
        let area = Area::default();
        let layout = open_layout(&area);
        let mut registry = ParticleRegistry::new(4);
        registry.add(particle(-104.0, 50.0, 1.0, 0.0, 5.0)).expect("room");
        registry.add(particle(-96.0, 50.0, -1.0, 0.0, 5.0)).expect("room");
        let mut rng = StdRng::seed_from_u64(5);

        resolve_collisions(&mut registry, &area, &layout, &mut rng);
        let after_first: Vec<_> = registry.iter().map(|p| p.velocity()).collect();
        let report = resolve_collisions(&mut registry, &area, &layout, &mut rng);
        assert_eq!(report.pair_collisions, 0);
        assert_eq!(report.suppressed_pairs, 2);
        let after_second: Vec<_> = registry.iter().map(|p| p.velocity()).collect();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn separated_pair_does_not_collide() {
        let area = Area::default();
        let layout = open_layout(&area);
        let mut registry = ParticleRegistry::new(4);
        registry.add(particle(-110.0, 50.0, 1.0, 0.0, 5.0)).expect("room");
        registry.add(particle(-100.0, 50.0, -1.0, 0.0, 5.0)).expect("room");
        let mut rng = StdRng::seed_from_u64(6);
        let report = resolve_collisions(&mut registry, &area, &layout, &mut rng);
        assert!(report.is_quiet());
    }

    #[test]
    fn wall_reflection_only_when_heading_out() {
        let area = Area::default();
        let mut outward = particle(196.0, 0.0, 1.0, 0.0, 5.0);
        assert_eq!(reflect_off_walls(&mut outward, &area), 1);
        assert!(outward.velocity().x < 0.0);

        let mut inward = particle(196.0, 0.0, -1.0, 0.0, 5.0);
        assert_eq!(reflect_off_walls(&mut inward, &area), 0);
        assert!(inward.velocity().x < 0.0);
    }

    #[test]
    fn corner_flips_each_axis_once() {
        let area = Area::default();
        let mut p = particle(-196.0, -96.0, -1.0, -1.0, 5.0);
        assert_eq!(reflect_off_walls(&mut p, &area), 2);
        assert!(p.velocity().x > 0.0 && p.velocity().y > 0.0);
    }

    #[test]
    fn membrane_segment_bounces_particle_back() {
        let area = Area::default(); // segments centered at +/-42.5, 55 high
        let layout = open_layout(&area);

        let mut from_left = particle(-8.0, 42.5, 1.0, 0.0, 5.0);
        assert!(reflect_off_membrane(&mut from_left, &layout));
        assert_eq!(from_left.velocity(), Vec2::new(-1.0, 0.0));

        let mut from_right = particle(8.0, -42.5, -1.0, 0.0, 5.0);
        assert!(reflect_off_membrane(&mut from_right, &layout));
        assert_eq!(from_right.velocity(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn pore_lets_particle_through() {
        let area = Area::default();
        let layout = open_layout(&area);
        let mut p = particle(-8.0, 0.0, 1.0, 0.0, 5.0);
        assert!(!reflect_off_membrane(&mut p, &layout));
        assert_eq!(p.velocity(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn face_band_also_flips_vertical() {
        let area = Area::default();
        let layout = open_layout(&area);
        // Inside the 5-unit band just above the lower segment's top face
        let mut p = particle(-2.0, -12.0, 0.6, -0.8, 5.0);
        assert!(reflect_off_membrane(&mut p, &layout));
        let v = p.velocity();
        assert!((v.x + 0.6).abs() < 1e-12);
        assert!((v.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn particle_outside_band_is_ignored() {
        let area = Area::default();
        let layout = open_layout(&area);
        let mut p = particle(-10.5, 42.5, 1.0, 0.0, 5.0);
        assert!(!reflect_off_membrane(&mut p, &layout));
    }
}
