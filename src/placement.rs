use crate::entity::{Particle, Side};
use crate::error::{Result, SimError};
use crate::geometry::Area;
use crate::heading::random_heading;
use crate::registry::ParticleRegistry;
use diffusion_common::limits::{PLACEMENT_ATTEMPTS, PROXIMITY_MARGIN};
use diffusion_common::{Species, Vec2};
use log::trace;
use rand::Rng;

/// Builds a new particle at a random free spot on `side`.
///
/// Candidates are kept at least one radius away from the outer walls and the
/// membrane line. A candidate within `PROXIMITY_MARGIN` of any existing
/// particle is discarded; after `PLACEMENT_ATTEMPTS` misses the search fails
/// with `NoSpaceAvailable`. Nothing is inserted here.
pub fn find_placement<R: Rng + ?Sized>(
    registry: &ParticleRegistry,
    area: &Area,
    species: Species,
    radius: f64,
    side: Side,
    rng: &mut R,
) -> Result<Particle> {
    let x_range = radius..(area.half_width() - radius);
    let y_range = (-area.half_height() + radius)..(area.half_height() - radius);
    if x_range.is_empty() || y_range.is_empty() {
        return Err(SimError::NoSpaceAvailable { attempts: 0 });
    }

    let mut candidate = Particle::new(species, radius, Vec2::zero(), random_heading(rng));
    for attempt in 1..=PLACEMENT_ATTEMPTS {
        let x = side.sign() * rng.random_range(x_range.clone());
        let y = rng.random_range(y_range.clone());
        candidate.move_to(Vec2::new(x, y));

        let crowded = registry
            .iter()
            .any(|existing| candidate.is_close_to(existing, PROXIMITY_MARGIN));
        if !crowded {
            trace!("Placed {} particle at ({:.1}, {:.1}) on attempt {}", species, x, y, attempt);
            return Ok(candidate);
        }
    }
    Err(SimError::NoSpaceAvailable { attempts: PLACEMENT_ATTEMPTS })
}
