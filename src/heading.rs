//! Random unit headings.
//!
//! Both generators draw from an explicit RNG so a seeded run replays exactly.

use diffusion_common::Vec2;
use rand::Rng;
use rand_distr::{Distribution, UnitCircle};

/// A heading uniformly distributed over all angles.
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let [x, y]: [f64; 2] = UnitCircle.sample(rng);
    Vec2::new(x, y)
}

/// A uniformly distributed heading whose x and y components both point the
/// opposite way to `previous`. A zero component counts as non-positive, so
/// the new component is then strictly positive.
pub fn random_heading_away_from<R: Rng + ?Sized>(previous: Vec2, rng: &mut R) -> Vec2 {
    let want_x = if previous.x > 0.0 { -1.0 } else { 1.0 };
    let want_y = if previous.y > 0.0 { -1.0 } else { 1.0 };
    // A quarter of all headings qualify, so this takes four draws on average.
    loop {
        let candidate = random_heading(rng);
        if candidate.x * want_x > 0.0 && candidate.y * want_y > 0.0 {
            return candidate;
        }
    }
}
