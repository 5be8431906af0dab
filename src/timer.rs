use crate::heading::random_heading;
use crate::registry::ParticleRegistry;
use diffusion_common::limits::{RESET_DELAY, RESET_RATE};
use log::debug;
use rand::Rng;

/// Countdown to the next global direction reset, in slow ticks.
///
/// Starts at a long first delay, then repeats at a shorter steady rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionResetTimer {
    countdown: u32,
    first_delay: u32,
    rate: u32,
    resets: u64,
}

impl DirectionResetTimer {
    pub fn new() -> Self {
        Self::with_periods(RESET_DELAY, RESET_RATE)
    }

    /// Timer with custom periods. Both are raised to at least 1.
    pub fn with_periods(first_delay: u32, rate: u32) -> Self {
        let first_delay = first_delay.max(1);
        DirectionResetTimer {
            countdown: first_delay,
            first_delay,
            rate: rate.max(1),
            resets: 0,
        }
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Number of resets fired since the last `reset`.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Back to the first delay.
    pub fn reset(&mut self) {
        self.countdown = self.first_delay;
        self.resets = 0;
    }

    /// One slow tick. When the countdown reaches zero every particle gets a
    /// fresh random heading and the countdown restarts at the steady rate.
    /// Returns whether a reset fired.
    pub fn advance<R: Rng + ?Sized>(&mut self, registry: &mut ParticleRegistry, rng: &mut R) -> bool {
        self.countdown -= 1;
        if self.countdown > 0 {
            return false;
        }
        for particle in registry.as_mut_slice() {
            particle.set_heading(random_heading(rng));
        }
        self.countdown = self.rate;
        self.resets += 1;
        debug!("Direction reset #{} applied to {} particles", self.resets, registry.len());
        true
    }
}

impl Default for DirectionResetTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Particle, UNIT_TOLERANCE};
    use diffusion_common::{Species, Vec2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_reset_after_delay_then_at_rate() {
        let mut timer = DirectionResetTimer::new();
        let mut registry = ParticleRegistry::new(1);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(timer.countdown(), RESET_DELAY);

        for _ in 0..RESET_DELAY - 1 {
            assert!(!timer.advance(&mut registry, &mut rng));
        }
        assert_eq!(timer.countdown(), 1);
        assert!(timer.advance(&mut registry, &mut rng));
        assert_eq!(timer.countdown(), RESET_RATE);

        for _ in 0..RESET_RATE - 1 {
            assert!(!timer.advance(&mut registry, &mut rng));
        }
        assert!(timer.advance(&mut registry, &mut rng));
        assert_eq!(timer.resets(), 2);
    }

    #[test]
    fn reset_rerandomizes_every_heading() {
        let mut timer = DirectionResetTimer::with_periods(1, 1);
        let mut registry = ParticleRegistry::new(20);
        for i in 0..20 {
            let p = Particle::new(Species::A, 2.0, Vec2::new(i as f64 * 5.0, 0.0), Vec2::new(1.0, 0.0));
            registry.add(p).expect("room");
        }
        let mut rng = StdRng::seed_from_u64(2);
        assert!(timer.advance(&mut registry, &mut rng));
        assert!(registry.iter().all(|p| p.velocity().is_unit(UNIT_TOLERANCE)));
        assert!(registry.iter().any(|p| p.velocity() != Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn reset_returns_to_first_delay() {
        let mut timer = DirectionResetTimer::with_periods(3, 2);
        let mut registry = ParticleRegistry::new(1);
        let mut rng = StdRng::seed_from_u64(3);
        timer.advance(&mut registry, &mut rng);
        timer.reset();
        assert_eq!(timer.countdown(), 3);
    }
}
