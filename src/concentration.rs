use crate::entity::Side;
use crate::registry::ParticleRegistry;
use diffusion_common::{Concentration, DivisionShare, Species};

/// Counts each species on each side of the membrane. Read-only.
pub fn sample_concentration(registry: &ParticleRegistry) -> Concentration {
    // [species][side]
    let mut counts = [[0u32; 2]; 2];
    for particle in registry.iter() {
        let species = match particle.species() {
            Species::A => 0,
            Species::B => 1,
        };
        let side = match Side::of(particle.position().x) {
            Side::Left => 0,
            Side::Right => 1,
        };
        counts[species][side] += 1;
    }
    Concentration {
        species_a: DivisionShare::from_counts(counts[0][0], counts[0][1]),
        species_b: DivisionShare::from_counts(counts[1][0], counts[1][1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Particle;
    use diffusion_common::Vec2;

    fn add(registry: &mut ParticleRegistry, species: Species, x: f64) {
        let p = Particle::new(species, 3.0, Vec2::new(x, 0.0), Vec2::new(0.0, 1.0));
        registry.add(p).expect("room");
    }

    #[test]
    fn empty_registry_is_zero_everywhere() {
        let registry = ParticleRegistry::new(4);
        assert_eq!(sample_concentration(&registry), Concentration::default());
    }

    #[test]
    fn splits_by_species_and_side() {
        let mut registry = ParticleRegistry::new(10);
        add(&mut registry, Species::A, -50.0);
        add(&mut registry, Species::A, -20.0);
        add(&mut registry, Species::A, 0.0); // x = 0 counts as right
        add(&mut registry, Species::A, 30.0);
        add(&mut registry, Species::B, -10.0);

        let c = sample_concentration(&registry);
        assert_eq!(c.species_a.left_count, 2);
        assert_eq!(c.species_a.right_count, 2);
        assert_eq!(c.species_a.left_percent, 50.0);
        assert_eq!(c.species_b.left_percent, 100.0);
        assert_eq!(c.species_b.right_percent, 0.0);
        assert_eq!(c.share(Species::B).total(), 1);
    }
}
