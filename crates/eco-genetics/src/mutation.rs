//! Mutation operator for genetic codes.

use crate::code::GeneticCode;
use crate::traits::Trait;
use eco_core::MutationConfig;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

impl GeneticCode {
    /// Derive a child code from `parent`.
    ///
    /// Each trait is independently perturbed with probability
    /// `mutation_rate` by a uniform delta of at most `max_delta` times the
    /// trait's span, then clamped into range. The parent is left untouched.
    /// Exactly two draws are taken from `rng` per trait so that the random
    /// stream stays aligned regardless of which traits mutate.
    pub fn derive_from(
        parent: &GeneticCode,
        config: &MutationConfig,
        rng: &mut ChaCha8Rng,
    ) -> GeneticCode {
        let mut values = [0.0; Trait::COUNT];

        for t in Trait::all() {
            let roll = rng.gen::<f32>();
            let unit_delta = rng.gen_range(-1.0f32..=1.0);

            let value = parent.value(t);
            values[t.index()] = if roll < config.mutation_rate {
                value + unit_delta * config.max_delta * t.span()
            } else {
                value
            };
        }

        GeneticCode::from_clamped(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn always() -> MutationConfig {
        MutationConfig {
            mutation_rate: 1.0,
            max_delta: 0.2,
        }
    }

    #[test]
    fn test_parent_unchanged() {
        let parent = GeneticCode::default();
        let before = parent.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let child = GeneticCode::derive_from(&parent, &always(), &mut rng);

        assert_eq!(parent, before);
        assert_ne!(child, parent);
    }

    #[test]
    fn test_no_mutation_copies_parent() {
        let config = MutationConfig {
            mutation_rate: 0.0,
            max_delta: 0.5,
        };
        let parent = GeneticCode::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let child = GeneticCode::derive_from(&parent, &config, &mut rng);
            assert_eq!(child, parent);
        }
    }

    #[test]
    fn test_delta_is_bounded() {
        let config = always();
        let parent = GeneticCode::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..100 {
            let child = GeneticCode::derive_from(&parent, &config, &mut rng);
            for t in Trait::all() {
                let delta = (child.value(t) - parent.value(t)).abs();
                assert!(delta <= config.max_delta * t.span() + 1e-5);
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let parent = GeneticCode::default();
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..10 {
            assert_eq!(
                GeneticCode::derive_from(&parent, &always(), &mut a),
                GeneticCode::derive_from(&parent, &always(), &mut b)
            );
        }
    }

    proptest! {
        #[test]
        fn child_stays_in_range(
            seed in any::<u64>(),
            bias in 0.0f32..=1.0,
            fertility in 0.0f32..=1.0,
            metabolism in 0.1f32..=10.0,
            max_delta in 0.0f32..=1.0,
        ) {
            let parent = GeneticCode::from_pairs([
                ("movement_bias", bias),
                ("fertility", fertility),
                ("metabolism", metabolism),
            ]).unwrap();
            let config = MutationConfig { mutation_rate: 1.0, max_delta };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let mut current = parent.clone();
            for _ in 0..5 {
                current = GeneticCode::derive_from(&current, &config, &mut rng);
                for t in Trait::all() {
                    prop_assert!(t.contains(current.value(t)));
                }
            }
        }
    }
}
