//! Random initial layouts.
//!
//! Every selected color gets exactly one tube's worth of unit layers. The units are
//! shuffled and dealt into the filled tubes; the trailing tubes start empty. The
//! resulting puzzle is not checked for solvability.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Amount, GameConfig, Layer, PALETTE, Tube, push_merged, tube_id};

pub fn generate(config: &GameConfig) -> Vec<Tube> {
    generate_with_rng(config, &mut rand::rng())
}

pub fn generate_with_rng<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Vec<Tube> {
    let filled_count = config.tube_count.saturating_sub(config.empty_tubes);
    let capacity = config.tube_capacity as Amount;

    let mut units: Vec<Layer> = PALETTE
        .iter()
        .take(config.color_count)
        .flat_map(|&color| std::iter::repeat_n(Layer::new(color, 1.0), config.tube_capacity))
        .collect();
    units.shuffle(rng);
    debug!(
        "Dealing {} units into {filled_count} of {} tubes",
        units.len(),
        config.tube_count
    );

    let mut deal = units.into_iter();
    (0..config.tube_count)
        .map(|i| {
            let mut layers: Vec<Layer> = Vec::new();
            if i < filled_count {
                for unit in deal.by_ref().take(config.tube_capacity) {
                    push_merged(&mut layers, unit);
                }
            }
            Tube::new(tube_id(i), capacity, layers)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LEVELS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_supply_per_color_is_one_tube() {
        let mut rng = StdRng::seed_from_u64(7);
        for level in LEVELS.iter() {
            let config = level.config;
            let tubes = generate_with_rng(&config, &mut rng);
            assert_eq!(tubes.len(), config.tube_count);
            for color in PALETTE.iter().take(config.color_count) {
                let amount: Amount = tubes.iter().map(|t| t.get_color_amount(*color)).sum();
                assert_eq!(amount, config.tube_capacity as Amount, "level {}", level.id);
            }
            for color in PALETTE.iter().skip(config.color_count) {
                assert!(tubes.iter().all(|t| t.get_color_amount(*color) == 0.0));
            }
        }
    }

    #[test]
    fn test_layout_shape() {
        let config = GameConfig {
            tube_count: 6,
            tube_capacity: 4,
            color_count: 4,
            empty_tubes: 2,
        };
        let tubes = generate_with_rng(&config, &mut StdRng::seed_from_u64(42));
        for (i, tube) in tubes.iter().enumerate() {
            assert_eq!(tube.get_id(), format!("tube-{i}"));
            assert_eq!(tube.get_capacity(), 4.0);
            if i < 4 {
                assert!(tube.is_full());
            } else {
                assert!(tube.is_empty());
            }
            for pair in tube.get_layers().windows(2) {
                assert_ne!(pair[0].color, pair[1].color);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = GameConfig::default();
        let a = generate_with_rng(&config, &mut StdRng::seed_from_u64(3));
        let b = generate_with_rng(&config, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fewer_colors_than_filled_tubes() {
        let config = GameConfig {
            tube_count: 5,
            tube_capacity: 3,
            color_count: 2,
            empty_tubes: 1,
        };
        let tubes = generate(&config);
        let filled: Amount = tubes.iter().map(|t| t.get_filled_amount()).sum();
        assert_eq!(filled, 6.0);
        assert!(tubes[2].is_empty() && tubes[3].is_empty() && tubes[4].is_empty());
    }
}
