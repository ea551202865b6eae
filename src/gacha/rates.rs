//! Rarity roll table

use rand::Rng;

use crate::data::{GameConfig, Rarity};

/// Cumulative weight table scanned from the highest tier down
#[derive(Debug, Clone, PartialEq)]
pub struct RarityTable {
    tiers: Vec<(Rarity, f64)>,
    total: f64,
}

impl RarityTable {
    /// Build a table; tiers are reordered highest first and non-positive weights dropped
    pub fn new(weights: &[(Rarity, f64)]) -> Self {
        let mut tiers: Vec<(Rarity, f64)> = weights
            .iter()
            .copied()
            .filter(|&(rarity, weight)| {
                let usable = weight.is_finite() && weight > 0.0;
                if !usable {
                    log::warn!("Ignoring weight {} for {}", weight, rarity);
                }
                usable
            })
            .collect();
        tiers.sort_by(|a, b| b.0.cmp(&a.0));

        let total = tiers.iter().map(|&(_, w)| w).sum();
        Self { tiers, total }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(&config.rarity_weights)
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Expected share of rolls landing on `rarity`
    pub fn probability(&self, rarity: Rarity) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        let weight: f64 = self.tiers.iter().filter(|&&(r, _)| r == rarity).map(|&(_, w)| w).sum();
        weight / self.total
    }

    /// Roll a rarity tier
    ///
    /// Draws uniformly in `[0, total)` and returns the first tier whose
    /// cumulative weight reaches the draw. Falls back to one star when the
    /// table is empty.
    pub fn roll(&self, rng: &mut impl Rng) -> Rarity {
        if self.total <= 0.0 {
            return Rarity::One;
        }

        let draw = rng.gen_range(0.0..self.total);
        let mut cumulative = 0.0;
        for &(rarity, weight) in &self.tiers {
            cumulative += weight;
            if draw <= cumulative {
                return rarity;
            }
        }

        Rarity::One
    }
}

impl Default for RarityTable {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tiers_sorted_descending() {
        let table = RarityTable::new(&[(Rarity::One, 1.0), (Rarity::Five, 1.0), (Rarity::Three, 2.0)]);
        let order: Vec<Rarity> = table.tiers.iter().map(|&(r, _)| r).collect();
        assert_eq!(order, vec![Rarity::Five, Rarity::Three, Rarity::One]);
        assert_eq!(table.total_weight(), 4.0);
    }

    #[test]
    fn test_frequencies_match_weights() {
        let table = RarityTable::default();
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 100_000;
        let mut counts = [0u32; 5];

        for _ in 0..trials {
            let rarity = table.roll(&mut rng);
            counts[rarity.stars() as usize - 1] += 1;
        }

        for rarity in Rarity::DESCENDING {
            let observed = counts[rarity.stars() as usize - 1] as f64 / trials as f64;
            let expected = table.probability(rarity);
            assert!(
                (observed - expected).abs() < 0.01,
                "{}: observed {:.4}, expected {:.4}",
                rarity,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_empty_table_falls_back() {
        let table = RarityTable::new(&[(Rarity::Five, 0.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(table.roll(&mut rng), Rarity::One);
    }

    #[test]
    fn test_single_tier_always_wins() {
        let table = RarityTable::new(&[(Rarity::Four, 3.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(table.roll(&mut rng), Rarity::Four);
        }
    }
}
