//! Draws against the catalog
//!
//! Gold is taken before any roll. A ten-draw is paid as one purchase and
//! either fully charged or not charged at all.

use std::sync::Arc;

use rand::Rng;

use super::rates::RarityTable;
use crate::currency::CurrencyLedger;
use crate::data::{Catalog, CharacterDefinition, GameConfig, Rarity};
use crate::error::{GameError, GameResult};
use crate::roster::{Acquisition, Roster};

/// Number of pulls in a bulk draw
pub const TEN_DRAW_SIZE: usize = 10;

/// One roll merged into the roster
#[derive(Debug, Clone)]
pub struct Pull {
    pub definition: Arc<CharacterDefinition>,
    pub acquisition: Acquisition,
    /// Gold paid back for a duplicate, zero for a new character
    pub refund: u64,
}

impl Pull {
    pub fn is_new(&self) -> bool {
        self.acquisition == Acquisition::New
    }
}

/// Result of a ten-draw
#[derive(Debug, Clone, Default)]
pub struct TenDraw {
    pub pulls: Vec<Pull>,
    /// Rolls lost to an empty rarity pool
    pub failed: usize,
}

impl TenDraw {
    /// Characters acquired for the first time by this draw
    pub fn new_characters(&self) -> Vec<&Arc<CharacterDefinition>> {
        self.pulls.iter().filter(|p| p.is_new()).map(|p| &p.definition).collect()
    }

    pub fn characters(&self) -> Vec<&Arc<CharacterDefinition>> {
        self.pulls.iter().map(|p| &p.definition).collect()
    }

    pub fn total_refund(&self) -> u64 {
        self.pulls.iter().map(|p| p.refund).sum()
    }
}

/// Prices and odds for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct GachaEngine {
    table: RarityTable,
    single_cost: u64,
    ten_cost: u64,
    duplicate_reward: u64,
}

impl GachaEngine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            table: RarityTable::from_config(config),
            single_cost: config.single_draw_cost,
            ten_cost: config.ten_draw_cost,
            duplicate_reward: config.duplicate_reward,
        }
    }

    pub fn table(&self) -> &RarityTable {
        &self.table
    }

    pub fn single_cost(&self) -> u64 {
        self.single_cost
    }

    pub fn ten_cost(&self) -> u64 {
        self.ten_cost
    }

    /// Pay for and roll one character
    ///
    /// An empty rarity pool fails after payment; the gold is not returned.
    pub fn draw_one(
        &self,
        catalog: &Catalog,
        roster: &mut Roster,
        ledger: &mut CurrencyLedger,
        rng: &mut impl Rng,
    ) -> GameResult<Pull> {
        ledger.spend(self.single_cost)?;
        log::info!("Single draw for {} gold", self.single_cost);
        self.roll_and_merge(catalog, roster, ledger, rng)
    }

    /// Pay for and roll ten characters
    pub fn draw_ten(
        &self,
        catalog: &Catalog,
        roster: &mut Roster,
        ledger: &mut CurrencyLedger,
        rng: &mut impl Rng,
    ) -> GameResult<TenDraw> {
        ledger.spend(self.ten_cost)?;
        log::info!("Ten draw for {} gold", self.ten_cost);

        let mut result = TenDraw::default();
        for _ in 0..TEN_DRAW_SIZE {
            match self.roll_and_merge(catalog, roster, ledger, rng) {
                Ok(pull) => result.pulls.push(pull),
                Err(_) => result.failed += 1,
            }
        }
        Ok(result)
    }

    fn roll_and_merge(
        &self,
        catalog: &Catalog,
        roster: &mut Roster,
        ledger: &mut CurrencyLedger,
        rng: &mut impl Rng,
    ) -> GameResult<Pull> {
        let rarity = self.table.roll(rng);
        let definition = pick_in_rarity(catalog, rarity, rng)?;

        let acquisition = roster.acquire(definition.clone());
        let refund = match acquisition {
            Acquisition::New => {
                log::info!("Drew new character {} ({})", definition.name, rarity);
                0
            }
            Acquisition::Duplicate { count } => {
                ledger.add(self.duplicate_reward);
                log::info!(
                    "Drew duplicate {} (x{}), refunded {} gold",
                    definition.name,
                    count,
                    self.duplicate_reward
                );
                self.duplicate_reward
            }
        };

        Ok(Pull {
            definition,
            acquisition,
            refund,
        })
    }
}

impl Default for GachaEngine {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// Choose a character of the given rarity, uniformly
pub fn pick_in_rarity(
    catalog: &Catalog,
    rarity: Rarity,
    rng: &mut impl Rng,
) -> GameResult<Arc<CharacterDefinition>> {
    let pool = catalog.by_rarity(rarity);
    if pool.is_empty() {
        log::warn!("No characters of rarity {} to draw from", rarity);
        return Err(GameError::EmptyRarityPool(rarity));
    }

    Ok(pool[rng.gen_range(0..pool.len())].clone())
}
