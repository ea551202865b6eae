//! Gold balance
//!
//! A single non-negative balance. Grants are additive writes; spending is
//! all-or-nothing.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrencyLedger {
    gold: u64,
}

impl CurrencyLedger {
    pub fn new(gold: u64) -> Self {
        Self { gold }
    }

    /// Get current gold
    pub fn gold(&self) -> u64 {
        self.gold
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        self.gold >= amount
    }

    /// Add gold
    pub fn add(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend gold; the balance is untouched on failure
    pub fn spend(&mut self, amount: u64) -> GameResult<()> {
        if self.gold >= amount {
            self.gold -= amount;
            Ok(())
        } else {
            Err(GameError::InsufficientCurrency {
                needed: amount,
                available: self.gold,
            })
        }
    }

    /// Overwrite the balance (used when loading a save)
    pub fn set(&mut self, gold: u64) {
        self.gold = gold;
    }
}
