//! Lifetime player statistics
//!
//! Tracks battles, draws and earnings across sessions. Stored next to the
//! save in its own file.

use serde::{Deserialize, Serialize};

use super::save_game::{read_json, write_json, SaveError, SaveStore};
use crate::data::Reward;

pub const STATS_FILE: &str = "statistics.json";

/// Profile statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameStatistics {
    /// Battles started, abandoned ones included
    pub total_battles: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub total_gacha_pulls: u32,
    /// Exp earned in battle, all time
    pub total_exp_earned: u64,
    /// Gold earned in battle, all time
    pub total_gold_earned: u64,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_battle_start(&mut self) {
        self.total_battles += 1;
    }

    /// Record a finished battle and what it paid out
    pub fn record_battle_end(&mut self, won: Option<bool>, totals: Reward) {
        match won {
            Some(true) => self.battles_won += 1,
            Some(false) => self.battles_lost += 1,
            None => {}
        }
        self.total_exp_earned += totals.exp as u64;
        self.total_gold_earned += totals.gold;
    }

    pub fn record_pulls(&mut self, count: u32) {
        self.total_gacha_pulls += count;
    }

    /// Share of decided battles that were won
    pub fn win_rate(&self) -> f32 {
        let decided = self.battles_won + self.battles_lost;
        if decided == 0 {
            0.0
        } else {
            self.battles_won as f32 / decided as f32
        }
    }
}

impl SaveStore {
    /// Load statistics (or create default)
    pub fn load_statistics(&self) -> GameStatistics {
        match read_json(&self.path(STATS_FILE)) {
            Ok(Some(stats)) => stats,
            Ok(None) => GameStatistics::new(),
            Err(e) => {
                log::warn!("Failed to load statistics: {}, starting new", e);
                GameStatistics::new()
            }
        }
    }

    pub fn save_statistics(&self, stats: &GameStatistics) -> Result<(), SaveError> {
        write_json(&self.path(STATS_FILE), stats)
    }
}
