//! Tunable game constants
//!
//! Loaded from `config.ron` next to the other data files; any missing field
//! falls back to the built-in value.

use serde::{Deserialize, Serialize};

use super::characters::Rarity;
use super::stages::Reward;

/// Economy, battle and gacha tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gold for a new profile or after an unreadable save
    pub starting_gold: u64,
    pub single_draw_cost: u64,
    pub ten_draw_cost: u64,
    /// Gold paid when a draw lands on an owned character
    pub duplicate_reward: u64,
    /// Relative weights per rarity tier
    pub rarity_weights: Vec<(Rarity, f64)>,
    /// Chance to use a skill when one is eligible
    pub skill_use_chance: f32,
    /// Player HP at battle start, also the heal cap
    pub player_base_hp: i32,
    pub monster_exp_reward: u32,
    pub monster_gold_reward: u64,
    pub boss_hp_multiplier: f32,
    pub boss_attack_multiplier: f32,
    /// Suggested pause between battle steps for presentation layers
    pub turn_delay_ms: u64,
}

impl GameConfig {
    /// Fixed reward for each monster defeated
    pub fn monster_reward(&self) -> Reward {
        Reward::new(self.monster_gold_reward, self.monster_exp_reward)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_gold: 1000,
            single_draw_cost: 300,
            ten_draw_cost: 2700,
            duplicate_reward: 300,
            rarity_weights: vec![
                (Rarity::Five, 1.0),
                (Rarity::Four, 5.0),
                (Rarity::Three, 15.0),
                (Rarity::Two, 30.0),
                (Rarity::One, 49.0),
            ],
            skill_use_chance: 0.7,
            player_base_hp: 100,
            monster_exp_reward: 50,
            monster_gold_reward: 30,
            boss_hp_multiplier: 1.5,
            boss_attack_multiplier: 1.3,
            turn_delay_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config: GameConfig = ron::from_str("(single_draw_cost: 500)").unwrap();
        assert_eq!(config.single_draw_cost, 500);
        assert_eq!(config.ten_draw_cost, 2700);
        assert_eq!(config.rarity_weights.len(), 5);
    }
}
