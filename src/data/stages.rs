//! Stage definitions
//!
//! Stages are ordered; stage N requires stage N-1 to be cleared. The ladder
//! state itself lives in `progression::stages`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::monsters::{MonsterDefinition, MonsterTemplates};
use crate::progression::StageScaling;

/// Gold and experience paid out together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub gold: u64,
    pub exp: u32,
}

impl Reward {
    pub fn new(gold: u64, exp: u32) -> Self {
        Self { gold, exp }
    }
}

impl std::ops::AddAssign for Reward {
    fn add_assign(&mut self, other: Self) {
        self.gold += other.gold;
        self.exp += other.exp;
    }
}

/// Immutable stage data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub name: String,
    pub number: u32,
    #[serde(default)]
    pub description: String,
    pub recommended_level: u32,
    /// 1.0 = base monster stats
    pub difficulty_multiplier: f32,
    /// Monster ids drawn for the normal waves
    pub normal_monsters: Vec<String>,
    pub boss_monster: Option<String>,
    /// Number of normal monsters before the boss
    pub monster_count: u32,
    pub base_gold_reward: u64,
    pub base_exp_reward: u32,
    pub bonus_gold_reward: u64,
    pub bonus_exp_reward: u32,
}

impl StageDefinition {
    pub fn has_boss(&self) -> bool {
        self.boss_monster.is_some()
    }

    /// Total gold for clearing the stage
    pub fn total_gold_reward(&self) -> u64 {
        let mut total = self.base_gold_reward;
        if self.has_boss() {
            total += self.bonus_gold_reward;
        }
        total
    }

    /// Total experience for clearing the stage
    pub fn total_exp_reward(&self) -> u32 {
        let mut total = self.base_exp_reward;
        if self.has_boss() {
            total += self.bonus_exp_reward;
        }
        total
    }

    pub fn total_reward(&self) -> Reward {
        Reward::new(self.total_gold_reward(), self.total_exp_reward())
    }

    /// Roll the ordered monster line-up for one attempt
    ///
    /// `monster_count` normal monsters picked at random from the pool, then
    /// the boss if there is one. Unknown ids are skipped.
    pub fn monster_lineup(
        &self,
        monsters: &MonsterTemplates,
        scaling: &StageScaling,
        rng: &mut impl Rng,
    ) -> Vec<MonsterDefinition> {
        let pool: Vec<&MonsterDefinition> = self
            .normal_monsters
            .iter()
            .filter_map(|id| {
                let found = monsters.find(id);
                if found.is_none() {
                    log::warn!("Stage '{}' references unknown monster '{}'", self.name, id);
                }
                found
            })
            .collect();

        let mut lineup = Vec::with_capacity(self.monster_count as usize + 1);
        if !pool.is_empty() {
            for _ in 0..self.monster_count {
                let picked = pool[rng.gen_range(0..pool.len())];
                lineup.push(scaling.scale_normal(picked));
            }
        }

        if let Some(boss_id) = &self.boss_monster {
            match monsters.find(boss_id) {
                Some(boss) => lineup.push(scaling.scale_boss(boss)),
                None => log::warn!("Stage '{}' references unknown boss '{}'", self.name, boss_id),
            }
        }

        lineup
    }
}

/// Collection of stage definitions, in unlock order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTemplates {
    pub stages: Vec<StageDefinition>,
}

#[allow(clippy::too_many_arguments)]
fn dungeon(
    name: &str,
    number: u32,
    description: &str,
    recommended_level: u32,
    difficulty: f32,
    monster_count: u32,
    gold: u64,
    exp: u32,
) -> StageDefinition {
    StageDefinition {
        name: name.to_string(),
        number,
        description: description.to_string(),
        recommended_level,
        difficulty_multiplier: difficulty,
        normal_monsters: vec!["goblin".to_string(), "orc".to_string(), "troll".to_string()],
        boss_monster: Some("dragon".to_string()),
        monster_count,
        base_gold_reward: gold,
        base_exp_reward: exp,
        bonus_gold_reward: gold / 2,
        bonus_exp_reward: exp / 2,
    }
}

/// Create default stages (hardcoded fallback)
pub fn default_stage_templates() -> StageTemplates {
    StageTemplates {
        stages: vec![
            dungeon("Beginner Dungeon", 1, "A simple dungeon for new adventurers.", 1, 1.0, 3, 100, 50),
            dungeon("Intermediate Dungeon", 2, "For adventurers with a few fights behind them.", 5, 1.5, 5, 200, 100),
            dungeon("Advanced Dungeon", 3, "Only seasoned adventurers dare enter.", 10, 2.0, 7, 300, 150),
        ],
    }
}
