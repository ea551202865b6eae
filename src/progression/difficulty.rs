//! Stage difficulty scaling
//!
//! Monsters are scaled by the stage's difficulty multiplier; bosses get a
//! second multiplier on top.

use crate::data::{GameConfig, MonsterDefinition, StageDefinition};

/// Scaling applied to a stage's monster line-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageScaling {
    /// Stage difficulty (1.0 = base stats)
    pub difficulty: f32,
    pub boss_hp_mult: f32,
    pub boss_attack_mult: f32,
}

impl StageScaling {
    pub fn new(difficulty: f32, boss_hp_mult: f32, boss_attack_mult: f32) -> Self {
        Self { difficulty, boss_hp_mult, boss_attack_mult }
    }

    pub fn for_stage(stage: &StageDefinition, config: &GameConfig) -> Self {
        Self::new(stage.difficulty_multiplier, config.boss_hp_multiplier, config.boss_attack_multiplier)
    }

    /// Scale a normal monster: HP and attack both times difficulty
    pub fn scale_normal(&self, monster: &MonsterDefinition) -> MonsterDefinition {
        monster.scaled(self.difficulty, self.difficulty)
    }

    /// Scale a boss: difficulty first, then the boss multipliers, rounding each step
    pub fn scale_boss(&self, monster: &MonsterDefinition) -> MonsterDefinition {
        self.scale_normal(monster).scaled(self.boss_hp_mult, self.boss_attack_mult)
    }
}

impl Default for StageScaling {
    fn default() -> Self {
        Self::new(1.0, 1.5, 1.3)
    }
}
