//! Player-owned character instances
//!
//! An owned character points at its shared catalog definition and carries
//! the mutable state: level, experience, mana and skill cooldowns.

use std::sync::Arc;

use crate::data::{CharacterDefinition, SkillDefinition};
use crate::progression::xp::{power_gain, LevelProgress, ATTACK_PER_LEVEL, BASE_EXP_TO_LEVEL, EXP_THRESHOLD_STEP};

#[derive(Debug, Clone, PartialEq)]
pub struct OwnedCharacter {
    definition: Arc<CharacterDefinition>,
    /// Copies acquired, duplicates included
    pub count: u32,
    pub level: u32,
    pub power: u32,
    pub element: String,
    pub favorite: bool,
    pub exp: u32,
    pub exp_to_level_up: u32,
    current_mana: i32,
    /// One counter per skill in the definition, turns until usable
    skill_cooldowns: Vec<u32>,
}

impl OwnedCharacter {
    /// Fresh copy from a first gacha acquisition
    pub fn new(definition: Arc<CharacterDefinition>) -> Self {
        let level = 1;
        Self {
            count: 1,
            level,
            power: power_gain(level),
            element: definition.element.clone(),
            favorite: false,
            exp: 0,
            exp_to_level_up: BASE_EXP_TO_LEVEL,
            current_mana: definition.base_mana,
            skill_cooldowns: vec![0; definition.skills.len()],
            definition,
        }
    }

    /// Rebuild from saved level and power
    pub fn restored(definition: Arc<CharacterDefinition>, level: u32, power: u32) -> Self {
        let mut owned = Self::new(definition);
        owned.level = level.clamp(1, owned.max_level());
        owned.power = power;
        owned
    }

    pub fn definition(&self) -> &Arc<CharacterDefinition> {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn max_level(&self) -> u32 {
        self.definition.upgrade.max_level
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level()
    }

    /// Normal attack damage: base attack plus a flat bonus per level
    pub fn attack_power(&self) -> i32 {
        self.definition.base_attack + self.level as i32 * ATTACK_PER_LEVEL
    }

    pub fn current_mana(&self) -> i32 {
        self.current_mana
    }

    pub fn max_mana(&self) -> i32 {
        self.definition.max_mana
    }

    pub fn skill_cooldowns(&self) -> &[u32] {
        &self.skill_cooldowns
    }

    pub fn skill_count(&self) -> usize {
        self.definition.skills.len()
    }

    /// Restore saved cooldowns; ignored unless the length matches the skill list
    pub fn set_skill_cooldowns(&mut self, cooldowns: Vec<u32>) {
        if cooldowns.len() == self.skill_count() {
            self.skill_cooldowns = cooldowns;
        } else {
            log::warn!(
                "Ignoring {} saved cooldowns for '{}' ({} skills)",
                cooldowns.len(),
                self.id(),
                self.skill_count()
            );
        }
    }

    /// Cooldown elapsed and enough mana
    pub fn can_use_skill(&self, index: usize, skill: &SkillDefinition) -> bool {
        match self.skill_cooldowns.get(index) {
            Some(&cooldown) => cooldown == 0 && self.current_mana >= skill.mana_cost,
            None => false,
        }
    }

    /// Pay mana and start the cooldown; false if the skill is not ready
    pub fn use_skill(&mut self, index: usize, skill: &SkillDefinition) -> bool {
        if !self.can_use_skill(index, skill) {
            return false;
        }
        self.current_mana -= skill.mana_cost;
        self.skill_cooldowns[index] = skill.cooldown;
        true
    }

    /// Tick every cooldown down by one turn
    pub fn end_turn(&mut self) {
        for cooldown in &mut self.skill_cooldowns {
            *cooldown = cooldown.saturating_sub(1);
        }
    }

    /// Restore mana, capped at max
    pub fn restore_mana(&mut self, amount: i32) {
        self.current_mana = (self.current_mana + amount.max(0)).min(self.max_mana());
    }

    pub fn refill_mana(&mut self) {
        self.current_mana = self.max_mana();
    }

    /// Add experience, levelling up as many times as it covers
    ///
    /// Levelling stops at max level; experience past that keeps accumulating.
    pub fn add_experience(&mut self, amount: u32) -> LevelProgress {
        self.exp = self.exp.saturating_add(amount);
        let mut levels_gained = 0;

        while self.exp >= self.exp_to_level_up && !self.is_max_level() {
            self.exp -= self.exp_to_level_up;
            self.level += 1;
            self.power += power_gain(self.level);
            self.exp_to_level_up += EXP_THRESHOLD_STEP;
            levels_gained += 1;
        }

        LevelProgress {
            levels_gained,
            new_level: self.level,
        }
    }

    /// Raise the level by one (cost and cap are checked by the caller)
    pub fn upgrade(&mut self) {
        self.level += 1;
        self.power += power_gain(self.level);
    }

    /// Fold a duplicate entry into this one
    pub fn absorb(&mut self, other: OwnedCharacter) {
        self.count += other.count;
        self.favorite |= other.favorite;
        if other.level > self.level {
            let count = self.count;
            let favorite = self.favorite;
            *self = other;
            self.count = count;
            self.favorite = favorite;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Catalog, SkillType};

    fn kael() -> OwnedCharacter {
        let catalog = Catalog::default();
        OwnedCharacter::new(catalog.character("char_005").unwrap().clone())
    }

    fn costly_skill(mana_cost: i32, cooldown: u32) -> SkillDefinition {
        SkillDefinition {
            id: "x".to_string(),
            name: "X".to_string(),
            skill_type: SkillType::Attack,
            base_damage: 10,
            heal_amount: 0,
            effect_multiplier: 1.0,
            cooldown,
            mana_cost,
            is_aoe: false,
            status_effect: Default::default(),
            status_duration: 0,
            status_chance: 0.0,
            description: None,
        }
    }

    #[test]
    fn test_new_character_state() {
        let c = kael();
        assert_eq!(c.level, 1);
        assert_eq!(c.power, 1);
        assert_eq!(c.count, 1);
        assert_eq!(c.current_mana(), 50);
        assert_eq!(c.skill_cooldowns(), &[0, 0]);
    }

    #[test]
    fn test_attack_power() {
        let mut c = kael();
        c.level = 3;
        assert_eq!(c.attack_power(), 35); // 20 + 3 * 5
    }

    #[test]
    fn test_use_skill_spends_mana_and_sets_cooldown() {
        let mut c = kael();
        let skill = costly_skill(30, 3);
        assert!(c.use_skill(0, &skill));
        assert_eq!(c.current_mana(), 20);
        assert_eq!(c.skill_cooldowns()[0], 3);
        assert!(!c.can_use_skill(0, &skill));

        // Not enough mana for a second copy on the other slot
        assert!(!c.can_use_skill(1, &skill));
        assert!(!c.use_skill(1, &skill));
        assert_eq!(c.current_mana(), 20);
    }

    #[test]
    fn test_end_turn_floors_at_zero() {
        let mut c = kael();
        c.use_skill(0, &costly_skill(0, 1));
        c.end_turn();
        c.end_turn();
        assert_eq!(c.skill_cooldowns(), &[0, 0]);
    }

    #[test]
    fn test_out_of_range_skill_index() {
        let c = kael();
        assert!(!c.can_use_skill(9, &costly_skill(0, 0)));
    }

    #[test]
    fn test_restore_mana_caps() {
        let mut c = kael();
        c.restore_mana(500);
        assert_eq!(c.current_mana(), c.max_mana());
    }

    #[test]
    fn test_multi_level_experience() {
        let mut c = kael();
        // 100 (1->2) + 150 (2->3) + 30 left over
        let progress = c.add_experience(280);
        assert_eq!(progress.levels_gained, 2);
        assert_eq!(c.level, 3);
        assert_eq!(c.exp, 30);
        assert_eq!(c.exp_to_level_up, 200);
        assert_eq!(c.power, 1 + 4 + 9);
    }

    #[test]
    fn test_experience_split_matches_single_grant() {
        let mut once = kael();
        once.add_experience(1234);

        let mut split = kael();
        for amount in [100, 1, 499, 34, 600] {
            split.add_experience(amount);
        }

        assert_eq!(
            (once.level, once.exp, once.exp_to_level_up, once.power),
            (split.level, split.exp, split.exp_to_level_up, split.power)
        );
    }

    #[test]
    fn test_experience_accumulates_past_max_level() {
        let mut c = kael();
        c.add_experience(1_000_000);
        assert_eq!(c.level, c.max_level());
        assert!(c.exp >= c.exp_to_level_up);

        let exp = c.exp;
        let progress = c.add_experience(500);
        assert!(!progress.leveled_up());
        assert_eq!(c.level, c.max_level());
        assert_eq!(c.exp, exp + 500);
    }

    #[test]
    fn test_absorb_keeps_highest_level() {
        let mut low = kael();
        low.favorite = true;
        let mut high = kael();
        high.level = 4;
        high.count = 2;

        low.absorb(high);
        assert_eq!(low.level, 4);
        assert_eq!(low.count, 3);
        assert!(low.favorite);
    }
}
