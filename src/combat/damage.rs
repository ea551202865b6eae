//! Combat math
//!
//! Pure helpers for attack damage, skill effects and status rolls.

use rand::Rng;

use crate::data::{SkillDefinition, SkillType, StatusEffectType};
use crate::roster::OwnedCharacter;

/// What a skill does once its cost is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEffect {
    Damage(i32),
    Heal(i32),
    Buff,
    Debuff,
    /// Status skills only try to apply their effect
    StatusOnly,
}

/// Normal attack damage
pub fn normal_attack_damage(character: &OwnedCharacter) -> i32 {
    character.attack_power()
}

/// Resolve a skill's numeric effect at the caster's level
pub fn resolve_skill(skill: &SkillDefinition, level: u32) -> SkillEffect {
    match skill.skill_type {
        SkillType::Attack => SkillEffect::Damage(skill.damage_at(level).max(0)),
        SkillType::Heal => SkillEffect::Heal(skill.heal_at(level).max(0)),
        SkillType::Buff => SkillEffect::Buff,
        SkillType::Debuff => SkillEffect::Debuff,
        SkillType::Status => SkillEffect::StatusOnly,
    }
}

/// HP after taking damage, floored at zero
pub fn apply_damage(hp: i32, damage: i32) -> i32 {
    (hp - damage.max(0)).max(0)
}

/// HP after healing, capped at `max_hp`
pub fn apply_heal(hp: i32, amount: i32, max_hp: i32) -> i32 {
    (hp + amount.max(0)).min(max_hp)
}

/// Roll a skill's status effect against its trigger chance
///
/// `Ok` carries the effect and duration when it lands, `Err` the effect
/// when it was resisted. `None` when the skill has no status.
pub fn roll_status(
    skill: &SkillDefinition,
    rng: &mut impl Rng,
) -> Option<Result<(StatusEffectType, u32), StatusEffectType>> {
    if !skill.has_status() {
        return None;
    }

    if rng.gen::<f32>() < skill.status_chance {
        Some(Ok((skill.status_effect, skill.status_duration)))
    } else {
        Some(Err(skill.status_effect))
    }
}
