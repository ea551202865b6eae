//! Skill definitions
//!
//! Skills are referenced by id from character definitions.

use serde::{Deserialize, Serialize};

/// Unique skill ID
pub type SkillId = String;

/// What a skill does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillType {
    Attack,
    Heal,
    Buff,
    Debuff,
    Status,
}

/// Status effects a skill may inflict on its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusEffectType {
    #[default]
    None,
    Poison,
    Stun,
    Burn,
    Freeze,
    Bleed,
}

impl StatusEffectType {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEffectType::None => "None",
            StatusEffectType::Poison => "Poison",
            StatusEffectType::Stun => "Stun",
            StatusEffectType::Burn => "Burn",
            StatusEffectType::Freeze => "Freeze",
            StatusEffectType::Bleed => "Bleed",
        }
    }
}

/// A skill definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub skill_type: SkillType,
    /// Damage for Attack skills
    #[serde(default)]
    pub base_damage: i32,
    /// Healing for Heal skills
    #[serde(default)]
    pub heal_amount: i32,
    /// Per-level scaling; truncated to a whole number before use
    pub effect_multiplier: f32,
    pub cooldown: u32,
    pub mana_cost: i32,
    #[serde(default)]
    pub is_aoe: bool,
    #[serde(default)]
    pub status_effect: StatusEffectType,
    #[serde(default)]
    pub status_duration: u32,
    /// Chance in 0..=1 that the status lands
    #[serde(default)]
    pub status_chance: f32,
    #[serde(default)]
    pub description: Option<String>,
}

impl SkillDefinition {
    /// Whole-number scaling per character level
    pub fn level_scaling(&self, level: u32) -> i32 {
        level as i32 * self.effect_multiplier.trunc() as i32
    }

    /// Damage at a given character level
    pub fn damage_at(&self, level: u32) -> i32 {
        self.base_damage + self.level_scaling(level)
    }

    /// Healing at a given character level
    pub fn heal_at(&self, level: u32) -> i32 {
        self.heal_amount + self.level_scaling(level)
    }

    pub fn has_status(&self) -> bool {
        self.status_effect != StatusEffectType::None
    }
}

/// Collection of skill definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillTemplates {
    pub skills: Vec<SkillDefinition>,
}

impl SkillTemplates {
    /// Find a skill by ID
    pub fn find(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.iter().find(|s| s.id == id)
    }
}

fn skill(id: &str, name: &str, skill_type: SkillType, cooldown: u32, mana_cost: i32) -> SkillDefinition {
    SkillDefinition {
        id: id.to_string(),
        name: name.to_string(),
        skill_type,
        base_damage: 0,
        heal_amount: 0,
        effect_multiplier: 0.0,
        cooldown,
        mana_cost,
        is_aoe: false,
        status_effect: StatusEffectType::None,
        status_duration: 0,
        status_chance: 0.0,
        description: None,
    }
}

/// Built-in skills (hardcoded fallback)
pub fn default_skill_templates() -> SkillTemplates {
    SkillTemplates {
        skills: vec![
            SkillDefinition {
                base_damage: 25,
                effect_multiplier: 3.0,
                description: Some("A quick, clean cut.".to_string()),
                ..skill("slash", "Slash", SkillType::Attack, 2, 20)
            },
            SkillDefinition {
                base_damage: 40,
                effect_multiplier: 5.0,
                status_effect: StatusEffectType::Burn,
                status_duration: 2,
                status_chance: 0.3,
                description: Some("Hurls a ball of fire that may set the target ablaze.".to_string()),
                ..skill("fireball", "Fireball", SkillType::Attack, 3, 35)
            },
            SkillDefinition {
                heal_amount: 30,
                effect_multiplier: 2.0,
                description: Some("Patches up wounds mid-fight.".to_string()),
                ..skill("first_aid", "First Aid", SkillType::Heal, 3, 25)
            },
            SkillDefinition {
                description: Some("Rallies the spirit.".to_string()),
                ..skill("war_cry", "War Cry", SkillType::Buff, 4, 15)
            },
            SkillDefinition {
                description: Some("Saps the enemy's resolve.".to_string()),
                ..skill("curse", "Curse", SkillType::Debuff, 4, 15)
            },
            SkillDefinition {
                status_effect: StatusEffectType::Poison,
                status_duration: 3,
                status_chance: 0.6,
                description: Some("A venomous bite.".to_string()),
                ..skill("venom_fang", "Venom Fang", SkillType::Status, 3, 20)
            },
            SkillDefinition {
                base_damage: 30,
                effect_multiplier: 4.0,
                is_aoe: true,
                status_effect: StatusEffectType::Freeze,
                status_duration: 1,
                status_chance: 0.25,
                description: Some("A ring of frost around the caster.".to_string()),
                ..skill("frost_nova", "Frost Nova", SkillType::Attack, 4, 40)
            },
            SkillDefinition {
                base_damage: 60,
                effect_multiplier: 6.0,
                status_effect: StatusEffectType::Stun,
                status_duration: 1,
                status_chance: 0.2,
                description: Some("Calls lightning down on a single foe.".to_string()),
                ..skill("thunder_strike", "Thunder Strike", SkillType::Attack, 5, 50)
            },
            SkillDefinition {
                base_damage: 20,
                effect_multiplier: 2.0,
                status_effect: StatusEffectType::Bleed,
                status_duration: 3,
                status_chance: 0.5,
                description: Some("Tears an open wound.".to_string()),
                ..skill("rend", "Rend", SkillType::Attack, 2, 15)
            },
            SkillDefinition {
                heal_amount: 50,
                effect_multiplier: 4.0,
                description: Some("Holy light restores vitality.".to_string()),
                ..skill("blessing", "Blessing", SkillType::Heal, 5, 45)
            },
        ],
    }
}
