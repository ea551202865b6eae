//! Character definitions for the gacha catalog
//!
//! These are loaded from RON files and shared read-only by every owned copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::skills::SkillId;

/// Star grade of a character (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    One = 1,
    Two,
    Three,
    Four,
    Five,
}

impl Rarity {
    /// Highest tier first, the order rarity rolls scan in
    pub const DESCENDING: [Rarity; 5] = [
        Rarity::Five,
        Rarity::Four,
        Rarity::Three,
        Rarity::Two,
        Rarity::One,
    ];

    pub fn stars(&self) -> u32 {
        *self as u32
    }

    pub fn from_stars(stars: u32) -> Option<Rarity> {
        match stars {
            1 => Some(Rarity::One),
            2 => Some(Rarity::Two),
            3 => Some(Rarity::Three),
            4 => Some(Rarity::Four),
            5 => Some(Rarity::Five),
            _ => None,
        }
    }

    /// Multiplier applied to upgrade costs
    pub fn upgrade_cost_multiplier(&self) -> u64 {
        match self {
            Rarity::One => 1,
            Rarity::Two => 2,
            Rarity::Three => 3,
            Rarity::Four => 5,
            Rarity::Five => 10,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-star", self.stars())
    }
}

/// Upgrade pricing and level cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCurve {
    pub base_cost: u64,
    /// Shown on detail screens; the cost formula itself scales by level
    pub cost_per_level: u64,
    pub max_level: u32,
}

impl Default for UpgradeCurve {
    fn default() -> Self {
        Self {
            base_cost: 100,
            cost_per_level: 100,
            max_level: 10,
        }
    }
}

/// Immutable catalog entry for a collectable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDefinition {
    /// Stable id used by saves
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    /// Free-form element tag (Fire, Water, ...)
    pub element: String,
    pub base_hp: i32,
    pub base_attack: i32,
    pub base_speed: i32,
    /// Mana a freshly acquired copy starts with
    pub base_mana: i32,
    pub max_mana: i32,
    pub skills: Vec<SkillId>,
    #[serde(default)]
    pub upgrade: UpgradeCurve,
    /// Informational only; draws pick uniformly inside a rarity
    pub gacha_weight: f32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Collection of character definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterTemplates {
    pub characters: Vec<CharacterDefinition>,
}

#[allow(clippy::too_many_arguments)]
fn character(
    id: &str,
    name: &str,
    rarity: Rarity,
    element: &str,
    hp: i32,
    attack: i32,
    speed: i32,
    skills: &[&str],
    gacha_weight: f32,
    description: &str,
) -> CharacterDefinition {
    CharacterDefinition {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        element: element.to_string(),
        base_hp: hp,
        base_attack: attack,
        base_speed: speed,
        base_mana: 50,
        max_mana: 100,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        upgrade: UpgradeCurve::default(),
        gacha_weight,
        description: Some(description.to_string()),
    }
}

/// Built-in character roster (hardcoded fallback)
pub fn default_character_templates() -> CharacterTemplates {
    CharacterTemplates {
        characters: vec![
            // === 1-star ===
            character("char_001", "Pip", Rarity::One, "Earth", 80, 12, 5,
                &["slash"], 10.0, "A farmhand with a borrowed sword."),
            character("char_002", "Mira", Rarity::One, "Water", 70, 10, 7,
                &["first_aid"], 10.0, "Village healer, steady under pressure."),
            // === 2-star ===
            character("char_003", "Bran", Rarity::Two, "Fire", 100, 16, 6,
                &["slash", "war_cry"], 7.5, "Blacksmith turned brawler."),
            character("char_004", "Sela", Rarity::Two, "Wind", 90, 15, 9,
                &["rend"], 7.5, "Scout who never misses a weak spot."),
            // === 3-star ===
            character("char_005", "Kael", Rarity::Three, "Fire", 120, 20, 8,
                &["fireball", "slash"], 5.0, "Battle mage of the ember order."),
            character("char_006", "Lune", Rarity::Three, "Water", 110, 18, 10,
                &["frost_nova", "first_aid"], 5.0, "Keeper of the frozen lake."),
            // === 4-star ===
            character("char_007", "Vex", Rarity::Four, "Dark", 130, 26, 11,
                &["venom_fang", "curse", "rend"], 2.5, "Assassin who speaks in riddles."),
            character("char_008", "Aria", Rarity::Four, "Light", 125, 22, 12,
                &["blessing", "war_cry"], 2.5, "Paladin of the dawn chapel."),
            // === 5-star ===
            character("char_009", "Ignis", Rarity::Five, "Fire", 160, 34, 13,
                &["fireball", "thunder_strike", "war_cry"], 0.5, "A dragon wearing a human face."),
            character("char_010", "Seraph", Rarity::Five, "Light", 150, 30, 15,
                &["blessing", "thunder_strike", "curse"], 0.5, "Herald of the high heavens."),
        ],
    }
}
