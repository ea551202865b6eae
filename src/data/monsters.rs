//! Monster templates for battle line-ups
//!
//! These templates are loaded from RON files and referenced by stages.

use serde::{Deserialize, Serialize};

/// A monster as it appears in battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    /// Unique template ID for reference
    pub id: String,
    /// Display name
    pub name: String,
    pub max_hp: i32,
    /// Flat damage dealt each monster turn
    pub attack: i32,
    /// Optional description/lore
    #[serde(default)]
    pub description: Option<String>,
}

impl MonsterDefinition {
    /// Copy with HP and attack scaled and rounded
    pub fn scaled(&self, hp_mult: f32, attack_mult: f32) -> Self {
        Self {
            max_hp: (self.max_hp as f32 * hp_mult).round() as i32,
            attack: (self.attack as f32 * attack_mult).round() as i32,
            ..self.clone()
        }
    }
}

/// Collection of monster templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterTemplates {
    pub templates: Vec<MonsterDefinition>,
}

impl MonsterTemplates {
    /// Find a template by ID
    pub fn find(&self, id: &str) -> Option<&MonsterDefinition> {
        self.templates.iter().find(|t| t.id == id)
    }
}

/// Create default monster templates (hardcoded fallback)
pub fn default_monster_templates() -> MonsterTemplates {
    MonsterTemplates {
        templates: vec![
            MonsterDefinition {
                id: "goblin".to_string(),
                name: "Goblin".to_string(),
                max_hp: 50,
                attack: 10,
                description: Some("Small, greedy and never alone.".to_string()),
            },
            MonsterDefinition {
                id: "orc".to_string(),
                name: "Orc".to_string(),
                max_hp: 80,
                attack: 15,
                description: Some("Thick hide, thicker skull.".to_string()),
            },
            MonsterDefinition {
                id: "troll".to_string(),
                name: "Troll".to_string(),
                max_hp: 120,
                attack: 20,
                description: Some("Regrets nothing, regrows everything.".to_string()),
            },
            // Boss
            MonsterDefinition {
                id: "dragon".to_string(),
                name: "Dragon".to_string(),
                max_hp: 200,
                attack: 30,
                description: Some("Master of the deepest dungeon floor.".to_string()),
            },
        ],
    }
}
