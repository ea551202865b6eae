//! Read-only catalog of characters, skills, monsters and stages
//!
//! Built once from templates and referenced by id everywhere else. Owned
//! characters share their definition through an `Arc`.

use std::sync::Arc;

use super::characters::{default_character_templates, CharacterDefinition, CharacterTemplates, Rarity};
use super::monsters::{default_monster_templates, MonsterTemplates};
use super::skills::{default_skill_templates, SkillDefinition, SkillTemplates};
use super::stages::{default_stage_templates, StageDefinition, StageTemplates};
use crate::error::{GameError, GameResult};

/// Resolves character ids to definitions when rehydrating saves
pub trait CharacterSource {
    fn load_character_definition(&self, id: &str) -> GameResult<Arc<CharacterDefinition>>;
}

#[derive(Debug, Clone)]
pub struct Catalog {
    characters: Vec<Arc<CharacterDefinition>>,
    skills: SkillTemplates,
    monsters: MonsterTemplates,
    stages: StageTemplates,
}

impl Catalog {
    /// Build a catalog, dropping references that do not resolve
    pub fn new(
        characters: CharacterTemplates,
        skills: SkillTemplates,
        monsters: MonsterTemplates,
        stages: StageTemplates,
    ) -> Self {
        let mut validated: Vec<Arc<CharacterDefinition>> = Vec::with_capacity(characters.characters.len());

        for mut def in characters.characters {
            if validated.iter().any(|c| c.id == def.id) {
                log::warn!("Duplicate character id '{}' in catalog, keeping the first", def.id);
                continue;
            }

            def.skills.retain(|skill_id| {
                let known = skills.find(skill_id).is_some();
                if !known {
                    log::warn!("Character '{}' references unknown skill '{}'", def.id, skill_id);
                }
                known
            });

            def.max_mana = def.max_mana.max(0);
            def.base_mana = def.base_mana.clamp(0, def.max_mana);
            def.upgrade.max_level = def.upgrade.max_level.max(1);

            validated.push(Arc::new(def));
        }

        log::debug!(
            "Catalog built: {} characters, {} skills, {} monsters, {} stages",
            validated.len(),
            skills.skills.len(),
            monsters.templates.len(),
            stages.stages.len()
        );

        Self {
            characters: validated,
            skills,
            monsters,
            stages,
        }
    }

    pub fn characters(&self) -> &[Arc<CharacterDefinition>] {
        &self.characters
    }

    /// Find a character by ID
    pub fn character(&self, id: &str) -> Option<&Arc<CharacterDefinition>> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// All characters of one rarity, in catalog order
    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&Arc<CharacterDefinition>> {
        self.characters.iter().filter(|c| c.rarity == rarity).collect()
    }

    /// Find a skill by ID
    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.find(id)
    }

    pub fn skill_templates(&self) -> &SkillTemplates {
        &self.skills
    }

    pub fn monsters(&self) -> &MonsterTemplates {
        &self.monsters
    }

    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages.stages
    }

    pub fn stage(&self, index: usize) -> Option<&StageDefinition> {
        self.stages.stages.get(index)
    }

    pub fn stage_templates(&self) -> &StageTemplates {
        &self.stages
    }

    /// Character templates as plain data, for export
    pub fn character_templates(&self) -> CharacterTemplates {
        CharacterTemplates {
            characters: self.characters.iter().map(|c| c.as_ref().clone()).collect(),
        }
    }
}

impl CharacterSource for Catalog {
    fn load_character_definition(&self, id: &str) -> GameResult<Arc<CharacterDefinition>> {
        self.character(id)
            .cloned()
            .ok_or_else(|| GameError::CharacterNotFound(id.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            default_character_templates(),
            default_skill_templates(),
            default_monster_templates(),
            default_stage_templates(),
        )
    }
}
