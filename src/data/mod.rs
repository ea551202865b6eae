//! Data loading and the immutable game catalog
//!
//! This module handles loading game data from external RON files,
//! allowing for data-driven content and easy balancing.

pub mod loader;
pub mod catalog;
pub mod config;
pub mod characters;
pub mod skills;
pub mod monsters;
pub mod stages;

pub use loader::{DataManager, export_default_data, DEFAULT_DATA_DIR};
pub use catalog::{Catalog, CharacterSource};
pub use config::GameConfig;
pub use characters::{CharacterDefinition, CharacterTemplates, Rarity, UpgradeCurve};
pub use skills::{SkillDefinition, SkillId, SkillTemplates, SkillType, StatusEffectType};
pub use monsters::{MonsterDefinition, MonsterTemplates};
pub use stages::{Reward, StageDefinition, StageTemplates};
