//! RON data loader
//!
//! Loads game data from external RON files, with fallback to hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::catalog::Catalog;
use super::characters::{default_character_templates, CharacterTemplates};
use super::config::GameConfig;
use super::monsters::{default_monster_templates, MonsterTemplates};
use super::skills::{default_skill_templates, SkillTemplates};
use super::stages::{default_stage_templates, StageTemplates};

/// Default location of the data files
pub const DEFAULT_DATA_DIR: &str = "assets/data";

/// Manages all external game data
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Tunable constants
    pub config: GameConfig,
    /// Characters, skills, monsters and stages
    pub catalog: Catalog,
}

impl DataManager {
    /// Create a new DataManager from `assets/data`, using defaults for missing files
    pub fn new() -> Self {
        Self::load_from_dir(DEFAULT_DATA_DIR)
    }

    /// Load data from a directory; each file falls back on its own
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let base_path = dir.as_ref();

        let config = load_or_default(base_path, "config.ron", GameConfig::default);
        let characters: CharacterTemplates =
            load_or_default(base_path, "characters.ron", default_character_templates);
        let skills: SkillTemplates = load_or_default(base_path, "skills.ron", default_skill_templates);
        let monsters: MonsterTemplates =
            load_or_default(base_path, "monsters.ron", default_monster_templates);
        let stages: StageTemplates = load_or_default(base_path, "stages.ron", default_stage_templates);

        Self {
            config,
            catalog: Catalog::new(characters, skills, monsters, stages),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            catalog: Catalog::default(),
        }
    }
}

/// Read one RON file, or build the default when it is missing or broken
fn load_or_default<T, F>(base_path: &Path, file_name: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let path = base_path.join(file_name);
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(data) => {
                    log::info!("Loaded {}", path.display());
                    return data;
                }
                Err(e) => log::warn!("Failed to parse {}: {}. Using defaults.", file_name, e),
            },
            Err(e) => log::warn!("Failed to read {}: {}. Using defaults.", file_name, e),
        }
    } else {
        log::debug!("{} not found, using built-in defaults", path.display());
    }
    default()
}

fn write_ron<T: Serialize>(base_path: &Path, file_name: &str, value: &T) -> Result<(), String> {
    let ron = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|e| format!("Failed to serialize {}: {}", file_name, e))?;
    fs::write(base_path.join(file_name), ron).map_err(|e| format!("Failed to write {}: {}", file_name, e))
}

/// Export all default data to RON files for easy editing
pub fn export_default_data<P: AsRef<Path>>(dir: P) -> Result<PathBuf, String> {
    let base_path = dir.as_ref();

    if !base_path.exists() {
        fs::create_dir_all(base_path)
            .map_err(|e| format!("Failed to create {}: {}", base_path.display(), e))?;
    }

    write_ron(base_path, "config.ron", &GameConfig::default())?;
    write_ron(base_path, "characters.ron", &default_character_templates())?;
    write_ron(base_path, "skills.ron", &default_skill_templates())?;
    write_ron(base_path, "monsters.ron", &default_monster_templates())?;
    write_ron(base_path, "stages.ron", &default_stage_templates())?;

    Ok(base_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("summontale-loader-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_export_then_load_default_data() {
        let dir = scratch_dir("export");
        let result = export_default_data(&dir);
        assert!(result.is_ok(), "Failed to export default data: {:?}", result.err());

        for file in ["config.ron", "characters.ron", "skills.ron", "monsters.ron", "stages.ron"] {
            assert!(dir.join(file).exists(), "{} not created", file);
        }

        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.config, GameConfig::default());
        assert_eq!(manager.catalog.characters().len(), default_character_templates().characters.len());
        assert_eq!(manager.catalog.stages().len(), 3);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = scratch_dir("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("monsters.ron"), "this is not ron").unwrap();

        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.catalog.monsters().templates.len(), 4);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let manager = DataManager::load_from_dir(scratch_dir("missing"));
        assert_eq!(manager.catalog.characters().len(), 10);
    }
}
