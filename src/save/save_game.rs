//! Save/load of the roster, gold and stage progress
//!
//! Saves are JSON files in one directory. Roster writes merge by character
//! id against what is already on disk: incoming entries replace entries with
//! the same id and every other entry is kept as it was.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::CharacterSource;
use crate::error::GameResult;
use crate::progression::xp::exp_threshold_at;
use crate::progression::{StageProgress, StageTable};
use crate::roster::{OwnedCharacter, Roster};

/// Save file version for compatibility checking
const SAVE_VERSION: u32 = 1;

pub const SAVE_FILE: &str = "save.json";
pub const PROGRESS_FILE: &str = "stage_progress.json";

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

fn default_count() -> u32 {
    1
}

/// One owned character as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedRecord {
    pub character_id: String,
    pub level: u32,
    pub power: u32,
    pub element: String,
    pub favorite: bool,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub exp: u32,
    /// Zero in older saves; rebuilt from the level
    #[serde(default)]
    pub exp_to_level_up: u32,
    #[serde(default)]
    pub skill_cooldowns: Vec<u32>,
}

impl OwnedRecord {
    pub fn from_owned(character: &OwnedCharacter) -> Self {
        Self {
            character_id: character.id().to_string(),
            level: character.level,
            power: character.power,
            element: character.element.clone(),
            favorite: character.favorite,
            count: character.count,
            exp: character.exp,
            exp_to_level_up: character.exp_to_level_up,
            skill_cooldowns: character.skill_cooldowns().to_vec(),
        }
    }

    /// Rebuild the live character, resolving its definition by id
    pub fn rehydrate(&self, source: &dyn CharacterSource) -> GameResult<OwnedCharacter> {
        let definition = source.load_character_definition(&self.character_id)?;
        let mut character = OwnedCharacter::restored(definition, self.level, self.power);
        character.count = self.count.max(1);
        character.element = self.element.clone();
        character.favorite = self.favorite;
        character.exp = self.exp;
        character.exp_to_level_up = if self.exp_to_level_up == 0 {
            exp_threshold_at(character.level)
        } else {
            self.exp_to_level_up
        };
        if !self.skill_cooldowns.is_empty() {
            character.set_skill_cooldowns(self.skill_cooldowns.clone());
        }
        Ok(character)
    }
}

/// Roster and gold file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub owned_list: Vec<OwnedRecord>,
    #[serde(default)]
    pub player_gold: u64,
}

impl SaveRecord {
    pub fn new(player_gold: u64) -> Self {
        Self {
            version: SAVE_VERSION,
            owned_list: Vec::new(),
            player_gold,
        }
    }

    /// Replace entries sharing an id with the incoming ones, keep the rest
    pub fn merge(&mut self, incoming: Vec<OwnedRecord>) {
        self.owned_list
            .retain(|existing| !incoming.iter().any(|r| r.character_id == existing.character_id));
        self.owned_list.extend(incoming);
    }
}

/// Stage ladder file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgressRecord {
    pub stages: Vec<StageProgress>,
    pub highest_cleared_stage: Option<usize>,
}

impl StageProgressRecord {
    pub fn from_table(table: &StageTable) -> Self {
        Self {
            stages: table.progress().to_vec(),
            highest_cleared_stage: table.highest_cleared(),
        }
    }
}

/// Roster and gold as recovered from disk
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub roster: Roster,
    pub gold: u64,
    /// Entries dropped because their id no longer resolves
    pub dropped: usize,
    /// Duplicate entries merged away
    pub merged: usize,
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "summontale", "Summontale") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Reads and writes the save files in one directory
///
/// Every write holds the store lock for its whole read-modify-write cycle,
/// so concurrent saves apply one after the other.
#[derive(Debug)]
pub struct SaveStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl SaveStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store in the platform data directory
    pub fn default_location() -> Self {
        Self::new(save_directory())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn has_save(&self) -> bool {
        self.path(SAVE_FILE).exists()
    }

    /// Read the raw save record; `None` when there is no save yet
    pub fn read_record(&self) -> Result<Option<SaveRecord>, SaveError> {
        read_json(&self.path(SAVE_FILE))
    }

    // Caller holds the lock
    fn existing_record_or(&self, gold: u64) -> SaveRecord {
        match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => SaveRecord::new(gold),
            Err(e) => {
                log::warn!("Existing save unreadable ({}), starting a fresh record", e);
                SaveRecord::new(gold)
            }
        }
    }

    /// Merge the given characters into the save and update the gold
    pub fn save_characters<'a, I>(&self, characters: I, gold: u64) -> Result<(), SaveError>
    where
        I: IntoIterator<Item = &'a OwnedCharacter>,
    {
        let incoming: Vec<OwnedRecord> = characters.into_iter().map(OwnedRecord::from_owned).collect();

        let _guard = self.lock.lock();
        let mut record = self.existing_record_or(gold);
        let count = incoming.len();
        record.merge(incoming);
        record.player_gold = gold;
        record.version = SAVE_VERSION;
        write_json(&self.path(SAVE_FILE), &record)?;

        log::info!("Saved {} characters and {} gold", count, gold);
        Ok(())
    }

    /// Merge the whole roster into the save
    pub fn save_roster(&self, roster: &Roster, gold: u64) -> Result<(), SaveError> {
        self.save_characters(roster.iter(), gold)
    }

    /// Rewrite just the gold balance, keeping every roster entry
    pub fn save_gold(&self, gold: u64) -> Result<(), SaveError> {
        let _guard = self.lock.lock();
        let mut record = self.existing_record_or(gold);
        record.player_gold = gold;
        record.version = SAVE_VERSION;
        write_json(&self.path(SAVE_FILE), &record)?;

        log::debug!("Saved gold: {}", gold);
        Ok(())
    }

    /// Load roster and gold
    ///
    /// A missing or corrupt save yields an empty roster and `starting_gold`.
    /// Unknown ids are dropped from the roster but stay on disk; duplicate
    /// entries are merged and the cleaned entries are merged back into the save.
    pub fn load(&self, source: &dyn CharacterSource, starting_gold: u64) -> LoadedState {
        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::info!("No save found, starting fresh");
                return LoadedState::fresh(starting_gold);
            }
            Err(e) => {
                log::warn!("Failed to load save: {}. Starting fresh", e);
                return LoadedState::fresh(starting_gold);
            }
        };

        let mut dropped = 0;
        let characters: Vec<OwnedCharacter> = record
            .owned_list
            .iter()
            .filter_map(|entry| match entry.rehydrate(source) {
                Ok(character) => Some(character),
                Err(e) => {
                    log::warn!("Dropping saved character: {}", e);
                    dropped += 1;
                    None
                }
            })
            .collect();

        let loaded = characters.len();
        let roster = Roster::from_characters(characters);
        let merged = loaded - roster.len();

        if merged > 0 {
            if let Err(e) = self.save_roster(&roster, record.player_gold) {
                log::warn!("Failed to write back cleaned roster: {}", e);
            }
        }

        log::info!("Loaded {} characters and {} gold", roster.len(), record.player_gold);
        LoadedState {
            roster,
            gold: record.player_gold,
            dropped,
            merged,
        }
    }

    pub fn save_progress(&self, table: &StageTable) -> Result<(), SaveError> {
        let _guard = self.lock.lock();
        write_json(&self.path(PROGRESS_FILE), &StageProgressRecord::from_table(table))?;
        log::debug!("Saved stage progress ({:?} highest cleared)", table.highest_cleared());
        Ok(())
    }

    /// Load the ladder, recomputing unlocks; falls back to a fresh ladder
    pub fn load_progress(&self, stage_count: usize) -> StageTable {
        match read_json::<StageProgressRecord>(&self.path(PROGRESS_FILE)) {
            Ok(Some(record)) => StageTable::restore(stage_count, record.stages, record.highest_cleared_stage),
            Ok(None) => StageTable::new(stage_count),
            Err(e) => {
                log::warn!("Failed to load stage progress: {}. Starting fresh", e);
                StageTable::new(stage_count)
            }
        }
    }
}

impl LoadedState {
    fn fresh(gold: u64) -> Self {
        Self {
            roster: Roster::new(),
            gold,
            dropped: 0,
            merged: 0,
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SaveError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data).map_err(|e| SaveError::Parse(e.to_string()))?;
    Ok(Some(value))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveError> {
    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| SaveError::Serialize(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}
