//! Gameplay error taxonomy
//!
//! Every variant is an expected, recoverable outcome. Callers surface them
//! as notifications; none of them should end a session.

use thiserror::Error;

use crate::data::Rarity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientCurrency { needed: u64, available: u64 },

    #[error("already at max level ({level})")]
    MaxLevelReached { level: u32 },

    #[error("stage {0} is locked")]
    StageLocked(usize),

    #[error("stage index {0} is out of range")]
    InvalidStageIndex(usize),

    #[error("no characters of rarity {0} in the catalog")]
    EmptyRarityPool(Rarity),

    #[error("character not found: {0}")]
    CharacterNotFound(String),

    #[error("character {0} has no skill data")]
    MissingSkillData(String),

    #[error("no monsters available for battle")]
    NoMonsters,

    #[error("a battle is already in progress")]
    BattleInProgress,

    #[error("no battle is active")]
    NoActiveBattle,
}

pub type GameResult<T> = Result<T, GameError>;
