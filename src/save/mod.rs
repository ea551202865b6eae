//! Save/load system
//!
//! Handles the roster save, stage progress and lifetime statistics.

pub mod save_game;
pub mod profile;

pub use save_game::{
    LoadedState, OwnedRecord, SaveError, SaveRecord, SaveStore,
    StageProgressRecord, save_directory, PROGRESS_FILE, SAVE_FILE,
};

pub use profile::{GameStatistics, STATS_FILE};
