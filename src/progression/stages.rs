//! Stage unlock ladder
//!
//! Stage 0 is always open; every later stage opens once its predecessor has
//! been cleared at least once.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Per-stage progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    /// Derived from the predecessor, never trusted from disk
    #[serde(skip)]
    pub unlocked: bool,
    pub cleared: bool,
    pub clear_count: u32,
}

/// Result of recording a clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageClear {
    pub index: usize,
    pub clear_count: u32,
    pub first_clear: bool,
    /// Stage opened by this clear, if any
    pub unlocked_next: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTable {
    progress: Vec<StageProgress>,
    highest_cleared: Option<usize>,
}

impl StageTable {
    /// Fresh ladder for `stage_count` stages
    pub fn new(stage_count: usize) -> Self {
        let mut table = Self {
            progress: vec![StageProgress::default(); stage_count],
            highest_cleared: None,
        };
        table.recompute_unlocks();
        table
    }

    /// Rebuild from saved progress, padding or truncating to `stage_count`
    pub fn restore(stage_count: usize, mut saved: Vec<StageProgress>, highest_cleared: Option<usize>) -> Self {
        if saved.len() != stage_count {
            log::warn!(
                "Saved progress has {} stages, catalog has {}; adjusting",
                saved.len(),
                stage_count
            );
            saved.resize(stage_count, StageProgress::default());
        }

        // Trust the flags over the stored marker, which may predate a catalog change
        let derived = saved.iter().rposition(|p| p.cleared);
        let highest_cleared = match (highest_cleared.filter(|&i| i < stage_count), derived) {
            (Some(stored), Some(derived)) => Some(stored.max(derived)),
            (stored, derived) => stored.or(derived),
        };

        let mut table = Self {
            progress: saved,
            highest_cleared,
        };
        table.recompute_unlocks();
        table
    }

    /// Derive every unlock flag from the cleared flags
    pub fn recompute_unlocks(&mut self) {
        for i in 0..self.progress.len() {
            self.progress[i].unlocked = i == 0 || self.progress[i - 1].cleared;
        }
    }

    pub fn len(&self) -> usize {
        self.progress.len()
    }

    pub fn is_empty(&self) -> bool {
        self.progress.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StageProgress> {
        self.progress.get(index)
    }

    pub fn progress(&self) -> &[StageProgress] {
        &self.progress
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.progress.get(index).is_some_and(|p| p.unlocked)
    }

    pub fn is_cleared(&self, index: usize) -> bool {
        self.progress.get(index).is_some_and(|p| p.cleared)
    }

    pub fn highest_cleared(&self) -> Option<usize> {
        self.highest_cleared
    }

    /// Furthest unlocked stage
    pub fn current_stage(&self) -> usize {
        self.progress.iter().rposition(|p| p.unlocked).unwrap_or(0)
    }

    /// Check that a stage can be entered
    pub fn select_stage(&self, index: usize) -> GameResult<usize> {
        match self.progress.get(index) {
            None => Err(GameError::InvalidStageIndex(index)),
            Some(p) if !p.unlocked => Err(GameError::StageLocked(index)),
            Some(_) => Ok(index),
        }
    }

    /// Record a clear; out-of-range indices are ignored
    ///
    /// Every call counts as a separate clear. Callers pay the reward once per
    /// returned `StageClear`.
    pub fn clear_stage(&mut self, index: usize) -> Option<StageClear> {
        let Some(progress) = self.progress.get_mut(index) else {
            log::warn!("clear_stage: index {} out of range ({} stages)", index, self.progress.len());
            return None;
        };

        let first_clear = !progress.cleared;
        progress.cleared = true;
        progress.clear_count += 1;
        let clear_count = progress.clear_count;

        self.highest_cleared = Some(self.highest_cleared.map_or(index, |h| h.max(index)));

        let mut unlocked_next = None;
        if let Some(next) = self.progress.get_mut(index + 1) {
            if !next.unlocked {
                next.unlocked = true;
                unlocked_next = Some(index + 1);
            }
        }

        log::info!("Stage {} cleared ({} times)", index, clear_count);
        Some(StageClear {
            index,
            clear_count,
            first_clear,
            unlocked_next,
        })
    }
}
