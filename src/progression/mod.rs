//! Progression systems
//!
//! Experience curve, paid upgrades, stage scaling and the unlock ladder.

pub mod xp;
pub mod upgrade;
pub mod stages;
pub mod difficulty;

pub use difficulty::StageScaling;
pub use stages::{StageClear, StageProgress, StageTable};
pub use upgrade::{upgrade, upgrade_cost, UpgradeOutcome};
pub use xp::LevelProgress;
