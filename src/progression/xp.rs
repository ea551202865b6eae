//! Experience and leveling
//!
//! Threshold curve and power formula shared by experience gain and upgrades.

/// Experience needed to go from level 1 to level 2
pub const BASE_EXP_TO_LEVEL: u32 = 100;

/// Each level-up raises the next threshold by this much
pub const EXP_THRESHOLD_STEP: u32 = 50;

/// Attack added per character level
pub const ATTACK_PER_LEVEL: i32 = 5;

/// Power gained when reaching `level`
pub fn power_gain(level: u32) -> u32 {
    level * level
}

/// Threshold in effect while at `level` (threshold grows by a flat step per level-up)
pub fn exp_threshold_at(level: u32) -> u32 {
    BASE_EXP_TO_LEVEL + level.saturating_sub(1) * EXP_THRESHOLD_STEP
}

/// Result of applying experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelProgress {
    pub levels_gained: u32,
    pub new_level: u32,
}

impl LevelProgress {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_threshold_at() {
        assert_eq!(exp_threshold_at(1), 100);
        assert_eq!(exp_threshold_at(2), 150);
        assert_eq!(exp_threshold_at(4), 250);
    }

    #[test]
    fn test_power_gain() {
        assert_eq!(power_gain(1), 1);
        assert_eq!(power_gain(4), 16);
    }
}
