//! Status effects on monsters
//!
//! Effects are flags with a remaining duration in monster turns. They do no
//! damage on their own and do not skip turns.

use crate::data::StatusEffectType;

/// One active effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveStatus {
    pub effect: StatusEffectType,
    pub turns_left: u32,
}

/// Effects currently applied to a combatant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusEffects {
    effects: Vec<ActiveStatus>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, refreshing to the longer duration if already present
    pub fn add_effect(&mut self, effect: StatusEffectType, turns: u32) {
        if effect == StatusEffectType::None || turns == 0 {
            return;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.effect == effect) {
            existing.turns_left = existing.turns_left.max(turns);
        } else {
            self.effects.push(ActiveStatus {
                effect,
                turns_left: turns,
            });
        }
    }

    /// Remove all effects of a specific type
    pub fn remove_effect(&mut self, effect: StatusEffectType) {
        self.effects.retain(|e| e.effect != effect);
    }

    /// Check if an effect is active
    pub fn has_effect(&self, effect: StatusEffectType) -> bool {
        self.effects.iter().any(|e| e.effect == effect)
    }

    pub fn active(&self) -> &[ActiveStatus] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Count one turn down; returns the effects that ran out
    pub fn tick(&mut self) -> Vec<StatusEffectType> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            effect.turns_left = effect.turns_left.saturating_sub(1);
            if effect.turns_left == 0 {
                expired.push(effect.effect);
            }
        }
        self.effects.retain(|e| e.turns_left > 0);
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_refreshes_duration() {
        let mut effects = StatusEffects::new();
        effects.add_effect(StatusEffectType::Poison, 2);
        effects.add_effect(StatusEffectType::Poison, 3);
        effects.add_effect(StatusEffectType::Poison, 1);
        assert_eq!(effects.active().len(), 1);
        assert_eq!(effects.active()[0].turns_left, 3);
    }

    #[test]
    fn test_none_is_ignored() {
        let mut effects = StatusEffects::new();
        effects.add_effect(StatusEffectType::None, 5);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_tick_expires() {
        let mut effects = StatusEffects::new();
        effects.add_effect(StatusEffectType::Stun, 1);
        effects.add_effect(StatusEffectType::Bleed, 2);

        assert_eq!(effects.tick(), vec![StatusEffectType::Stun]);
        assert!(effects.has_effect(StatusEffectType::Bleed));
        assert!(!effects.has_effect(StatusEffectType::Stun));

        assert_eq!(effects.tick(), vec![StatusEffectType::Bleed]);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_remove_effect() {
        let mut effects = StatusEffects::new();
        effects.add_effect(StatusEffectType::Burn, 2);
        effects.remove_effect(StatusEffectType::Burn);
        assert!(effects.is_empty());
    }
}
