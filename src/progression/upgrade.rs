//! Paid character upgrades

use crate::currency::CurrencyLedger;
use crate::error::{GameError, GameResult};
use crate::roster::OwnedCharacter;

/// Outcome of a successful upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeOutcome {
    pub cost: u64,
    pub new_level: u32,
    pub new_power: u32,
}

/// Gold needed to go from the character's current level to the next
pub fn upgrade_cost(character: &OwnedCharacter) -> u64 {
    let definition = character.definition();
    definition.upgrade.base_cost * character.level as u64 * definition.rarity.upgrade_cost_multiplier()
}

/// Raise a character by one level, paying from the ledger
///
/// Nothing changes on failure. The level cap is checked before the price.
pub fn upgrade(character: &mut OwnedCharacter, ledger: &mut CurrencyLedger) -> GameResult<UpgradeOutcome> {
    if character.is_max_level() {
        return Err(GameError::MaxLevelReached { level: character.level });
    }

    let cost = upgrade_cost(character);
    ledger.spend(cost)?;
    character.upgrade();

    log::info!(
        "Upgraded {} to level {} for {} gold (power {})",
        character.name(),
        character.level,
        cost,
        character.power
    );

    Ok(UpgradeOutcome {
        cost,
        new_level: character.level,
        new_power: character.power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Catalog;

    fn owned(id: &str) -> OwnedCharacter {
        OwnedCharacter::new(Catalog::default().character(id).unwrap().clone())
    }

    #[test]
    fn test_cost_formula() {
        let mut ignis = owned("char_009");
        assert_eq!(upgrade_cost(&ignis), 1_000);
        ignis.level = 4;
        assert_eq!(upgrade_cost(&ignis), 100 * 4 * 10);

        let kael = owned("char_005");
        assert_eq!(upgrade_cost(&kael), 300);
    }

    #[test]
    fn test_cost_is_monotonic_in_level() {
        let mut c = owned("char_007");
        let mut last = 0;
        for level in 1..=c.max_level() {
            c.level = level;
            let cost = upgrade_cost(&c);
            assert!(cost >= last);
            last = cost;
        }
    }

    #[test]
    fn test_upgrade_success() {
        let mut c = owned("char_005");
        let mut ledger = CurrencyLedger::new(1000);

        let outcome = upgrade(&mut c, &mut ledger).unwrap();
        assert_eq!(outcome, UpgradeOutcome { cost: 300, new_level: 2, new_power: 5 });
        assert_eq!(ledger.gold(), 700);
        assert_eq!(c.level, 2);
    }

    #[test]
    fn test_upgrade_insufficient_gold() {
        let mut c = owned("char_005");
        let mut ledger = CurrencyLedger::new(299);
        assert_eq!(
            upgrade(&mut c, &mut ledger),
            Err(GameError::InsufficientCurrency { needed: 300, available: 299 })
        );
        assert_eq!(ledger.gold(), 299);
        assert_eq!(c.level, 1);
    }

    #[test]
    fn test_upgrade_at_max_level_mutates_nothing() {
        let mut c = owned("char_001");
        c.level = c.max_level();
        let before = c.clone();
        let mut ledger = CurrencyLedger::new(1_000_000);

        assert_eq!(
            upgrade(&mut c, &mut ledger),
            Err(GameError::MaxLevelReached { level: 10 })
        );
        assert_eq!(c, before);
        assert_eq!(ledger.gold(), 1_000_000);
    }
}
