//! Owned-roster store
//!
//! Holds at most one entry per character id. Duplicate acquisitions bump the
//! count on the existing entry instead of adding a second one.

use std::cmp::Ordering;
use std::sync::Arc;

use super::owned::OwnedCharacter;
use crate::data::{Catalog, CharacterDefinition};
use crate::error::{GameError, GameResult};

/// What happened when a character was added to the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// First copy, inserted at level 1
    New,
    /// Already owned; count is the new total
    Duplicate { count: u32 },
}

/// Roster list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    RarityDescending,
    RarityAscending,
    LevelDescending,
    LevelAscending,
    NameAscending,
    NameDescending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::RarityDescending,
        SortOrder::RarityAscending,
        SortOrder::LevelDescending,
        SortOrder::LevelAscending,
        SortOrder::NameAscending,
        SortOrder::NameDescending,
    ];

    fn compare(&self, a: &OwnedCharacter, b: &OwnedCharacter) -> Ordering {
        match self {
            SortOrder::RarityDescending => b.definition().rarity.cmp(&a.definition().rarity),
            SortOrder::RarityAscending => a.definition().rarity.cmp(&b.definition().rarity),
            SortOrder::LevelDescending => b.level.cmp(&a.level),
            SortOrder::LevelAscending => a.level.cmp(&b.level),
            SortOrder::NameAscending => a.name().cmp(b.name()),
            SortOrder::NameDescending => b.name().cmp(a.name()),
        }
    }
}

/// One row of the character dex
#[derive(Debug, Clone)]
pub struct DexEntry {
    pub definition: Arc<CharacterDefinition>,
    pub owned: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    characters: Vec<OwnedCharacter>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded entries, merging any duplicates
    pub fn from_characters(characters: Vec<OwnedCharacter>) -> Self {
        let mut roster = Self { characters };
        roster.cleanup_duplicates();
        roster
    }

    /// Merge entries sharing an id; returns how many entries were folded away
    ///
    /// Counts are summed, the highest level copy stays as the representative
    /// and favourites are OR-combined.
    pub fn cleanup_duplicates(&mut self) -> usize {
        let before = self.characters.len();
        let mut merged: Vec<OwnedCharacter> = Vec::with_capacity(before);

        for character in self.characters.drain(..) {
            match merged.iter_mut().find(|c| c.id() == character.id()) {
                Some(existing) => existing.absorb(character),
                None => merged.push(character),
            }
        }

        self.characters = merged;
        let removed = before - self.characters.len();
        if removed > 0 {
            log::info!("Merged {} duplicate roster entries", removed);
        }
        removed
    }

    /// Number of distinct characters
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Copies owned, duplicates included
    pub fn total_count(&self) -> u32 {
        self.characters.iter().map(|c| c.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OwnedCharacter> {
        self.characters.iter()
    }

    pub fn characters(&self) -> &[OwnedCharacter] {
        &self.characters
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&OwnedCharacter> {
        self.characters.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut OwnedCharacter> {
        self.characters.iter_mut().find(|c| c.id() == id)
    }

    /// Look up a character or report it missing
    pub fn require_mut(&mut self, id: &str) -> GameResult<&mut OwnedCharacter> {
        self.get_mut(id).ok_or_else(|| GameError::CharacterNotFound(id.to_string()))
    }

    /// Add a copy of a character
    pub fn acquire(&mut self, definition: Arc<CharacterDefinition>) -> Acquisition {
        if let Some(existing) = self.get_mut(&definition.id) {
            existing.count += 1;
            log::debug!("Duplicate {}: count={}", definition.name, existing.count);
            return Acquisition::Duplicate { count: existing.count };
        }

        log::debug!("New character {}", definition.name);
        self.characters.push(OwnedCharacter::new(definition));
        Acquisition::New
    }

    /// Flip the favourite flag; returns the new value
    pub fn toggle_favorite(&mut self, id: &str) -> GameResult<bool> {
        let character = self.require_mut(id)?;
        character.favorite = !character.favorite;
        Ok(character.favorite)
    }

    /// Sorted view with favourites first
    pub fn sorted(&self, order: SortOrder, favorites_only: bool) -> Vec<&OwnedCharacter> {
        let mut view: Vec<&OwnedCharacter> = self
            .characters
            .iter()
            .filter(|c| !favorites_only || c.favorite)
            .collect();
        view.sort_by(|a, b| b.favorite.cmp(&a.favorite).then_with(|| order.compare(a, b)));
        view
    }

    /// Every catalog character with an owned flag, in catalog order
    pub fn dex(&self, catalog: &Catalog) -> Vec<DexEntry> {
        catalog
            .characters()
            .iter()
            .map(|definition| DexEntry {
                definition: definition.clone(),
                owned: self.contains(&definition.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(catalog: &Catalog, id: &str) -> Arc<CharacterDefinition> {
        catalog.character(id).unwrap().clone()
    }

    #[test]
    fn test_acquire_new_then_duplicate() {
        let catalog = Catalog::default();
        let mut roster = Roster::new();

        assert_eq!(roster.acquire(def(&catalog, "char_001")), Acquisition::New);
        assert_eq!(roster.acquire(def(&catalog, "char_001")), Acquisition::Duplicate { count: 2 });
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.total_count(), 2);
    }

    #[test]
    fn test_cleanup_duplicates() {
        let catalog = Catalog::default();
        let mut a = OwnedCharacter::new(def(&catalog, "char_003"));
        a.favorite = true;
        let b = OwnedCharacter::restored(def(&catalog, "char_003"), 5, 55);
        let c = OwnedCharacter::new(def(&catalog, "char_004"));

        let roster = Roster::from_characters(vec![a, b, c]);
        assert_eq!(roster.len(), 2);

        let bran = roster.get("char_003").unwrap();
        assert_eq!(bran.count, 2);
        assert_eq!(bran.level, 5);
        assert_eq!(bran.power, 55);
        assert!(bran.favorite);
    }

    #[test]
    fn test_sorted_puts_favorites_first() {
        let catalog = Catalog::default();
        let mut roster = Roster::new();
        for id in ["char_001", "char_005", "char_009"] {
            roster.acquire(def(&catalog, id));
        }
        roster.toggle_favorite("char_001").unwrap();

        let names: Vec<&str> = roster
            .sorted(SortOrder::RarityDescending, false)
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(names, vec!["Pip", "Ignis", "Kael"]);

        let favorites = roster.sorted(SortOrder::NameAscending, true);
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_toggle_favorite_unknown_id() {
        let mut roster = Roster::new();
        assert_eq!(
            roster.toggle_favorite("ghost"),
            Err(GameError::CharacterNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_dex_marks_owned() {
        let catalog = Catalog::default();
        let mut roster = Roster::new();
        roster.acquire(def(&catalog, "char_002"));

        let dex = roster.dex(&catalog);
        assert_eq!(dex.len(), catalog.characters().len());
        assert_eq!(dex.iter().filter(|e| e.owned).count(), 1);
        assert!(dex[1].owned);
    }
}
