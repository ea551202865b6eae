//! Player-owned characters

pub mod owned;
pub mod store;

pub use owned::OwnedCharacter;
pub use store::{Acquisition, DexEntry, Roster, SortOrder};
