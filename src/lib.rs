//! Summontale - A gacha collection and stage battle game core
//!
//! Draw characters, level them up and send them through an unlockable
//! ladder of monster stages. Presentation layers drive a `Session`.

pub mod data;
pub mod error;
pub mod currency;
pub mod roster;
pub mod gacha;
pub mod combat;
pub mod progression;
pub mod save;
pub mod game;

// Re-export commonly used types
pub use data::{Catalog, DataManager, GameConfig, Rarity};
pub use error::{GameError, GameResult};
pub use game::Session;
pub use roster::{OwnedCharacter, Roster};
pub use save::SaveStore;
