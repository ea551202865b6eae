//! Gacha draws
//!
//! Rarity is rolled first, then a character within that rarity.

pub mod rates;
pub mod engine;

pub use engine::{pick_in_rarity, GachaEngine, Pull, TenDraw, TEN_DRAW_SIZE};
pub use rates::RarityTable;
