//! Game module - Session state, notifications and battle pacing

mod notify;
mod state;
mod time;

pub use notify::{MessageCategory, Notice, NoticeLog, MAX_NOTICES};
pub use state::Session;
pub use time::TurnPacer;
