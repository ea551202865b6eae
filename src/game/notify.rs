//! Player-facing notifications
//!
//! Gameplay actions push one notice per outcome; presentation layers drain
//! them and decide how to show them.

use std::collections::VecDeque;

/// Oldest notices are dropped past this many
pub const MAX_NOTICES: usize = 100;

/// Categories for message filtering/coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Combat,
    Gacha,
    Progress,
    System,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub category: MessageCategory,
}

#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: VecDeque<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the log
    pub fn push(&mut self, text: impl Into<String>, category: MessageCategory) {
        self.notices.push_back(Notice {
            text: text.into(),
            category,
        });

        if self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Take every pending notice, oldest first
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}
