use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Every accepted command produces an Event.
/// The host re-renders from these (or from a fresh snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        word_count: usize,
        flash_time: u64,
        at: DateTime<Utc>,
    },
    Tick {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Elapsed time hit the flash threshold; word marking opens.
    FlashReached {
        elapsed_secs: u64,
        selectable_from: usize,
        at: DateTime<Utc>,
    },
    FlashWordMarked {
        index: usize,
        /// `false` when a flash word was already on record.
        recorded: bool,
        at: DateTime<Utc>,
    },
    IncorrectToggled {
        index: usize,
        incorrect: bool,
        at: DateTime<Utc>,
    },
    SessionStopped {
        elapsed_secs: u64,
        selectable_from: usize,
        at: DateTime<Utc>,
    },
    /// Terminal phase reached. `value` is what the host persists.
    SessionFinished {
        finish_word_index: usize,
        elapsed_secs: u64,
        value: String,
        at: DateTime<Utc>,
    },
    SessionReset {
        from: Phase,
        at: DateTime<Utc>,
    },
}

