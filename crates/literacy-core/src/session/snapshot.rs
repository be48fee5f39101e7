use serde::{Deserialize, Serialize};

use super::Phase;

/// Everything the host needs to re-render the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub elapsed_secs: u64,
    /// Elapsed time formatted for the timer display.
    pub elapsed_display: String,
    pub flash_time: u64,
    pub word_count: usize,
    pub flash_word_index: Option<usize>,
    pub finish_word_index: Option<usize>,
    /// Ascending.
    pub incorrect_indices: Vec<usize>,
    /// Words from this index onward may be marked; `None` means locked.
    pub selectable_from: Option<usize>,
    /// Words from this index onward were not read.
    pub unread_from: Option<usize>,
}

impl SessionSnapshot {
    pub fn is_selectable(&self, index: usize) -> bool {
        index < self.word_count && self.selectable_from.is_some_and(|from| index >= from)
    }
}
