//! Word index bookkeeping for a single session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Owns the word count, the flash/finish checkpoints and the set of words
/// marked as misread.
///
/// All indices are 0-based and kept within `[0, word_count)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordIndexTracker {
    word_count: usize,
    flash_word_index: Option<usize>,
    finish_word_index: Option<usize>,
    incorrect: BTreeSet<usize>,
    /// Window start fixed when marking opened; later unmarks cannot lower it.
    #[serde(default)]
    window_floor: Option<usize>,
}

impl WordIndexTracker {
    pub fn new(word_count: usize) -> Result<Self, SessionError> {
        if word_count == 0 {
            return Err(SessionError::EmptyWordList);
        }
        Ok(Self {
            word_count,
            flash_word_index: None,
            finish_word_index: None,
            incorrect: BTreeSet::new(),
            window_floor: None,
        })
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn flash_word_index(&self) -> Option<usize> {
        self.flash_word_index
    }

    pub fn finish_word_index(&self) -> Option<usize> {
        self.finish_word_index
    }

    pub fn incorrect_indices(&self) -> &BTreeSet<usize> {
        &self.incorrect
    }

    pub fn is_incorrect(&self, index: usize) -> bool {
        self.incorrect.contains(&index)
    }

    /// Highest index currently marked incorrect.
    pub fn max_incorrect_index(&self) -> Option<usize> {
        self.incorrect.last().copied()
    }

    pub fn check_index(&self, index: usize) -> Result<usize, SessionError> {
        if index < self.word_count {
            Ok(index)
        } else {
            Err(SessionError::IndexOutOfRange {
                index,
                word_count: self.word_count,
            })
        }
    }

    /// Flip the incorrect mark on `index`. Returns the new membership.
    pub fn toggle_incorrect(&mut self, index: usize) -> Result<bool, SessionError> {
        self.check_index(index)?;
        if self.incorrect.remove(&index) {
            Ok(false)
        } else {
            self.incorrect.insert(index);
            Ok(true)
        }
    }

    /// Record the word being read when the flash fired. First write wins:
    /// returns `false` without changing anything if already recorded.
    pub fn record_flash(&mut self, index: usize) -> Result<bool, SessionError> {
        self.check_index(index)?;
        if self.flash_word_index.is_some() {
            return Ok(false);
        }
        self.flash_word_index = Some(index);
        Ok(true)
    }

    /// Record the last word read. First write wins, like [`record_flash`](Self::record_flash).
    pub fn record_finish(&mut self, index: usize) -> Result<bool, SessionError> {
        self.check_index(index)?;
        if self.finish_word_index.is_some() {
            return Ok(false);
        }
        self.finish_word_index = Some(index);
        Ok(true)
    }

    /// First word position that stays open for marking.
    ///
    /// Positions before the returned index are already adjudicated. The
    /// window never sits below the highest incorrect mark or the pinned
    /// floor, and falls back to 0 when neither exists.
    pub fn selectable_start(&self, candidate: usize) -> usize {
        candidate
            .max(self.max_incorrect_index().unwrap_or(0))
            .max(self.window_floor.unwrap_or(0))
    }

    pub fn window_floor(&self) -> Option<usize> {
        self.window_floor
    }

    /// Pin the current window start. The floor only ever rises.
    pub fn pin_window(&mut self, candidate: usize) -> usize {
        let floor = self.selectable_start(candidate);
        self.window_floor = Some(floor);
        floor
    }

    /// Forget every checkpoint and mark. The word count is kept.
    pub fn reset(&mut self) {
        self.flash_word_index = None;
        self.finish_word_index = None;
        self.incorrect.clear();
        self.window_floor = None;
    }

    /// Install previously recorded results, dropping anything out of range.
    pub(crate) fn restore(
        &mut self,
        flash: Option<usize>,
        finish: Option<usize>,
        incorrect: impl IntoIterator<Item = usize>,
    ) {
        self.reset();
        let word_count = self.word_count;
        self.flash_word_index = flash.filter(|&i| i < word_count);
        self.finish_word_index = finish.filter(|&i| i < word_count);
        for index in incorrect {
            if index < word_count {
                self.incorrect.insert(index);
            } else {
                tracing::warn!(index, word_count, "dropping restored incorrect index");
            }
        }
    }
}
