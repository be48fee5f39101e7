//! Tick-driven stopwatch.
//!
//! The clock has no thread of its own. Whoever owns the tick source (the
//! async [`Ticker`](super::Ticker), a test, or a synchronous host loop)
//! delivers ticks carrying the [`TickToken`] handed out when the clock was
//! armed. Every arm produces a fresh token, so ticks scheduled under an
//! earlier arm are rejected after a stop or reset.

use serde::{Deserialize, Serialize};

/// Identifies one arming of a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

impl TickToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    elapsed_secs: u64,
    /// Generation counter, bumped on every arm.
    generation: u64,
    armed: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock frozen at `elapsed_secs`, used when restoring a finished session.
    pub fn frozen_at(elapsed_secs: u64) -> Self {
        Self {
            elapsed_secs,
            ..Self::default()
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Token of the current arming, `None` while disarmed.
    pub fn token(&self) -> Option<TickToken> {
        self.armed.then_some(TickToken(self.generation))
    }

    /// Arm the clock. Returns `None` if it was already armed, so a second
    /// call never yields a second tick stream.
    pub fn start(&mut self) -> Option<TickToken> {
        if self.armed {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        self.token()
    }

    /// Disarm the clock. Returns `false` if it was not armed.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }

    /// Apply one tick. Returns the new elapsed time, or `None` when the tick
    /// is stale (clock disarmed or re-armed since the token was issued).
    pub fn tick(&mut self, token: TickToken) -> Option<u64> {
        if self.token() != Some(token) {
            return None;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        Some(self.elapsed_secs)
    }

    /// Disarm and zero the elapsed time. The generation survives so tokens
    /// from before the reset stay stale.
    pub fn reset(&mut self) {
        self.armed = false;
        self.elapsed_secs = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_idempotent() {
        let mut clock = Clock::new();
        let token = clock.start();
        assert!(token.is_some());
        assert!(clock.start().is_none());
        assert_eq!(clock.token(), token);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = Clock::new();
        assert!(!clock.stop());
        clock.start();
        assert!(clock.stop());
        assert!(!clock.stop());
    }

    #[test]
    fn ticks_advance_only_while_armed() {
        let mut clock = Clock::new();
        let token = clock.start().unwrap();
        assert_eq!(clock.tick(token), Some(1));
        assert_eq!(clock.tick(token), Some(2));

        clock.stop();
        assert_eq!(clock.tick(token), None);
        assert_eq!(clock.elapsed_secs(), 2);
    }

    #[test]
    fn stale_token_is_rejected_after_rearm() {
        let mut clock = Clock::new();
        let old = clock.start().unwrap();
        clock.stop();
        let new = clock.start().unwrap();
        assert_ne!(old, new);
        assert_eq!(clock.tick(old), None);
        assert_eq!(clock.tick(new), Some(1));
    }

    #[test]
    fn reset_zeroes_and_keeps_tokens_stale() {
        let mut clock = Clock::new();
        let token = clock.start().unwrap();
        clock.tick(token);
        clock.reset();
        assert_eq!(clock.elapsed_secs(), 0);
        assert!(!clock.is_armed());
        assert_eq!(clock.tick(token), None);
    }
}
