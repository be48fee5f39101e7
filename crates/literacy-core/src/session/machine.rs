//! Session state machine.
//!
//! Owns the clock and the word tracker and mutates them only through the
//! transition table in [`transition`](super::transition). It has no thread;
//! ticks arrive as commands carrying the token issued when the clock was
//! armed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = SessionStateMachine::new(12, &config)?;
//! session.start();
//! // Once per second:
//! session.advance_clock(); // Returns Some(Event::FlashReached) at the threshold
//! ```

use chrono::Utc;

use super::snapshot::SessionSnapshot;
use super::tracker::WordIndexTracker;
use super::transition::{transition, Command, Effect, Phase, Trigger};
use crate::clock::{format_time, Clock, TickToken};
use crate::codec::{self, SessionResult};
use crate::config::LiteracyConfig;
use crate::error::SessionError;
use crate::events::Event;

#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: Phase,
    flash_time: u64,
    clock: Clock,
    words: WordIndexTracker,
}

impl SessionStateMachine {
    /// Create an idle session over `word_count` selectable words.
    pub fn new(word_count: usize, config: &LiteracyConfig) -> Result<Self, SessionError> {
        Ok(Self {
            phase: Phase::Idle,
            flash_time: config.flash_time.max(1),
            clock: Clock::new(),
            words: WordIndexTracker::new(word_count)?,
        })
    }

    /// Create a session straight into `Finished` from a decoded result.
    /// Indices outside the word list are dropped.
    pub fn restore(
        word_count: usize,
        config: &LiteracyConfig,
        result: &SessionResult,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(word_count, config)?;
        session.words.restore(
            result.flash_word_index,
            result.finish_word_index,
            result.incorrect_indices.iter().copied(),
        );
        session.clock = Clock::frozen_at(result.elapsed_secs);
        session.phase = Phase::Finished;
        Ok(session)
    }

    /// Idle when `seed` is missing or blank, otherwise restored from it.
    pub fn seeded(
        word_count: usize,
        config: &LiteracyConfig,
        seed: Option<&str>,
    ) -> Result<Self, SessionError> {
        match seed.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => {
                tracing::info!(value, "restoring finished literacy session");
                Self::restore(word_count, config, &codec::decode(value))
            }
            None => Self::new(word_count, config),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn flash_time(&self) -> u64 {
        self.flash_time
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn words(&self) -> &WordIndexTracker {
        &self.words
    }

    /// Token the current tick source must present, `None` while disarmed.
    pub fn tick_token(&self) -> Option<TickToken> {
        self.clock.token()
    }

    /// Start of the window of words the host should let the examiner mark.
    /// `None` while word marking is locked.
    pub fn selectable_from(&self) -> Option<usize> {
        match self.phase {
            Phase::Flashed => Some(self.words.selectable_start(0)),
            Phase::Stopped => Some(
                self.words
                    .selectable_start(self.words.flash_word_index().unwrap_or(0)),
            ),
            _ => None,
        }
    }

    /// First word after the finish word, if any.
    pub fn unread_from(&self) -> Option<usize> {
        self.words
            .finish_word_index()
            .map(|i| i + 1)
            .filter(|&i| i < self.words.word_count())
    }

    /// The recorded outcome, available once the session is finished.
    pub fn result(&self) -> Option<SessionResult> {
        (self.phase == Phase::Finished).then(|| SessionResult {
            flash_word_index: self.words.flash_word_index(),
            finish_word_index: self.words.finish_word_index(),
            elapsed_secs: self.clock.elapsed_secs(),
            incorrect_indices: self.words.incorrect_indices().clone(),
        })
    }

    /// Encoded model value, available once the session is finished.
    pub fn value(&self) -> Option<String> {
        self.result().map(|r| codec::encode(&r))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            elapsed_secs: self.clock.elapsed_secs(),
            elapsed_display: format_time(self.clock.elapsed_secs()),
            flash_time: self.flash_time,
            word_count: self.words.word_count(),
            flash_word_index: self.words.flash_word_index(),
            finish_word_index: self.words.finish_word_index(),
            incorrect_indices: self.words.incorrect_indices().iter().copied().collect(),
            selectable_from: self.selectable_from(),
            unread_from: self.unread_from(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.handle(Command::Start)
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.handle(Command::Stop)
    }

    pub fn tick(&mut self, token: TickToken) -> Option<Event> {
        self.handle(Command::Tick { token })
    }

    /// Tick with the current token. For hosts that drive the clock
    /// synchronously.
    pub fn advance_clock(&mut self) -> Option<Event> {
        let token = self.clock.token()?;
        self.tick(token)
    }

    pub fn mark_word(&mut self, index: usize) -> Option<Event> {
        self.handle(Command::MarkWord { index })
    }

    pub fn toggle_incorrect(&mut self, index: usize) -> Option<Event> {
        self.handle(Command::ToggleIncorrect { index })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.handle(Command::Reset)
    }

    /// Apply a command, ignoring anything the current phase does not accept.
    pub fn handle(&mut self, command: Command) -> Option<Event> {
        match self.try_handle(command) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(phase = ?self.phase, command = command.name(), "ignored: {err}");
                None
            }
        }
    }

    /// Apply a command. On error the session is left unchanged.
    ///
    /// Returns `Ok(None)` for a stale tick.
    pub fn try_handle(&mut self, command: Command) -> Result<Option<Event>, SessionError> {
        let from = self.phase;
        let plan = transition(from, Trigger::Command(command))?;

        if let Command::MarkWord { index } = command {
            self.words.check_index(index)?;
            if let Some(selectable_from) = self.selectable_from() {
                if index < selectable_from {
                    return Err(SessionError::WordLocked {
                        index,
                        selectable_from,
                    });
                }
            }
        }

        let mut flash_recorded = false;
        let mut toggled = false;
        let mut emit_result = false;
        for effect in plan.effects {
            match effect {
                Effect::ArmClock => {
                    self.clock.start();
                }
                Effect::DisarmClock => {
                    self.clock.stop();
                }
                Effect::AdvanceClock(token) => {
                    if self.clock.tick(token).is_none() {
                        tracing::debug!(generation = token.generation(), "stale tick dropped");
                        return Ok(None);
                    }
                }
                Effect::ResetClock => self.clock.reset(),
                Effect::ClearWords => self.words.reset(),
                Effect::ToggleIncorrect(index) => toggled = self.words.toggle_incorrect(index)?,
                Effect::RecordFlash(index) => flash_recorded = self.words.record_flash(index)?,
                Effect::RecordFinish(index) => {
                    self.words.record_finish(index)?;
                }
                Effect::PinWindow => self.pin_window(),
                Effect::EmitResult => emit_result = true,
            }
        }
        self.phase = plan.to;
        if from != self.phase {
            tracing::info!(from = ?from, to = ?self.phase, "literacy session transition");
        }

        let at = Utc::now();
        let event = match command {
            Command::Start => Event::SessionStarted {
                word_count: self.words.word_count(),
                flash_time: self.flash_time,
                at,
            },
            Command::Tick { .. } => return Ok(Some(self.after_tick())),
            Command::Stop => Event::SessionStopped {
                elapsed_secs: self.clock.elapsed_secs(),
                selectable_from: self.selectable_from().unwrap_or(0),
                at,
            },
            Command::ToggleIncorrect { index } => Event::IncorrectToggled {
                index,
                incorrect: toggled,
                at,
            },
            Command::MarkWord { index } if !emit_result => Event::FlashWordMarked {
                index,
                recorded: flash_recorded,
                at,
            },
            Command::MarkWord { index } => {
                let value = self.value().unwrap_or_default();
                tracing::info!(value = %value, "literacy session finished");
                Event::SessionFinished {
                    finish_word_index: index,
                    elapsed_secs: self.clock.elapsed_secs(),
                    value,
                    at,
                }
            }
            Command::Reset => Event::SessionReset { from, at },
        };
        Ok(Some(event))
    }

    /// Raise the flash checkpoint when a tick lands exactly on the threshold.
    fn after_tick(&mut self) -> Event {
        let elapsed_secs = self.clock.elapsed_secs();
        if self.phase == Phase::Running && elapsed_secs == self.flash_time {
            if let Ok(plan) = transition(self.phase, Trigger::FlashThresholdReached) {
                if plan.effects.contains(&Effect::PinWindow) {
                    self.pin_window();
                }
                self.phase = plan.to;
                tracing::info!(elapsed_secs, "flash threshold reached");
                return Event::FlashReached {
                    elapsed_secs,
                    selectable_from: self.selectable_from().unwrap_or(0),
                    at: Utc::now(),
                };
            }
        }
        Event::Tick {
            elapsed_secs,
            at: Utc::now(),
        }
    }

    fn pin_window(&mut self) {
        let floor = self
            .words
            .pin_window(self.words.flash_word_index().unwrap_or(0));
        tracing::debug!(floor, "selectable window pinned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(word_count: usize, flash_time: u64) -> SessionStateMachine {
        let config = LiteracyConfig {
            flash_time,
            ..LiteracyConfig::default()
        };
        SessionStateMachine::new(word_count, &config).unwrap()
    }

    fn ticks(session: &mut SessionStateMachine, n: u64) -> Vec<Event> {
        (0..n).filter_map(|_| session.advance_clock()).collect()
    }

    #[test]
    fn starts_idle() {
        let s = session(5, 60);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.elapsed_secs(), 0);
        assert!(s.tick_token().is_none());
        assert!(s.result().is_none());
    }

    #[test]
    fn flash_fires_once_at_threshold() {
        let mut s = session(12, 3);
        s.start();
        let events = ticks(&mut s, 3);
        assert!(matches!(events[..2], [Event::Tick { .. }, Event::Tick { .. }]));
        assert!(matches!(events[2], Event::FlashReached { elapsed_secs: 3, .. }));
        assert_eq!(s.phase(), Phase::Flashed);

        // Clock keeps running, no second flash.
        let events = ticks(&mut s, 5);
        assert!(events.iter().all(|e| matches!(e, Event::Tick { .. })));
        assert_eq!(s.phase(), Phase::Flashed);
        assert_eq!(s.elapsed_secs(), 8);
    }

    #[test]
    fn flash_mark_returns_to_running_without_rearming() {
        let mut s = session(12, 2);
        s.start();
        let token = s.tick_token().unwrap();
        ticks(&mut s, 2);

        let event = s.mark_word(4).unwrap();
        assert!(matches!(event, Event::FlashWordMarked { index: 4, recorded: true, .. }));
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.words().flash_word_index(), Some(4));
        assert_eq!(s.tick_token(), Some(token));
        assert_eq!(s.selectable_from(), None);
    }

    #[test]
    fn mark_word_ignored_before_flash() {
        let mut s = session(12, 60);
        assert!(s.mark_word(1).is_none());
        s.start();
        assert!(s.mark_word(1).is_none());
        assert_eq!(
            s.try_handle(Command::MarkWord { index: 1 }),
            Err(SessionError::InvalidTransition {
                phase: Phase::Running,
                command: "mark_word"
            })
        );
        assert_eq!(s.words().flash_word_index(), None);
    }

    #[test]
    fn toggle_only_during_attempt() {
        let mut s = session(5, 60);
        assert!(s.toggle_incorrect(1).is_none());
        s.start();
        assert!(matches!(
            s.toggle_incorrect(1),
            Some(Event::IncorrectToggled { index: 1, incorrect: true, .. })
        ));
        assert!(matches!(
            s.toggle_incorrect(1),
            Some(Event::IncorrectToggled { index: 1, incorrect: false, .. })
        ));
    }

    #[test]
    fn out_of_range_indices_leave_session_unchanged() {
        let mut s = session(5, 1);
        s.start();
        ticks(&mut s, 1);
        let before = s.snapshot();

        assert_eq!(
            s.try_handle(Command::ToggleIncorrect { index: 5 }),
            Err(SessionError::IndexOutOfRange {
                index: 5,
                word_count: 5
            })
        );
        assert!(s.mark_word(9).is_none());
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.phase(), Phase::Flashed);
    }

    #[test]
    fn stop_disarms_and_opens_window() {
        let mut s = session(12, 60);
        s.start();
        ticks(&mut s, 4);
        s.toggle_incorrect(3);
        let token = s.tick_token().unwrap();

        let event = s.stop().unwrap();
        assert!(matches!(
            event,
            Event::SessionStopped { elapsed_secs: 4, selectable_from: 3, .. }
        ));
        assert_eq!(s.phase(), Phase::Stopped);
        assert!(s.tick(token).is_none());
        assert_eq!(s.elapsed_secs(), 4);
    }

    #[test]
    fn stopped_window_uses_flash_word() {
        let mut s = session(12, 1);
        s.start();
        ticks(&mut s, 1);
        s.mark_word(5);
        s.toggle_incorrect(2);
        s.stop();
        assert_eq!(s.selectable_from(), Some(5));

        s.toggle_incorrect(8);
        assert_eq!(s.selectable_from(), Some(8));
    }

    #[test]
    fn flash_mark_below_incorrect_is_locked() {
        let mut s = session(12, 1);
        s.start();
        s.toggle_incorrect(6);
        ticks(&mut s, 1);
        assert_eq!(s.selectable_from(), Some(6));

        assert_eq!(
            s.try_handle(Command::MarkWord { index: 2 }),
            Err(SessionError::WordLocked {
                index: 2,
                selectable_from: 6
            })
        );
        assert_eq!(s.phase(), Phase::Flashed);
        assert_eq!(s.words().flash_word_index(), None);

        assert!(matches!(
            s.mark_word(6),
            Some(Event::FlashWordMarked { index: 6, recorded: true, .. })
        ));
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn flashed_window_survives_unmark() {
        let mut s = session(12, 1);
        s.start();
        s.toggle_incorrect(6);
        ticks(&mut s, 1);
        s.toggle_incorrect(6);
        assert_eq!(s.selectable_from(), Some(6));
        assert!(s.mark_word(3).is_none());
    }

    #[test]
    fn finish_word_before_window_is_locked() {
        let mut s = session(12, 60);
        s.start();
        s.toggle_incorrect(6);
        s.stop();
        assert_eq!(
            s.try_handle(Command::MarkWord { index: 4 }),
            Err(SessionError::WordLocked {
                index: 4,
                selectable_from: 6
            })
        );
        assert_eq!(s.phase(), Phase::Stopped);

        assert!(matches!(s.mark_word(6), Some(Event::SessionFinished { .. })));
    }

    #[test]
    fn stopped_window_survives_unmark() {
        let mut s = session(12, 60);
        s.start();
        s.toggle_incorrect(6);
        s.stop();
        assert_eq!(s.selectable_from(), Some(6));

        s.toggle_incorrect(6);
        assert!(s.words().incorrect_indices().is_empty());
        assert_eq!(s.selectable_from(), Some(6));
        assert_eq!(
            s.try_handle(Command::MarkWord { index: 2 }),
            Err(SessionError::WordLocked {
                index: 2,
                selectable_from: 6
            })
        );
        assert_eq!(s.phase(), Phase::Stopped);

        // Marks past the floor still raise it.
        s.toggle_incorrect(9);
        assert_eq!(s.selectable_from(), Some(9));
        s.toggle_incorrect(9);
        assert_eq!(s.selectable_from(), Some(6));
        assert!(matches!(
            s.mark_word(7),
            Some(Event::SessionFinished { finish_word_index: 7, .. })
        ));
    }

    #[test]
    fn finished_rejects_further_marks() {
        let mut s = session(12, 60);
        s.start();
        s.stop();
        s.mark_word(3);
        assert_eq!(s.phase(), Phase::Finished);
        assert!(s.mark_word(4).is_none());
        assert!(s.toggle_incorrect(1).is_none());
        assert_eq!(s.words().finish_word_index(), Some(3));
        assert_eq!(s.unread_from(), Some(4));
    }

    #[test]
    fn reset_clears_everything_but_word_count() {
        let mut s = session(12, 1);
        s.start();
        ticks(&mut s, 2);
        s.toggle_incorrect(1);
        s.stop();
        s.mark_word(5);

        let event = s.reset().unwrap();
        assert!(matches!(event, Event::SessionReset { from: Phase::Finished, .. }));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.words().word_count(), 12);
        assert!(s.words().incorrect_indices().is_empty());
        assert_eq!(s.words().flash_word_index(), None);
        assert_eq!(s.words().finish_word_index(), None);
        assert!(!s.clock().is_armed());
    }

    #[test]
    fn reset_while_running_drops_inflight_tick() {
        let mut s = session(12, 60);
        s.start();
        let token = s.tick_token().unwrap();
        s.reset();
        assert!(s.tick(token).is_none());

        s.start();
        assert!(s.tick(token).is_none());
        assert_eq!(s.elapsed_secs(), 0);
    }

    #[test]
    fn start_is_ignored_while_running() {
        let mut s = session(12, 60);
        s.start();
        let token = s.tick_token();
        assert!(s.start().is_none());
        assert_eq!(s.tick_token(), token);
    }

    #[test]
    fn seeded_with_blank_value_is_idle() {
        let config = LiteracyConfig::default();
        let s = SessionStateMachine::seeded(5, &config, Some("  ")).unwrap();
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn seeded_value_restores_finished() {
        let config = LiteracyConfig::default();
        let value = "5 7 10 null null null null null null null 7";
        let s = SessionStateMachine::seeded(12, &config, Some(value)).unwrap();
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.elapsed_secs(), 7);
        assert!(!s.clock().is_armed());
        assert_eq!(s.value().as_deref(), Some(value));
    }
}
