//! Phase transition table.
//!
//! ```text
//! Idle -> Running -> Flashed -> Running -> Stopped -> Finished
//!            \__________________________/
//!                 stop before/after flash
//! ```
//!
//! `transition` is pure: it maps a phase and a trigger to the next phase and
//! the ordered side effects the machine must apply. Fallible effects come
//! first in every list so a rejected index leaves the session untouched.

use serde::{Deserialize, Serialize};

use crate::clock::TickToken;
use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    /// Flash threshold reached; waiting for the examiner to mark the word
    /// being read. The clock keeps running.
    Flashed,
    Stopped,
    Finished,
}

impl Phase {
    /// Incorrect marks may only change during an attempt.
    pub fn accepts_incorrect_marks(self) -> bool {
        matches!(self, Phase::Running | Phase::Flashed | Phase::Stopped)
    }
}

/// Host-originated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start,
    Tick { token: TickToken },
    Stop,
    MarkWord { index: usize },
    ToggleIncorrect { index: usize },
    Reset,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Tick { .. } => "tick",
            Command::Stop => "stop",
            Command::MarkWord { .. } => "mark_word",
            Command::ToggleIncorrect { .. } => "toggle_incorrect",
            Command::Reset => "reset",
        }
    }
}

/// Everything that can drive a transition. `FlashThresholdReached` is raised
/// by the machine itself after a tick, never by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Command(Command),
    FlashThresholdReached,
}

impl Trigger {
    fn name(&self) -> &'static str {
        match self {
            Trigger::Command(command) => command.name(),
            Trigger::FlashThresholdReached => "flash_threshold_reached",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    ArmClock,
    DisarmClock,
    AdvanceClock(TickToken),
    ResetClock,
    ClearWords,
    ToggleIncorrect(usize),
    RecordFlash(usize),
    RecordFinish(usize),
    /// Fix the selectable window where it stands on entry to a marking phase.
    PinWindow,
    EmitResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transition {
    pub to: Phase,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(to: Phase, effects: impl Into<Vec<Effect>>) -> Self {
        Self {
            to,
            effects: effects.into(),
        }
    }
}

pub(crate) fn transition(phase: Phase, trigger: Trigger) -> Result<Transition, SessionError> {
    use Command as C;
    use Phase as P;

    let next = match (phase, trigger) {
        (_, Trigger::Command(C::Reset)) => {
            Transition::to(P::Idle, [Effect::ResetClock, Effect::ClearWords])
        }
        (P::Idle, Trigger::Command(C::Start)) => {
            Transition::to(P::Running, [Effect::ClearWords, Effect::ArmClock])
        }
        (P::Running | P::Flashed, Trigger::Command(C::Tick { token })) => {
            Transition::to(phase, [Effect::AdvanceClock(token)])
        }
        (P::Running, Trigger::FlashThresholdReached) => {
            Transition::to(P::Flashed, [Effect::PinWindow])
        }
        (P::Running | P::Flashed, Trigger::Command(C::Stop)) => {
            Transition::to(P::Stopped, [Effect::DisarmClock, Effect::PinWindow])
        }
        (P::Running | P::Flashed | P::Stopped, Trigger::Command(C::ToggleIncorrect { index })) => {
            Transition::to(phase, [Effect::ToggleIncorrect(index)])
        }
        // Flash checkpoint: back to Running, the clock was never stopped.
        (P::Flashed, Trigger::Command(C::MarkWord { index })) => {
            Transition::to(P::Running, [Effect::RecordFlash(index)])
        }
        (P::Stopped, Trigger::Command(C::MarkWord { index })) => Transition::to(
            P::Finished,
            [Effect::RecordFinish(index), Effect::EmitResult],
        ),
        _ => {
            return Err(SessionError::InvalidTransition {
                phase,
                command: trigger.name(),
            })
        }
    };
    Ok(next)
}
