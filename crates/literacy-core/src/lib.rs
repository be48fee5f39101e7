//! # Literacy Core Library
//!
//! Session logic for a timed reading assessment embedded in a form. An
//! examiner starts a stopwatch, marks misread words while the respondent
//! reads, marks the word being read when the flash threshold fires, stops
//! the clock and marks the last word read. The result is stored in the form
//! as a flat space-separated value.
//!
//! ## Architecture
//!
//! - **Clock**: tick-driven stopwatch; ticks carry a token so stale ticks
//!   from an earlier arming are rejected
//! - **Session**: explicit phase/command transition table over a word index
//!   tracker
//! - **Codec**: bidirectional transform between a finished result and the
//!   stored value, plus the derived assessment report
//! - **Host**: the form-facing widget surface (evaluator in, value sink out)
//!
//! ## Key Components
//!
//! - [`SessionStateMachine`]: Core session state machine
//! - [`SessionDriver`]: Async driver wiring the machine to a tokio ticker
//! - [`LiteracyWidget`]: Form-bound session
//! - [`LiteracyConfig`]: Widget configuration

pub mod clock;
pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod host;
pub mod session;

pub use clock::{format_time, Clock, TickToken};
pub use codec::{AssessmentReport, SessionResult};
pub use config::LiteracyConfig;
pub use driver::SessionDriver;
pub use error::{ConfigError, CoreError, HostError, SessionError};
pub use events::Event;
pub use host::{LiteracyWidget, ValueEvaluator, ValueSink, WidgetProps};
pub use session::{Command, Phase, SessionSnapshot, SessionStateMachine, WordIndexTracker};
