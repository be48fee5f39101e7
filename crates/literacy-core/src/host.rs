//! Host form surface.
//!
//! The form engine supplies the widget's properties, an evaluator used once
//! to fetch a previously stored value, and a sink that receives the encoded
//! value. Validation expressions are carried opaquely; this crate never
//! evaluates them.

use serde::{Deserialize, Serialize};

use crate::config::LiteracyConfig;
use crate::error::HostError;
use crate::events::Event;
use crate::session::{Command, SessionSnapshot, SessionStateMachine};

/// Reads a value from the host's data model.
pub trait ValueEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        result_type: &str,
        context: Option<&str>,
        index: usize,
    ) -> Option<String>;
}

/// Receives the widget's model value. An empty string clears it.
pub trait ValueSink {
    fn persist(&mut self, value: &str);
}

impl<F: FnMut(&str)> ValueSink for F {
    fn persist(&mut self, value: &str) {
        self(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetProps {
    /// Model path of the bound node, e.g. `/data/group/reading`.
    pub name: String,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub relevant: String,
    #[serde(default)]
    pub constraint: String,
    #[serde(default)]
    pub required: String,
    /// Position of the enclosing repeat instance, 0 outside repeats.
    #[serde(default)]
    pub repeat_index: usize,
    /// Raw `data-flash` attribute.
    #[serde(default)]
    pub flash_attr: Option<String>,
}

impl WidgetProps {
    /// Evaluation context: the parent path for nodes nested deeper than
    /// `/data/group`, none otherwise.
    pub fn context(&self) -> Option<&str> {
        if self.name.split('/').count() > 3 {
            self.name.rfind('/').map(|pos| &self.name[..pos])
        } else {
            None
        }
    }

    /// Non-empty rule expressions, keyed by rule kind.
    pub fn validation_rules(&self) -> Vec<(&'static str, &str)> {
        [
            ("required", self.required.as_str()),
            ("constraint", self.constraint.as_str()),
            ("relevant", self.relevant.as_str()),
        ]
        .into_iter()
        .filter(|(_, expr)| !expr.is_empty())
        .collect()
    }
}

/// A session bound to one form control.
pub struct LiteracyWidget<S: ValueSink> {
    props: WidgetProps,
    session: SessionStateMachine,
    sink: S,
}

impl<S: ValueSink> LiteracyWidget<S> {
    /// Attach to a control with `word_count` words.
    ///
    /// # Errors
    ///
    /// Fails for readonly controls and empty word lists.
    pub fn attach(
        props: WidgetProps,
        word_count: usize,
        evaluator: &dyn ValueEvaluator,
        sink: S,
    ) -> Result<Self, HostError> {
        if props.readonly {
            return Err(HostError::ReadOnly { name: props.name });
        }
        let config = LiteracyConfig::from_flash_attr(props.flash_attr.as_deref());
        let existing = evaluator.evaluate(&props.name, "string", props.context(), props.repeat_index);
        let session = SessionStateMachine::seeded(word_count, &config, existing.as_deref())?;
        tracing::debug!(name = %props.name, word_count, phase = ?session.phase(), "literacy widget attached");
        Ok(Self {
            props,
            session,
            sink,
        })
    }

    pub fn props(&self) -> &WidgetProps {
        &self.props
    }

    pub fn session(&self) -> &SessionStateMachine {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Apply a UI command, forwarding value changes to the sink.
    pub fn handle(&mut self, command: Command) -> Option<Event> {
        let event = self.session.handle(command)?;
        match &event {
            Event::SessionFinished { value, .. } => self.sink.persist(value),
            Event::SessionReset { .. } => self.sink.persist(""),
            _ => {}
        }
        Some(event)
    }

    /// Tick the clock from a synchronous host loop.
    pub fn advance_clock(&mut self) -> Option<Event> {
        let token = self.session.tick_token()?;
        self.handle(Command::Tick { token })
    }
}
