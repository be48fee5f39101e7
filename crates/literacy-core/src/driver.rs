//! Async driver pairing a session with a live [`Ticker`].
//!
//! The driver keeps exactly one ticker alive while the session clock is
//! armed and none otherwise. Ticks queued before a stop or reset still carry
//! the old token and fall through as stale.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::clock::{TickToken, Ticker};
use crate::config::LiteracyConfig;
use crate::events::Event;
use crate::session::{Command, SessionStateMachine};

#[derive(Debug)]
pub struct SessionDriver {
    session: SessionStateMachine,
    period: std::time::Duration,
    ticker: Option<Ticker>,
    tx: UnboundedSender<TickToken>,
    rx: UnboundedReceiver<TickToken>,
}

impl SessionDriver {
    /// Must be used from within a tokio runtime once the clock is armed.
    pub fn new(session: SessionStateMachine, config: &LiteracyConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut driver = Self {
            session,
            period: config.tick_interval(),
            ticker: None,
            tx,
            rx,
        };
        driver.sync_ticker();
        driver
    }

    pub fn session(&self) -> &SessionStateMachine {
        &self.session
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Apply a host command and reconcile the ticker with the clock.
    pub fn handle(&mut self, command: Command) -> Option<Event> {
        let event = self.session.handle(command);
        self.sync_ticker();
        event
    }

    /// Wait for the next accepted tick. Returns `None` immediately when the
    /// clock is not armed.
    pub async fn next_tick(&mut self) -> Option<Event> {
        loop {
            self.ticker.as_ref()?;
            let token = self.rx.recv().await?;
            if let Some(event) = self.session.tick(token) {
                self.sync_ticker();
                return Some(event);
            }
        }
    }

    fn sync_ticker(&mut self) {
        match (self.session.tick_token(), &self.ticker) {
            (Some(token), Some(ticker)) if ticker.token() == token => {}
            (Some(token), _) => {
                self.ticker = Some(Ticker::spawn(token, self.period, self.tx.clone()));
            }
            (None, _) => self.ticker = None,
        }
    }
}
