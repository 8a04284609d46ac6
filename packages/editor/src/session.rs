//! Session numbering, debounce and result acceptance.

use std::time::Duration;

use playground_protocol::{
    Configuration, Request, Response, SessionClock, SessionId, SessionToken,
};
use tokio::time::Instant;

use crate::error::Result;
use crate::sink::RequestSink;

/// Tuning for the [`SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet period after the last edit before the document is sent.
    pub debounce: Duration,
}

impl SessionConfig {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Self::DEFAULT_DEBOUNCE,
        }
    }
}

/// Issues formatting requests and decides which results are still wanted.
///
/// The manager keeps the latest document and configuration. Edits only
/// arm the debounce deadline; the owner of the manager is expected to call
/// [`fire_debounce`](Self::fire_debounce) once [`deadline`](Self::deadline)
/// passes. Configuration changes dispatch immediately.
pub struct SessionManager<S> {
    sink: S,
    config: SessionConfig,
    clock: SessionClock,
    current: Option<SessionToken>,
    content: String,
    configuration: Configuration,
    deadline: Option<Instant>,
}

impl<S: RequestSink> SessionManager<S> {
    pub fn new(sink: S, config: SessionConfig, content: impl Into<String>) -> Self {
        Self {
            sink,
            config,
            clock: SessionClock::new(),
            current: None,
            content: content.into(),
            configuration: Configuration::new(),
            deadline: None,
        }
    }

    /// The latest document.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The latest configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Id of the most recently dispatched request.
    pub fn current(&self) -> Option<SessionId> {
        self.current.map(|token| token.id())
    }

    /// When the pending edit will be dispatched, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record an edit and restart the debounce timer.
    pub fn on_edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.deadline = Some(Instant::now() + self.config.debounce);
    }

    /// Record new settings and dispatch the current document right away.
    ///
    /// A pending debounce is dropped: the content it would have sent goes
    /// out with this request.
    pub fn on_config_change(&mut self, configuration: Configuration) -> Result<SessionId> {
        self.configuration = configuration;
        self.dispatch()
    }

    /// Replace the configuration without dispatching.
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }

    /// Dispatch the pending edit if its deadline has passed.
    pub fn fire_debounce(&mut self) -> Result<Option<SessionId>> {
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => self.dispatch().map(Some),
            _ => Ok(None),
        }
    }

    /// Send the current document and configuration under a fresh session.
    pub fn dispatch(&mut self) -> Result<SessionId> {
        self.deadline = None;
        let token = self.clock.issue();
        let id = token.id();
        self.current = Some(token);
        tracing::debug!(session = %id, bytes = self.content.len(), "dispatching request");
        self.sink.send(Request::new(
            token,
            self.content.clone(),
            self.configuration.clone(),
        ))?;
        Ok(id)
    }

    /// Whether a response should reach the view.
    ///
    /// Lifecycle messages always pass. Results pass only when they answer
    /// the latest request.
    pub fn accept(&self, response: &Response) -> bool {
        match response.session() {
            None => response.is_lifecycle(),
            Some(id) => self.current.is_some_and(|token| token.owns(id)),
        }
    }
}
