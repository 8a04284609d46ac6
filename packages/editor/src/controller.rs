//! The foreground controller: editor events in, rendered results out.

use playground_protocol::{Response, SessionId};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::SessionManager;
use crate::sink::RequestSink;
use crate::view::{read_configuration, EditorView, SettingsPanel};

/// Something the user did in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The input editor now holds this document.
    DocumentChanged(String),
    /// Any settings control changed.
    SettingsChanged,
}

/// What [`EditorController::on_response`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A progress line or the version was shown.
    Lifecycle,
    /// The worker became ready and the current document was dispatched.
    Ready(SessionId),
    /// The worker will never become ready.
    Failed(String),
    /// A result for the latest session replaced the output.
    Rendered(Response),
    /// A result for a superseded session was dropped.
    Stale,
}

pub struct EditorController<S, V, P> {
    sessions: SessionManager<S>,
    view: V,
    panel: P,
}

impl<S, V, P> EditorController<S, V, P>
where
    S: RequestSink,
    V: EditorView,
    P: SettingsPanel,
{
    pub fn new(sessions: SessionManager<S>, view: V, panel: P) -> Self {
        Self {
            sessions,
            view,
            panel,
        }
    }

    pub fn sessions(&self) -> &SessionManager<S> {
        &self.sessions
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn on_event(&mut self, event: EditorEvent) -> Result<()> {
        match event {
            EditorEvent::DocumentChanged(content) => self.sessions.on_edit(content),
            EditorEvent::SettingsChanged => {
                let configuration = read_configuration(&self.panel);
                self.sessions.on_config_change(configuration)?;
            }
        }
        Ok(())
    }

    pub fn on_response(&mut self, response: Response) -> Result<Outcome> {
        if !self.sessions.accept(&response) {
            debug!(
                session = ?response.session(),
                current = ?self.sessions.current(),
                "dropping stale result"
            );
            return Ok(Outcome::Stale);
        }

        match &response {
            Response::Status { message } => {
                self.view.push_status(message);
                if let Some(reason) = response.failure() {
                    warn!(reason, "worker failed to start");
                    self.view.worker_failed(reason);
                    return Ok(Outcome::Failed(reason.to_owned()));
                }
                if response.is_ready() {
                    info!("worker ready");
                    self.view.show_settings();
                    self.sessions
                        .set_configuration(read_configuration(&self.panel));
                    return self.sessions.dispatch().map(Outcome::Ready);
                }
                debug!(status = %message, "worker progress");
                Ok(Outcome::Lifecycle)
            }
            Response::Version { message } => {
                self.view.set_version(message);
                Ok(Outcome::Lifecycle)
            }
            Response::Html { .. } | Response::Error { .. } => {
                self.view.set_output(response.message());
                Ok(Outcome::Rendered(response))
            }
        }
    }

    /// Drive the controller until the worker's response channel closes.
    ///
    /// Editor events, worker responses and the debounce deadline are served
    /// as they come. The event channel closing is not fatal: results still
    /// in flight are rendered.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<EditorEvent>,
        mut responses: mpsc::UnboundedReceiver<Response>,
    ) -> Result<()> {
        let mut events_open = true;
        loop {
            let deadline = self.sessions.deadline();
            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => self.on_event(event)?,
                    None => events_open = false,
                },
                response = responses.recv() => match response {
                    Some(response) => {
                        self.on_response(response)?;
                    }
                    None => {
                        debug!("worker closed its response channel");
                        return Ok(());
                    }
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.sessions.fire_debounce()?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use collection_literals::btree;
    use playground_protocol::{Configuration, OptionName, OptionValue, Request};

    use super::*;
    use crate::memory::{MemoryPanel, MemoryView};
    use crate::session::SessionConfig;

    type Controller = EditorController<mpsc::UnboundedSender<Request>, MemoryView, MemoryPanel>;

    fn controller(panel: MemoryPanel) -> (Controller, MemoryView, mpsc::UnboundedReceiver<Request>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let view = MemoryView::new();
        let sessions = SessionManager::new(tx, SessionConfig::default(), "<div></div>");
        (EditorController::new(sessions, view.clone(), panel), view, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Request>) -> Vec<Request> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test]
    async fn out_of_order_results_render_only_the_latest() {
        let (mut controller, view, mut rx) = controller(MemoryPanel::new());
        for _ in 0..3 {
            controller.on_event(EditorEvent::SettingsChanged).unwrap();
        }
        assert_eq!(drain(&mut rx).len(), 3);

        let outcomes: Vec<_> = [(3, "three"), (1, "one"), (2, "two")]
            .into_iter()
            .map(|(id, text)| {
                controller
                    .on_response(Response::html(SessionId::new(id), text))
                    .unwrap()
            })
            .collect();

        assert_eq!(
            outcomes,
            [
                Outcome::Rendered(Response::html(SessionId::new(3), "three")),
                Outcome::Stale,
                Outcome::Stale,
            ]
        );
        assert_eq!(view.snapshot().renders, ["three"]);
    }

    #[tokio::test]
    async fn error_results_replace_the_output() {
        let (mut controller, view, _rx) = controller(MemoryPanel::new());
        controller.on_event(EditorEvent::SettingsChanged).unwrap();
        controller
            .on_response(Response::error(SessionId::new(1), "TemplateSyntaxError"))
            .unwrap();
        assert_eq!(view.snapshot().output, "TemplateSyntaxError");
    }

    #[tokio::test]
    async fn ready_reveals_settings_and_dispatches_current_document() {
        let panel = MemoryPanel::new()
            .with(OptionName::Indent, "2")
            .with(OptionName::FormatJs, true)
            .with(OptionName::Profile, "");
        let (mut controller, view, mut rx) = controller(panel);

        for line in ["Loading runtime", "Installing djLint"] {
            let outcome = controller.on_response(Response::status(line)).unwrap();
            assert_eq!(outcome, Outcome::Lifecycle);
        }
        controller
            .on_response(Response::version("Running with Python 3.12.1; djLint 1.36.4"))
            .unwrap();
        assert!(drain(&mut rx).is_empty());

        let outcome = controller
            .on_response(Response::status(Response::READY))
            .unwrap();
        assert_eq!(outcome, Outcome::Ready(SessionId::new(1)));

        let log = view.snapshot();
        assert_eq!(log.status, ["Loading runtime", "Installing djLint", "ready"]);
        assert_eq!(
            log.version.as_deref(),
            Some("Running with Python 3.12.1; djLint 1.36.4")
        );
        assert!(log.settings_visible);
        assert!(!log.status_visible);

        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].html, "<div></div>");
        let expected: Configuration = btree! {
            OptionName::Indent => OptionValue::from("2"),
            OptionName::FormatJs => OptionValue::Bool(true),
        }
        .into();
        assert_eq!(sent[0].config, expected);
    }

    #[tokio::test]
    async fn failure_status_is_surfaced() {
        let (mut controller, view, mut rx) = controller(MemoryPanel::new());
        let outcome = controller
            .on_response(Response::status("failed: Install failed: no route"))
            .unwrap();
        assert_eq!(outcome, Outcome::Failed("Install failed: no route".into()));
        assert_eq!(
            view.snapshot().failure.as_deref(),
            Some("Install failed: no route")
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn settings_change_reads_the_panel_each_time() {
        let panel = MemoryPanel::new();
        let (mut controller, _view, mut rx) = controller(panel.clone());

        controller.on_event(EditorEvent::SettingsChanged).unwrap();
        panel.set(OptionName::MaxLineLength, "80");
        controller.on_event(EditorEvent::SettingsChanged).unwrap();

        let sent = drain(&mut rx);
        assert!(sent[0].config.is_empty());
        assert_eq!(
            sent[1].config.get(OptionName::MaxLineLength),
            Some(&OptionValue::from("80"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_debounces_edits() {
        let (controller, _view, mut rx) = controller(MemoryPanel::new());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (responses_tx, responses_rx) = mpsc::unbounded_channel::<Response>();
        let task = tokio::spawn(controller.run(events_rx, responses_rx));

        for text in ["<p>", "<p>a", "<p>a</p>"] {
            events_tx
                .send(EditorEvent::DocumentChanged(text.into()))
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        }
        assert!(drain(&mut rx).is_empty());

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].html, "<p>a</p>");

        drop(responses_tx);
        task.await.unwrap().unwrap();
    }
}
