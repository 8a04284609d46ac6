//! The editor and a scripted worker wired together end to end.

use std::time::Duration;

use playground_editor::element::WELCOME_DOCUMENT;
use playground_editor::{
    EditorController, EditorEvent, MemoryPanel, MemoryView, Outcome, SessionConfig,
    SessionManager,
};
use playground_protocol::{OptionName, Response, SessionId, WorkerMessage};
use playground_worker::testing::{ScriptedRuntime, Step};
use playground_worker::{Worker, WorkerConfig};
use tokio::sync::mpsc;

type Controller = EditorController<mpsc::UnboundedSender<WorkerMessage>, MemoryView, MemoryPanel>;

fn wire(
    runtime: ScriptedRuntime,
    document: &str,
    panel: MemoryPanel,
) -> (
    Controller,
    MemoryView,
    playground_worker::WorkerHandle,
    mpsc::UnboundedReceiver<Response>,
) {
    let (handle, responses) = Worker::spawn(runtime, WorkerConfig::default());
    let view = MemoryView::new();
    let sessions = SessionManager::new(handle.sender(), SessionConfig::default(), document);
    let controller = EditorController::new(sessions, view.clone(), panel);
    (controller, view, handle, responses)
}

/// Feed responses to the controller until one is rendered or the worker fails.
async fn pump(
    controller: &mut Controller,
    responses: &mut mpsc::UnboundedReceiver<Response>,
) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    while let Some(response) = responses.recv().await {
        let outcome = controller.on_response(response).unwrap();
        let done = matches!(outcome, Outcome::Rendered(_) | Outcome::Failed(_));
        outcomes.push(outcome);
        if done {
            break;
        }
    }
    outcomes
}

#[tokio::test]
async fn welcome_document_is_formatted_once_ready() {
    let panel = MemoryPanel::new().with(OptionName::Indent, "4");
    let (mut controller, view, handle, mut responses) =
        wire(ScriptedRuntime::new(), "<div><p>Welcome</p></div>", panel);

    let outcomes = pump(&mut controller, &mut responses).await;
    assert!(outcomes.contains(&Outcome::Ready(SessionId::new(1))));
    assert_eq!(
        outcomes.last(),
        Some(&Outcome::Rendered(Response::html(
            SessionId::new(1),
            "<div>\n    <p>Welcome</p>\n</div>"
        )))
    );

    let log = view.snapshot();
    assert_eq!(
        log.status,
        [
            "Loading runtime",
            "Loading package manager",
            "Importing package manager",
            "Installing djLint",
            "ready"
        ]
    );
    assert!(log.version.is_some());
    assert!(log.settings_visible);
    assert_eq!(log.renders.len(), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn default_welcome_document_is_already_formatted() {
    let (mut controller, view, handle, mut responses) =
        wire(ScriptedRuntime::new(), WELCOME_DOCUMENT, MemoryPanel::new());

    pump(&mut controller, &mut responses).await;
    assert_eq!(view.snapshot().output, WELCOME_DOCUMENT);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn slow_superseded_result_never_reaches_the_output() {
    let (mut controller, view, handle, mut responses) =
        wire(ScriptedRuntime::new(), "<p>start</p>", MemoryPanel::new());
    pump(&mut controller, &mut responses).await;

    controller
        .on_event(EditorEvent::DocumentChanged(
            "<!-- delay:500 --><p>slow</p>".into(),
        ))
        .unwrap();
    controller.on_event(EditorEvent::SettingsChanged).unwrap();
    controller
        .on_event(EditorEvent::DocumentChanged("<p>fast</p>".into()))
        .unwrap();
    controller.on_event(EditorEvent::SettingsChanged).unwrap();

    let outcomes = pump(&mut controller, &mut responses).await;
    assert_eq!(
        outcomes,
        [
            Outcome::Stale,
            Outcome::Rendered(Response::html(SessionId::new(3), "<p>fast</p>")),
        ]
    );
    assert_eq!(view.snapshot().renders, ["<p>start</p>", "<p>fast</p>"]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn typing_burst_is_formatted_once() {
    let runtime = ScriptedRuntime::new();
    let probe = runtime.probe();
    let (controller, view, handle, responses) =
        wire(runtime, "<p>start</p>", MemoryPanel::new());
    let (events, events_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(controller.run(events_rx, responses));

    handle.ready().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    for text in ["<ul>", "<ul><li>a</li>", "<ul><li>a</li></ul>"] {
        events
            .send(EditorEvent::DocumentChanged(text.into()))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(probe.with(|log| log.invocations.len()), 2);
    assert_eq!(
        view.snapshot().renders,
        ["<p>start</p>", "<ul>\n    <li>a</li>\n</ul>"]
    );

    handle.shutdown().await;
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn settings_change_skips_the_debounce() {
    let runtime = ScriptedRuntime::new();
    let probe = runtime.probe();
    let panel = MemoryPanel::new();
    let (controller, view, handle, responses) =
        wire(runtime, "<div><p>x</p></div>", panel.clone());
    let (events, events_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(controller.run(events_rx, responses));

    handle.ready().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    events
        .send(EditorEvent::DocumentChanged("<div><p>y</p></div>".into()))
        .unwrap();
    panel.set(OptionName::Indent, "2");
    events.send(EditorEvent::SettingsChanged).unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(probe.with(|log| log.invocations.len()), 2);
    assert_eq!(view.snapshot().output, "<div>\n  <p>y</p>\n</div>");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(probe.with(|log| log.invocations.len()), 2);

    handle.shutdown().await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn bootstrap_failure_keeps_settings_hidden() {
    let (mut controller, view, handle, mut responses) = wire(
        ScriptedRuntime::new().failing_at(Step::Install),
        "<p>x</p>",
        MemoryPanel::new(),
    );

    let outcomes = pump(&mut controller, &mut responses).await;
    assert!(matches!(outcomes.last(), Some(Outcome::Failed(_))));

    let log = view.snapshot();
    assert!(log.failure.is_some());
    assert!(!log.settings_visible);
    assert!(log.status_visible);
    assert!(log.renders.is_empty());

    handle.shutdown().await;
}
