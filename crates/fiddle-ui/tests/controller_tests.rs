//! Integration tests for FiddleController
//!
//! The controller is driven with decoded worker messages, and end to end
//! against a `WorkerHost` over the JSON wire format.

use fiddle_engine::EngineError;
use fiddle_engine_mock::{Reply, ScriptedEngine};
use fiddle_protocol::{
    encode_request, encode_response, MessageKind, Request, Response, TerminationDetails, WorkPhase,
};
use fiddle_ui::constants::BANNER;
use fiddle_ui::{FiddleConfig, FiddleController, Flow, RecordingPort};
use fiddle_worker::{RecordingOutbox, WorkerHost};

type TestController = FiddleController<RecordingPort>;

fn controller_with(config: FiddleConfig) -> (TestController, RecordingPort) {
    let port = RecordingPort::new();
    let ui = FiddleController::new(port.clone(), config, "sqlite3 fiddle", "Run");
    (ui, port)
}

fn controller() -> (TestController, RecordingPort) {
    controller_with(FiddleConfig::default())
}

fn banner_line() -> String {
    format!("{}\n", BANNER.join(" "))
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_stdout_and_stderr_are_echoed() {
    let (mut ui, _) = controller();
    assert!(ui.receive(&Response::Stdout("1".into())));
    assert!(ui.receive(&Response::Stderr("Error: no such table: x".into())));
    assert_eq!(ui.context().output.text(), "1\nError: no such table: x\n");
}

#[test]
fn test_auto_clear_applies_on_first_output() {
    let config = FiddleConfig {
        auto_clear_output: true,
        ..FiddleConfig::default()
    };
    let (mut ui, _) = controller_with(config);
    ui.receive(&Response::Stdout("old".into()));

    ui.set_input("select 2;");
    ui.submit();
    assert_eq!(ui.context().output.text(), "old\n");

    ui.receive(&Response::Working(WorkPhase::Start));
    ui.receive(&Response::Stdout("2".into()));
    ui.receive(&Response::Stdout("3".into()));
    assert_eq!(ui.context().output.text(), "2\n3\n");
}

#[test]
fn test_output_kept_without_auto_clear() {
    let (mut ui, _) = controller();
    ui.receive(&Response::Stdout("old".into()));
    ui.exec(Some("select 2;"));
    ui.receive(&Response::Stdout("2".into()));
    assert_eq!(ui.context().output.text(), "old\n2\n");
}

// =============================================================================
// Busy state
// =============================================================================

#[test]
fn test_busy_until_working_end() {
    let (mut ui, port) = controller();
    ui.set_input("select 1;");
    ui.submit();
    assert_eq!(port.drain(), vec![Request::ShellExec(Some("select 1;".into()))]);
    assert_eq!(ui.context().busy.title, "[working...] sqlite3 fiddle");
    assert!(!ui.context().busy.exec_enabled);

    ui.receive(&Response::Working(WorkPhase::Start));
    assert!(ui.context().busy.is_busy());

    ui.receive(&Response::Working(WorkPhase::End));
    assert_eq!(ui.context().busy.title, "sqlite3 fiddle");
    assert_eq!(ui.context().busy.exec_label, "Run");
    assert!(ui.context().busy.exec_enabled);
}

#[test]
fn test_command_buttons_send_text_verbatim() {
    let (mut ui, port) = controller();
    ui.exec(Some(" .tables "));
    assert_eq!(port.sent(), vec![Request::ShellExec(Some(" .tables ".into()))]);
}

// =============================================================================
// Module status
// =============================================================================

#[test]
fn test_status_sequence_drives_progress() {
    let (mut ui, _) = controller();
    ui.receive(&Response::status(1, Some("Downloading...")));
    let ctx = ui.context();
    assert!(!ctx.progress.hidden);
    assert_eq!((ctx.progress.value, ctx.progress.max), (1, 2));
    assert_eq!(ctx.status.text, "Downloading...");
    assert!(!ctx.status.hidden);

    ui.receive(&Response::status(2, Some("Running...")));
    ui.receive(&Response::status(3, None));
    let ctx = ui.context();
    assert!(ctx.progress.removed);
    assert!(ctx.status.hidden);

    // The status handler stays registered for later exception statuses
    ui.receive(&Response::status(4, Some("Exception thrown, see JavaScript console")));
    assert!(!ui.context().status.hidden);
}

#[test]
fn test_unknown_module_subtype_is_harmless() {
    let (mut ui, _) = controller();
    assert!(ui.receive_json(r#"{"type":"module","data":{"type":"progress","data":1}}"#));
    assert!(ui.context().progress.hidden);
}

// =============================================================================
// Ready and errors
// =============================================================================

#[test]
fn test_ready_runs_post_load_setup_once() {
    let (mut ui, port) = controller();
    ui.receive(&Response::Stdout("noise during load".into()));

    assert!(ui.receive(&Response::FiddleReady));
    assert!(ui.context().loaded);
    assert_eq!(port.drain(), vec![Request::ShellExec(None)]);
    assert_eq!(ui.context().output.text(), banner_line());
    assert!(ui.context().busy.is_busy());

    assert!(!ui.receive(&Response::FiddleReady));
    assert!(port.sent().is_empty());
}

#[test]
fn test_error_shows_fatal_status() {
    let (mut ui, _) = controller();
    ui.receive(&Response::status(1, None));
    ui.receive(&Response::Error(TerminationDetails {
        name: "ExitStatus".into(),
        message: "Program terminated with exit(1)".into(),
        status: Some(1),
    }));
    let status = &ui.context().status;
    assert!(!status.hidden);
    assert_eq!(status.text, "Fatal error: Program terminated with exit(1)");
}

#[test]
fn test_extra_handlers_run_after_defaults() {
    let (mut ui, _) = controller();
    ui.registry_mut().add([MessageKind::Stdout], |ctx, _| {
        ctx.input.push('!');
        Flow::Continue
    });
    ui.receive(&Response::Stdout("x".into()));
    assert_eq!(ui.context().output.text(), "x\n");
    assert_eq!(ui.context().input, "!");
}

#[test]
fn test_malformed_json_is_dropped() {
    let (mut ui, _) = controller();
    assert!(!ui.receive_json("{"));
    assert!(!ui.receive_json(r#"{"type":"telemetry","data":1}"#));
    assert_eq!(ui.context().output.text(), "");
}

// =============================================================================
// Inputs and examples
// =============================================================================

#[test]
fn test_example_replaces_input() {
    let (mut ui, _) = controller();
    ui.set_input("old text");
    assert!(ui.load_example("Box Mode"));
    assert_eq!(ui.context().input, "-- Box Mode\n.mode box");
}

#[test]
fn test_clear_buttons() {
    let (mut ui, _) = controller();
    ui.set_input("select 1;");
    ui.receive(&Response::Stdout("1".into()));
    ui.clear_input();
    ui.clear_output();
    assert_eq!(ui.context().input, "");
    assert_eq!(ui.context().output.text(), "");
}

// =============================================================================
// End to end
// =============================================================================

/// Move messages across the channel in both directions until it is quiet
fn pump(
    ui: &mut TestController,
    port: &RecordingPort,
    host: &WorkerHost<ScriptedEngine, RecordingOutbox>,
    outbox: &RecordingOutbox,
) {
    loop {
        let responses = outbox.drain();
        let requests = port.drain();
        if responses.is_empty() && requests.is_empty() {
            break;
        }
        for response in responses {
            ui.receive_json(&encode_response(&response).unwrap());
        }
        for request in requests {
            host.handle_json(&encode_request(&request).unwrap());
        }
    }
}

#[test]
fn test_session_end_to_end() {
    let engine = ScriptedEngine::new().with_reply("select 1+1;", Reply::lines(&["2"]));
    let outbox = RecordingOutbox::new();
    let host = WorkerHost::new(engine, outbox.clone());
    let (mut ui, port) = controller();

    host.start().unwrap();
    pump(&mut ui, &port, &host, &outbox);

    let ctx = ui.context();
    assert!(ctx.loaded);
    assert!(ctx.progress.removed);
    assert!(!ctx.busy.is_busy());
    let expected = format!(
        "{}{}\n",
        banner_line(),
        fiddle_engine_mock::DEFAULT_BANNER.join("\n")
    );
    assert_eq!(ctx.output.text(), expected);

    ui.clear_output();
    ui.set_input("select 1+1;");
    assert!(ui.submit());
    pump(&mut ui, &port, &host, &outbox);
    assert_eq!(ui.context().output.text(), "2\n");
    assert!(!ui.context().busy.is_busy());
}

#[test]
fn test_session_after_fatal_exit() {
    let engine = ScriptedEngine::new()
        .with_banner(&[])
        .with_reply(".exit", Reply::default().failing(EngineError::exit(0)));
    let outbox = RecordingOutbox::new();
    let host = WorkerHost::new(engine, outbox.clone());
    let (mut ui, port) = controller();
    host.start().unwrap();
    pump(&mut ui, &port, &host, &outbox);
    ui.clear_output();

    ui.exec(Some(".exit"));
    pump(&mut ui, &port, &host, &outbox);
    assert!(host.is_dead());
    assert!(ui
        .context()
        .output
        .text()
        .starts_with("FATAL ERROR: Program terminated with exit(0)\n"));
    assert_eq!(
        ui.context().status.text,
        "Exception thrown, see JavaScript console"
    );
    assert!(!ui.context().busy.is_busy());

    ui.clear_output();
    ui.exec(Some("select 1;"));
    pump(&mut ui, &port, &host, &outbox);
    assert_eq!(
        ui.context().output.text(),
        "shell module has exit()ed. Cannot run SQL.\n"
    );
}
