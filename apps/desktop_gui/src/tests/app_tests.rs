use crossbeam_channel::{bounded, Receiver, Sender};
use engine::keys::key_by_id;

use super::*;

struct Harness {
    app: CalculatorApp,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
}

fn harness(startup: StartupConfig) -> Harness {
    let (cmd_tx, cmd_rx) = bounded(16);
    let (ui_tx, ui_rx) = bounded(16);
    let app = CalculatorApp::new(
        cmd_tx,
        ui_rx,
        &startup,
        SoundEngine::with_tracing_sink(false),
        None,
    );
    Harness { app, cmd_rx, ui_tx }
}

fn press_all(app: &mut CalculatorApp, ids: &[&str]) {
    for id in ids {
        let key = key_by_id(id).expect("known key");
        app.press(key);
    }
}

fn drain(rx: &Receiver<BackendCommand>) -> Vec<BackendCommand> {
    rx.try_iter().collect()
}

#[test]
fn startup_requests_preferences() {
    let h = harness(StartupConfig::default());
    assert_eq!(drain(&h.cmd_rx), vec![BackendCommand::LoadPreferences]);
    assert!(h.app.sound.is_initialized());
}

#[test]
fn completed_calculation_is_persisted() {
    let mut h = harness(StartupConfig::default());
    drain(&h.cmd_rx);

    press_all(&mut h.app, &["num-7", "op-subtract", "num-2", "fn-equals"]);

    assert_eq!(h.app.session.state().display, "5");
    match drain(&h.cmd_rx).as_slice() {
        [BackendCommand::SaveHistory { history }] => {
            assert_eq!(history.len(), 1);
            assert_eq!(history.latest().map(|e| e.expression.as_str()), Some("7 - 2"));
        }
        other => panic!("unexpected commands: {other:?}"),
    }
}

#[test]
fn failed_calculation_is_not_persisted() {
    let mut h = harness(StartupConfig::default());
    drain(&h.cmd_rx);

    press_all(&mut h.app, &["num-5", "op-divide", "num-0", "fn-equals"]);

    assert!(h.app.session.state().is_error());
    assert!(drain(&h.cmd_rx).is_empty());
}

#[test]
fn loaded_preferences_merge_behind_fresh_entries() {
    let mut h = harness(StartupConfig::default());
    press_all(&mut h.app, &["num-1", "op-add", "num-1", "fn-equals"]);

    let stored = HistoryLog::from_entries(vec![HistoryEntry::new("3 × 3", "9", 1)]);
    h.ui_tx
        .send(UiEvent::PreferencesLoaded {
            history: stored,
            muted: true,
        })
        .expect("send");
    h.app.process_ui_events();

    let results: Vec<_> = h
        .app
        .session
        .history()
        .entries()
        .iter()
        .map(|e| e.result.as_str())
        .collect();
    assert_eq!(results, vec!["2", "9"]);
    assert!(h.app.sound.is_muted());
    assert!(h.app.preferences_ready);
}

#[test]
fn merged_history_is_saved_back() {
    let mut h = harness(StartupConfig::default());
    drain(&h.cmd_rx);
    press_all(&mut h.app, &["num-4", "op-multiply", "num-2", "fn-equals"]);
    assert_eq!(drain(&h.cmd_rx).len(), 1);

    let stored = HistoryLog::from_entries(vec![HistoryEntry::new("3 × 3", "9", 1)]);
    h.ui_tx
        .send(UiEvent::PreferencesLoaded {
            history: stored,
            muted: false,
        })
        .expect("send");
    h.app.process_ui_events();

    match drain(&h.cmd_rx).as_slice() {
        [BackendCommand::SaveHistory { history }] => {
            let results: Vec<_> = history
                .entries()
                .iter()
                .map(|e| e.result.as_str())
                .collect();
            assert_eq!(results, vec!["8", "9"]);
        }
        other => panic!("unexpected commands: {other:?}"),
    }
}

#[test]
fn stored_history_alone_is_not_saved_again() {
    let mut h = harness(StartupConfig::default());
    drain(&h.cmd_rx);
    let stored = HistoryLog::from_entries(vec![HistoryEntry::new("3 × 3", "9", 1)]);
    h.ui_tx
        .send(UiEvent::PreferencesLoaded {
            history: stored,
            muted: false,
        })
        .expect("send");
    h.app.process_ui_events();
    assert!(drain(&h.cmd_rx).is_empty());
}

#[test]
fn startup_mute_override_beats_stored_preference() {
    let mut h = harness(StartupConfig {
        muted: Some(false),
        ..StartupConfig::default()
    });
    h.ui_tx
        .send(UiEvent::PreferencesLoaded {
            history: HistoryLog::new(),
            muted: true,
        })
        .expect("send");
    h.app.process_ui_events();
    assert!(!h.app.sound.is_muted());
}

#[test]
fn toggling_mute_persists_choice() {
    let mut h = harness(StartupConfig::default());
    drain(&h.cmd_rx);

    h.app.toggle_muted();
    assert!(h.app.sound.is_muted());
    assert_eq!(drain(&h.cmd_rx), vec![BackendCommand::SaveMuted { muted: true }]);
}

#[test]
fn recall_and_clear_history() {
    let mut h = harness(StartupConfig::default());
    press_all(&mut h.app, &["num-6", "op-multiply", "num-7", "fn-equals", "fn-clear"]);
    drain(&h.cmd_rx);

    let entry = h.app.session.history().latest().cloned().expect("entry");
    h.app.recall(&entry);
    assert_eq!(h.app.session.state().display, "42");

    h.app.clear_history();
    assert!(h.app.session.history().is_empty());
    assert_eq!(drain(&h.cmd_rx), vec![BackendCommand::ClearHistory]);
}

#[test]
fn backend_startup_error_shows_banner() {
    let mut h = harness(StartupConfig::default());
    h.ui_tx
        .send(UiEvent::Error(UiError::from_message(
            UiErrorContext::BackendStartup,
            "failed to open sqlite database",
        )))
        .expect("send");
    h.app.process_ui_events();
    let banner = h.app.status_banner.clone().expect("banner");
    assert!(banner.contains("will not be saved"));
    assert!(h.app.preferences_ready);
}

#[test]
fn window_state_round_trips_through_json() {
    let state = PersistedWindowState { history_open: true };
    let text = serde_json::to_string(&state).expect("encode");
    assert_eq!(
        serde_json::from_str::<PersistedWindowState>(&text).expect("decode"),
        state
    );
    assert_eq!(
        serde_json::from_str::<PersistedWindowState>("{}").expect("decode"),
        PersistedWindowState::default()
    );
}
