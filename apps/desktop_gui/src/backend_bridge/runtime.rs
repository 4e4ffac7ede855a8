//! Worker thread with its own tokio runtime, fed by the UI command queue.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use engine::HistoryLog;
use storage::Storage;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    database_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let storage = match Storage::new(&database_url).await {
                Ok(storage) => storage,
                Err(err) => {
                    tracing::error!("preference store unavailable: {err:#}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("{err:#}"),
                    )));
                    return;
                }
            };
            if let Err(err) = storage.health_check().await {
                tracing::warn!("preference store health check failed: {err:#}");
            }
            tracing::info!(database_url = %database_url, "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&storage, cmd, &ui_tx).await;
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    })
}

/// Apply one command. Failures are logged and reported as status events, never retried.
pub async fn handle_command(storage: &Storage, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    let name = cmd.name();
    let (context, result, done) = match cmd {
        BackendCommand::LoadPreferences => {
            let history = match storage.load_history().await {
                Ok(history) => history,
                Err(err) => {
                    tracing::warn!("history unavailable, starting empty: {err:#}");
                    HistoryLog::new()
                }
            };
            let muted = match storage.load_muted().await {
                Ok(muted) => muted,
                Err(err) => {
                    tracing::warn!("mute preference unavailable: {err:#}");
                    false
                }
            };
            // Startup waits on this event, so block rather than drop it.
            if ui_tx
                .send(UiEvent::PreferencesLoaded { history, muted })
                .is_err()
            {
                tracing::warn!("ui closed before preferences were delivered");
            }
            return;
        }
        BackendCommand::SaveHistory { history } => (
            UiErrorContext::SaveHistory,
            storage.save_history(&history).await,
            None,
        ),
        BackendCommand::ClearHistory => (
            UiErrorContext::ClearHistory,
            storage.clear_history().await,
            Some("History cleared"),
        ),
        BackendCommand::SaveMuted { muted } => (
            UiErrorContext::SaveMuted,
            storage.save_muted(muted).await,
            None,
        ),
    };

    match result {
        Ok(()) => {
            tracing::debug!(command = name, "backend command applied");
            if let Some(message) = done {
                let _ = ui_tx.try_send(UiEvent::Info(message.to_string()));
            }
        }
        Err(err) => {
            tracing::warn!(command = name, "backend command failed: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                context,
                format!("{err:#}"),
            )));
        }
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
