//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queue without blocking; a full or closed queue only updates the status line.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "backend queue full; dropping command");
            *status = "Preference queue is full; latest change was not saved".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!(command = cmd_name, "backend worker gone; dropping command");
            *status = "Preference storage is unavailable; changes are not saved".to_string();
        }
    }
}
