//! Backend commands queued from UI to backend worker.

use engine::HistoryLog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadPreferences,
    SaveHistory { history: HistoryLog },
    ClearHistory,
    SaveMuted { muted: bool },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadPreferences => "load_preferences",
            BackendCommand::SaveHistory { .. } => "save_history",
            BackendCommand::ClearHistory => "clear_history",
            BackendCommand::SaveMuted { .. } => "save_muted",
        }
    }
}
