//! UI/backend events and error modeling for desktop GUI controller.

use std::fmt;

use engine::HistoryLog;

#[derive(Debug)]
pub enum UiEvent {
    PreferencesLoaded { history: HistoryLog, muted: bool },
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Storage,
    Filesystem,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SaveHistory,
    ClearHistory,
    SaveMuted,
    Clipboard,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("permission denied")
            || message_lower.contains("read-only")
            || message_lower.contains("no such file")
            || message_lower.contains("parent directory")
        {
            UiErrorCategory::Filesystem
        } else if message_lower.contains("sqlite")
            || message_lower.contains("database")
            || message_lower.contains("preference")
            || message_lower.contains("migration")
        {
            UiErrorCategory::Storage
        } else if message_lower.contains("invalid")
            || message_lower.contains("malformed")
            || message_lower.contains("encode")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.category {
            UiErrorCategory::Storage => "Storage",
            UiErrorCategory::Filesystem => "Filesystem",
            UiErrorCategory::Validation => "Validation",
            UiErrorCategory::Unknown => "Unexpected",
        };
        let action = match self.context {
            UiErrorContext::BackendStartup => "history and sound settings will not be saved",
            UiErrorContext::SaveHistory => "history was not saved",
            UiErrorContext::ClearHistory => "stored history was not cleared",
            UiErrorContext::SaveMuted => "sound setting was not saved",
            UiErrorContext::Clipboard => "nothing was copied",
        };
        write!(f, "{label} error, {action}: {}", self.message)
    }
}
