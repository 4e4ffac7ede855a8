use serde::{Deserialize, Serialize};

use crate::domain::{Action, CalculatorState};

/// Categories of audio/visual cue a front-end may play after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackCategory {
    KeyClick,
    OperationClick,
    Equals,
    Clear,
    Error,
    PanelOpen,
    PanelClose,
    Startup,
}

impl FeedbackCategory {
    /// Category for an action before looking at its outcome.
    pub fn for_action(action: Action) -> Self {
        match action {
            Action::InputDigit(_) | Action::InputDecimal | Action::Backspace => Self::KeyClick,
            Action::InputOperation(_) | Action::Negate | Action::Percent => Self::OperationClick,
            Action::Calculate => Self::Equals,
            Action::Clear => Self::Clear,
            Action::SetError(_) => Self::Error,
        }
    }

    /// Category for a completed transition; entering the error state wins.
    pub fn for_transition(
        action: Action,
        before: &CalculatorState,
        after: &CalculatorState,
    ) -> Self {
        if before.error.is_none() && after.error.is_some() {
            Self::Error
        } else {
            Self::for_action(action)
        }
    }
}
