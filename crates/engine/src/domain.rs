use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ErrorKind;

/// Most digits the display accepts, ignoring sign and decimal point.
pub const MAX_DISPLAY_DIGITS: usize = 12;
pub const MAX_HISTORY_ENTRIES: usize = 20;
pub const ROUNDING_PLACES: u32 = 10;

pub const HISTORY_STORAGE_KEY: &str = "nebula-calc-history";
pub const MUTED_STORAGE_KEY: &str = "nebula-calc-muted";

/// Display text while the state is latched in an error.
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A binary operation waiting for its right operand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingOperation {
    #[default]
    None,
    Pending {
        left_operand: String,
        operator: Operator,
    },
}

impl PendingOperation {
    pub fn new(left_operand: impl Into<String>, operator: Operator) -> Self {
        Self::Pending {
            left_operand: left_operand.into(),
            operator,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Coarse state-machine position, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    OperatorPending,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorState {
    pub display: String,
    pub pending: PendingOperation,
    pub waiting_for_operand: bool,
    pub expression: String,
    pub error: Option<ErrorKind>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::initial()
    }
}

impl CalculatorState {
    pub fn initial() -> Self {
        Self {
            display: "0".to_string(),
            pending: PendingOperation::None,
            waiting_for_operand: false,
            expression: String::new(),
            error: None,
        }
    }

    /// Initial shape latched into `kind`, keeping `expression` for the user.
    pub fn errored(kind: ErrorKind, expression: impl Into<String>) -> Self {
        Self {
            display: ERROR_DISPLAY.to_string(),
            expression: expression.into(),
            error: Some(kind),
            ..Self::initial()
        }
    }

    /// State showing a past result, ready for a fresh operand.
    pub fn recalled(entry: &HistoryEntry) -> Self {
        Self {
            display: entry.result.clone(),
            waiting_for_operand: true,
            expression: entry.expression.clone(),
            ..Self::initial()
        }
    }

    pub fn previous_value(&self) -> Option<&str> {
        match &self.pending {
            PendingOperation::Pending { left_operand, .. } => Some(left_operand),
            PendingOperation::None => None,
        }
    }

    pub fn operation(&self) -> Option<Operator> {
        match &self.pending {
            PendingOperation::Pending { operator, .. } => Some(*operator),
            PendingOperation::None => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.error.is_some() {
            Phase::Error
        } else if self.pending.is_pending() {
            Phase::OperatorPending
        } else {
            Phase::Entering
        }
    }

    /// Message for the current error, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(ErrorKind::message)
    }
}

/// Closed set of inputs the reducer understands. Both the on-screen keypad and
/// the physical keyboard translate into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    InputDigit(char),
    InputDecimal,
    InputOperation(Operator),
    Calculate,
    Clear,
    Backspace,
    Negate,
    Percent,
    SetError(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub expression: String,
    pub result: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            expression: expression.into(),
            result: result.into(),
            timestamp,
        }
    }
}
