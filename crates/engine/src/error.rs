use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arithmetic failure classes. Exhaustive: the reducer latches into the
/// error state on any of these and only `Clear` leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[error("Invalid input")]
    InvalidInput,
    #[error("Cannot divide by zero")]
    DivisionByZero,
    #[error("Number too large")]
    Overflow,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 3] = [
        ErrorKind::InvalidInput,
        ErrorKind::DivisionByZero,
        ErrorKind::Overflow,
    ];

    /// Message shown under the `Error` marker on the display.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::DivisionByZero => "Cannot divide by zero",
            ErrorKind::Overflow => "Number too large",
        }
    }
}
