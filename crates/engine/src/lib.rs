//! Calculator core: the arithmetic evaluator, the state reducer, and the
//! input/feedback/history tables the front-ends share.

pub mod domain;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod history;
pub mod keys;
pub mod reducer;
pub mod session;

pub use domain::{Action, CalculatorState, HistoryEntry, Operator, PendingOperation, Phase};
pub use error::ErrorKind;
pub use evaluator::evaluate;
pub use feedback::FeedbackCategory;
pub use history::HistoryLog;
pub use reducer::reduce;
pub use session::{CalculatorSession, DispatchOutcome};
