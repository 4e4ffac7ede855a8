//! Reducer plus history bookkeeping for one calculator session.

use chrono::Utc;

use crate::{
    domain::{Action, CalculatorState, HistoryEntry, PendingOperation},
    feedback::FeedbackCategory,
    history::HistoryLog,
    reducer::reduce,
};

/// What a dispatch produced besides the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub feedback: FeedbackCategory,
    /// Set when the transition completed a calculation; callers persist it.
    pub recorded: Option<HistoryEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct CalculatorSession {
    state: CalculatorState,
    history: HistoryLog,
}

impl CalculatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: HistoryLog) -> Self {
        Self {
            state: CalculatorState::initial(),
            history,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchOutcome {
        self.dispatch_at(action, Utc::now().timestamp_millis())
    }

    /// Dispatch with an explicit timestamp (unix millis) for any history entry.
    pub fn dispatch_at(&mut self, action: Action, timestamp: i64) -> DispatchOutcome {
        let next = reduce(&self.state, action);
        let feedback = FeedbackCategory::for_transition(action, &self.state, &next);
        let recorded = completed_calculation(&self.state, action, &next)
            .map(|(expression, result)| HistoryEntry::new(expression, result, timestamp));

        if let Some(entry) = &recorded {
            self.history.record(entry.clone());
        }
        self.state = next;

        DispatchOutcome { feedback, recorded }
    }

    /// Show a past result as the current operand.
    pub fn recall(&mut self, entry: &HistoryEntry) {
        self.state = CalculatorState::recalled(entry);
    }

    pub fn replace_history(&mut self, history: HistoryLog) {
        self.history = history;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Expression and result of the binary operation a transition evaluated, if
/// it evaluated one successfully.
fn completed_calculation(
    before: &CalculatorState,
    action: Action,
    after: &CalculatorState,
) -> Option<(String, String)> {
    if before.error.is_some() || after.error.is_some() {
        return None;
    }
    let PendingOperation::Pending {
        left_operand,
        operator,
    } = &before.pending
    else {
        return None;
    };

    // Chaining only evaluates once a right operand has been typed.
    let evaluated = match action {
        Action::Calculate => true,
        Action::InputOperation(_) => !before.waiting_for_operand,
        _ => false,
    };
    if !evaluated {
        return None;
    }

    Some((
        format!("{left_operand} {operator} {}", before.display),
        after.display.clone(),
    ))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
