//! Calculator state transitions. Every branch builds a fresh `CalculatorState`;
//! the input state is never modified.

use crate::{
    domain::{
        Action, CalculatorState, Operator, PendingOperation, MAX_DISPLAY_DIGITS, ROUNDING_PLACES,
    },
    evaluator::{evaluate, format_number, parse_operand, round_to_places},
};

pub fn reduce(state: &CalculatorState, action: Action) -> CalculatorState {
    // Errors latch until an explicit clear.
    if state.error.is_some() && action != Action::Clear {
        return state.clone();
    }

    match action {
        Action::InputDigit(digit) => input_digit(state, digit),
        Action::InputDecimal => input_decimal(state),
        Action::InputOperation(operator) => input_operation(state, operator),
        Action::Calculate => calculate(state),
        Action::Clear => CalculatorState::initial(),
        Action::Backspace => backspace(state),
        Action::Negate => negate(state),
        Action::Percent => percent(state),
        Action::SetError(kind) => CalculatorState::errored(kind, state.expression.clone()),
    }
}

/// Apply a sequence of actions from `state`, returning the final state.
pub fn reduce_all<I>(state: &CalculatorState, actions: I) -> CalculatorState
where
    I: IntoIterator<Item = Action>,
{
    actions
        .into_iter()
        .fold(state.clone(), |current, action| reduce(&current, action))
}

fn digit_count(display: &str) -> usize {
    display.chars().filter(char::is_ascii_digit).count()
}

fn input_digit(state: &CalculatorState, digit: char) -> CalculatorState {
    if !digit.is_ascii_digit() {
        return state.clone();
    }

    if state.waiting_for_operand {
        return CalculatorState {
            display: digit.to_string(),
            waiting_for_operand: false,
            ..state.clone()
        };
    }

    let display = match state.display.as_str() {
        "0" => digit.to_string(),
        "-0" => format!("-{digit}"),
        current => format!("{current}{digit}"),
    };

    if digit_count(&display) > MAX_DISPLAY_DIGITS {
        return state.clone();
    }

    CalculatorState {
        display,
        ..state.clone()
    }
}

fn input_decimal(state: &CalculatorState) -> CalculatorState {
    if state.waiting_for_operand {
        return CalculatorState {
            display: "0.".to_string(),
            waiting_for_operand: false,
            ..state.clone()
        };
    }

    if state.display.contains('.') {
        return state.clone();
    }

    CalculatorState {
        display: format!("{}.", state.display),
        ..state.clone()
    }
}

fn input_operation(state: &CalculatorState, operator: Operator) -> CalculatorState {
    if let PendingOperation::Pending {
        left_operand,
        operator: pending,
    } = &state.pending
    {
        if !state.waiting_for_operand {
            return match evaluate(left_operand, &state.display, *pending) {
                Ok(result) => CalculatorState {
                    expression: format!("{result} {operator}"),
                    pending: PendingOperation::new(result.clone(), operator),
                    display: result,
                    waiting_for_operand: true,
                    error: None,
                },
                Err(kind) => CalculatorState::errored(
                    kind,
                    format!("{left_operand} {pending} {}", state.display),
                ),
            };
        }
    }

    CalculatorState {
        display: state.display.clone(),
        pending: PendingOperation::new(state.display.clone(), operator),
        waiting_for_operand: true,
        expression: format!("{} {operator}", state.display),
        error: None,
    }
}

fn calculate(state: &CalculatorState) -> CalculatorState {
    let PendingOperation::Pending {
        left_operand,
        operator,
    } = &state.pending
    else {
        return state.clone();
    };

    let attempted = format!("{left_operand} {operator} {}", state.display);
    match evaluate(left_operand, &state.display, *operator) {
        Ok(result) => CalculatorState {
            display: result,
            pending: PendingOperation::None,
            waiting_for_operand: true,
            expression: format!("{attempted} ="),
            error: None,
        },
        Err(kind) => CalculatorState::errored(kind, attempted),
    }
}

fn backspace(state: &CalculatorState) -> CalculatorState {
    if state.waiting_for_operand {
        return state.clone();
    }

    let mut trimmed = state.display.clone();
    trimmed.pop();
    let display = if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed
    };

    CalculatorState {
        display,
        ..state.clone()
    }
}

fn negate(state: &CalculatorState) -> CalculatorState {
    if state.display == "0" || state.waiting_for_operand {
        return state.clone();
    }

    let display = match state.display.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{}", state.display),
    };

    CalculatorState {
        display,
        ..state.clone()
    }
}

fn percent(state: &CalculatorState) -> CalculatorState {
    if state.waiting_for_operand {
        return state.clone();
    }

    let Ok(value) = parse_operand(&state.display) else {
        return state.clone();
    };

    CalculatorState {
        display: format_number(round_to_places(value / 100.0, ROUNDING_PLACES)),
        ..state.clone()
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
