//! Binary arithmetic over display strings.

use crate::{
    domain::{Operator, ROUNDING_PLACES},
    error::ErrorKind,
};

/// Magnitude from which results switch to exponent notation.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Apply `op` to two operand strings and format the result for the display.
///
/// Division by zero is reported as its own kind before any division happens,
/// so it never degrades into a generic `Overflow`.
pub fn evaluate(a: &str, b: &str, op: Operator) -> Result<String, ErrorKind> {
    let lhs = parse_operand(a)?;
    let rhs = parse_operand(b)?;

    let raw = match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return Err(ErrorKind::DivisionByZero);
            }
            lhs / rhs
        }
    };

    if !raw.is_finite() {
        return Err(ErrorKind::Overflow);
    }

    Ok(format_number(round_to_places(raw, ROUNDING_PLACES)))
}

/// Parse a display string as a finite decimal number.
pub fn parse_operand(text: &str) -> Result<f64, ErrorKind> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| ErrorKind::InvalidInput)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ErrorKind::InvalidInput)
    }
}

/// Fraction digits needed to print any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Round half away from zero at `places` decimals.
///
/// Works on the exact decimal expansion of `value`, so ties are decided on the
/// true binary value and large magnitudes never overflow a scale factor.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let places = places as usize;
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let Some((int_part, frac_part)) = exact.split_once('.') else {
        return value;
    };

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(places))
        .collect();
    if frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
        increment_decimal(&mut digits);
    }

    let int_len = digits.len() - places;
    let (int_digits, frac_digits) = digits.split_at(int_len);
    let mut text = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        text.push('-');
    }
    text.extend(int_digits.iter().map(|d| char::from(*d)));
    if !frac_digits.is_empty() {
        text.push('.');
        text.extend(frac_digits.iter().map(|d| char::from(*d)));
    }
    text.parse::<f64>().unwrap_or(value)
}

/// Add one unit in the last place to a string of ASCII digits.
fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Shortest decimal text that round-trips `value`; exponent form only for
/// magnitudes of 1e21 and beyond.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return format!("{value:e}");
    }
    format!("{value}")
}

#[cfg(test)]
#[path = "tests/evaluator_tests.rs"]
mod tests;
