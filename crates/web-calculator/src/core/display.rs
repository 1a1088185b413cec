//! Display formatting
//!
//! Pure functions from calculator state to the two strings shown on screen.
//! The integer part of an operand gets thousands separators; whatever follows
//! the decimal point is shown exactly as typed, so `"1234."` displays as
//! `"1,234."` while the user is still entering digits.

use serde::{Deserialize, Serialize};

use crate::core::operand::parse_operand;
use crate::core::{is_error_text, Operation};

/// The two display slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayText {
    /// Main (large) line: the operand being entered or the last result
    pub current: String,
    /// Upper (small) line: previous operand and pending operator glyph
    pub previous: String,
}

/// Formats one operand for display
#[must_use]
pub fn format_operand(text: &str, separator: char) -> String {
    if is_error_text(text) {
        return text.to_string();
    }

    let mut parts = text.split('.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let integer_display = format_integer(integer, separator);
    match fraction {
        Some(digits) => format!("{integer_display}.{digits}"),
        None => integer_display,
    }
}

/// Formats the integer part; empty when it is not a number
fn format_integer(integer: &str, separator: char) -> String {
    let Some(value) = parse_operand(integer) else {
        return String::new();
    };
    let sign = if integer.starts_with('-') { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}\u{221e}");
    }

    let unsigned = integer.trim_start_matches(['+', '-']);
    let digits: String = if unsigned.contains(['e', 'E']) {
        format!("{:.0}", value.abs())
    } else {
        let run: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
        let trimmed = run.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    };

    format!("{sign}{}", group_thousands(&digits, separator))
}

/// Inserts `separator` between groups of three digits
fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// Builds both display lines from the raw calculator fields
#[must_use]
pub fn render(
    current: &str,
    previous: &str,
    pending: Option<Operation>,
    separator: char,
) -> DisplayText {
    if is_error_text(current) {
        return DisplayText {
            current: current.to_string(),
            previous: String::new(),
        };
    }

    let current = if current.is_empty() {
        "0".to_string()
    } else {
        format_operand(current, separator)
    };

    let previous = match pending {
        Some(op) => format!("{} {}", format_operand(previous, separator), op.glyph()),
        None => String::new(),
    };

    DisplayText { current, previous }
}
