//! Operand text <-> number conversion
//!
//! Operands are kept as text while the user types them. Parsing takes the
//! longest numeric prefix of the text, so `"12."` is 12 and `"5x"` is 5,
//! while `"."`, `"-"` and the error sentinels are not numbers at all.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::{CalcError, CalcResult};

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("numeric prefix pattern is valid")
    })
}

/// Parses the numeric prefix of an operand, or `None` if there is none
#[must_use]
pub fn parse_operand(text: &str) -> Option<f64> {
    let matched = numeric_prefix().find(text)?.as_str();
    let unsigned = matched.trim_start_matches(['+', '-']);
    if unsigned == "Infinity" {
        return Some(if matched.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    matched.parse().ok()
}

/// Like [`parse_operand`], but reports the offending text
pub fn require_operand(text: &str) -> CalcResult<f64> {
    parse_operand(text).ok_or_else(|| CalcError::InvalidOperand(text.to_string()))
}

/// Turns a number back into operand text
///
/// Uses the shortest decimal that round-trips, never exponent notation.
/// Negative zero prints as `0`; non-finite values print as `Infinity`,
/// `-Infinity` and `NaN`.
#[must_use]
pub fn stringify(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
