//! Calculator core: operations, operands, display formatting and the
//! input/compute state machine.
//!
//! Everything in here is platform independent. The DOM layer in
//! [`crate::wasm`] only ever talks to [`Calculator`] and applies the
//! [`Effect`]s it hands back.

pub mod display;
pub mod operand;
mod operation;
pub mod state;
pub mod timer;

pub use display::{format_operand, DisplayText};
pub use operation::{round_result, Operation};
pub use state::{Calculator, CalculatorSnapshot, Effect, Effects, Phase};
pub use timer::{DeferredTask, TimerId, TimerQueue};

use thiserror::Error;

/// Text shown in place of a result when a division by zero is attempted
pub const MATH_ERROR: &str = "Math Error";

/// Generic error token, treated exactly like [`MATH_ERROR`] by the formatter
pub const GENERIC_ERROR: &str = "Error";

/// Returns true if `text` is one of the error sentinels
#[must_use]
pub fn is_error_text(text: &str) -> bool {
    text == MATH_ERROR || text == GENERIC_ERROR
}

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Calculator error types
///
/// None of these escape the state machine: division by zero becomes the
/// error display, everything else is an ignored input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,
    /// Operand text is not a number
    #[error("Invalid operand: {0:?}")]
    InvalidOperand(String),
    /// Compute requested with no operator chosen
    #[error("No pending operation")]
    NoPendingOperation,
    /// Operator token outside `+ - * /`
    #[error("Unknown operator: {0:?}")]
    UnknownOperator(String),
    /// Digit input that is neither `0-9` nor `.`
    #[error("Invalid input token: {0:?}")]
    InvalidToken(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== CalcError tests =====

    #[test]
    fn test_calc_error_display_division_by_zero() {
        assert_eq!(CalcError::DivisionByZero.to_string(), "Division by zero");
    }

    #[test]
    fn test_calc_error_display_invalid_operand() {
        let err = CalcError::InvalidOperand(".".into());
        assert_eq!(err.to_string(), "Invalid operand: \".\"");
    }

    #[test]
    fn test_calc_error_display_unknown_operator() {
        let err = CalcError::UnknownOperator("^".into());
        assert_eq!(err.to_string(), "Unknown operator: \"^\"");
    }

    #[test]
    fn test_calc_error_display_invalid_token() {
        assert_eq!(
            CalcError::InvalidToken('x').to_string(),
            "Invalid input token: 'x'"
        );
    }

    #[test]
    fn test_calc_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CalcError::NoPendingOperation);
        assert!(err.to_string().contains("pending"));
    }

    // ===== Sentinel tests =====

    #[test]
    fn test_is_error_text() {
        assert!(is_error_text("Math Error"));
        assert!(is_error_text("Error"));
        assert!(!is_error_text("error"));
        assert!(!is_error_text("0"));
        assert!(!is_error_text(""));
    }
}
