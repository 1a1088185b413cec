//! The calculator state machine
//!
//! [`Calculator`] owns four fields: the operand being typed, the left-hand
//! operand of a pending operation, the pending operation itself, and a flag
//! saying the next digit starts a fresh operand. Every input method takes
//! `&mut self`, updates those fields synchronously, and returns the
//! [`Effects`] the surrounding UI has to carry out (re-render, highlight an
//! operator key, flash the display, schedule a deferred task).
//!
//! An empty [`Effects`] list means the input was ignored and nothing changed.
//!
//! ```rust
//! use web_calculator::core::Calculator;
//!
//! let mut calc = Calculator::new();
//! for digit in ['1', '2'] {
//!     calc.append_digit(digit);
//! }
//! assert_eq!(calc.display().current, "12");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::core::display::{self, DisplayText};
use crate::core::operand::{require_operand, stringify};
use crate::core::timer::DeferredTask;
use crate::core::{is_error_text, round_result, CalcError, Operation, MATH_ERROR};

/// Instruction for the UI layer produced by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Write [`Calculator::display`] into both display slots
    Render,
    /// Highlight this operator key and un-highlight every other one
    MarkOperator(Operation),
    /// Un-highlight all operator keys
    ClearOperatorMarks,
    /// Start the result flash cue
    Flash,
    /// Run `task` after `delay`
    Schedule {
        /// Delay before the task runs
        delay: Duration,
        /// The task to run
        task: DeferredTask,
    },
}

/// Ordered effects of one transition
pub type Effects = Vec<Effect>;

/// Conceptual machine state, derived from the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// `"0"` on screen, nothing pending
    Idle,
    /// An operand is being typed, or a result is shown
    Entering,
    /// Operator chosen, waiting for the second operand
    OperatorPending,
    /// Error text shown, waiting for recovery
    Error,
}

/// Serializable view of the machine, for logs and tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorSnapshot {
    /// Operand being typed, or the last result
    pub current_operand: String,
    /// Left-hand operand of the pending operation
    pub previous_operand: String,
    /// Operation waiting for its second operand
    pub pending_operation: Option<Operation>,
    /// Whether the next digit replaces the current operand
    pub should_reset_screen: bool,
    /// Derived phase
    pub phase: Phase,
}

/// Calculator input/compute state machine
#[derive(Debug, Clone)]
pub struct Calculator {
    current: String,
    previous: String,
    pending: Option<Operation>,
    should_reset: bool,
    /// Incremented each time the error display is entered
    error_epoch: u64,
    config: CalculatorConfig,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Creates a calculator in the cleared state with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::default())
    }

    /// Creates a calculator in the cleared state
    #[must_use]
    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            current: "0".to_string(),
            previous: String::new(),
            pending: None,
            should_reset: false,
            error_epoch: 0,
            config,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Operand being typed, or the last result
    #[must_use]
    pub fn current_operand(&self) -> &str {
        &self.current
    }

    /// Left-hand operand of the pending operation (empty if none)
    #[must_use]
    pub fn previous_operand(&self) -> &str {
        &self.previous
    }

    /// Operation waiting for its second operand
    #[must_use]
    pub fn pending_operation(&self) -> Option<Operation> {
        self.pending
    }

    /// Whether the next digit starts a fresh operand
    #[must_use]
    pub fn should_reset_screen(&self) -> bool {
        self.should_reset
    }

    /// Number of times the error display has been entered
    #[must_use]
    pub fn error_epoch(&self) -> u64 {
        self.error_epoch
    }

    /// Returns true while the error text is shown
    #[must_use]
    pub fn is_error(&self) -> bool {
        is_error_text(&self.current)
    }

    /// Derives the conceptual phase from the fields
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_error() {
            Phase::Error
        } else if self.pending.is_some() && self.should_reset {
            Phase::OperatorPending
        } else if self.current == "0" && self.pending.is_none() && self.previous.is_empty() {
            Phase::Idle
        } else {
            Phase::Entering
        }
    }

    /// Both display lines for the current state
    #[must_use]
    pub fn display(&self) -> DisplayText {
        display::render(
            &self.current,
            &self.previous,
            self.pending,
            self.config.thousands_separator,
        )
    }

    /// Serializable copy of the state
    #[must_use]
    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            current_operand: self.current.clone(),
            previous_operand: self.previous.clone(),
            pending_operation: self.pending,
            should_reset_screen: self.should_reset,
            phase: self.phase(),
        }
    }

    /// Resets every field to its default
    pub fn clear(&mut self) -> Effects {
        self.current = "0".to_string();
        self.previous.clear();
        self.pending = None;
        self.should_reset = false;
        tracing::debug!("cleared");
        vec![Effect::ClearOperatorMarks, Effect::Render]
    }

    /// Removes the last typed character
    ///
    /// Works on whatever the operand holds, the error text included.
    pub fn delete_last_char(&mut self) -> Effects {
        if self.current == "0" {
            return Effects::new();
        }
        if self.current.chars().count() <= 1 {
            self.current = "0".to_string();
        } else {
            self.current.pop();
        }
        tracing::debug!(current = %self.current, "deleted last character");
        vec![Effect::Render]
    }

    /// Appends a digit (`'0'..='9'`) or the decimal point
    pub fn append_digit(&mut self, token: char) -> Effects {
        if !(token.is_ascii_digit() || token == '.') {
            tracing::trace!(error = %CalcError::InvalidToken(token), "input ignored");
            return Effects::new();
        }

        let mut changed = false;
        if self.should_reset {
            self.current.clear();
            self.should_reset = false;
            changed = true;
        }

        if token == '.' && self.current.contains('.') {
            tracing::trace!("second decimal point ignored");
            return if changed {
                vec![Effect::Render]
            } else {
                Effects::new()
            };
        }

        if self.current == "0" && token != '.' {
            self.current = token.to_string();
        } else {
            self.current.push(token);
        }
        tracing::debug!(current = %self.current, "digit appended");
        vec![Effect::Render]
    }

    /// Chooses the operation to apply to the current operand
    ///
    /// If an operation is already pending and a second operand has been
    /// entered, it is computed first, so `2 + 3 +` shows `5` before the new
    /// `+`. Choosing again while the right operand is still the untouched
    /// copy of the left one just swaps the operator.
    pub fn choose_operation(&mut self, op: Operation) -> Effects {
        if self.current.is_empty() {
            return Effects::new();
        }

        if self.pending.is_some() && self.should_reset && self.current == self.previous {
            self.pending = Some(op);
            tracing::debug!(%op, "pending operator replaced");
            return vec![Effect::MarkOperator(op), Effect::Render];
        }

        let mut effects = Effects::new();
        if !self.previous.is_empty() {
            effects.extend(self.compute());
            if self.is_error() {
                return effects;
            }
        }

        self.pending = Some(op);
        self.previous = self.current.clone();
        self.should_reset = true;
        tracing::debug!(%op, previous = %self.previous, "operator chosen");

        effects.push(Effect::MarkOperator(op));
        effects.push(Effect::Render);
        effects
    }

    /// Applies the pending operation to the two operands
    ///
    /// Ignored when nothing is pending or either operand is not a number.
    /// Division by zero switches to the error display.
    pub fn compute(&mut self) -> Effects {
        if self.is_error() {
            return Effects::new();
        }
        let Some(op) = self.pending else {
            tracing::trace!(error = %CalcError::NoPendingOperation, "compute ignored");
            return Effects::new();
        };

        let operands = require_operand(&self.previous)
            .and_then(|lhs| require_operand(&self.current).map(|rhs| (lhs, rhs)));
        let (lhs, rhs) = match operands {
            Ok(pair) => pair,
            Err(err) => {
                tracing::trace!(error = %err, "compute ignored");
                return Effects::new();
            }
        };

        let value = match op.apply(lhs, rhs) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, lhs, rhs, %op, "operation failed");
                return self.enter_error();
            }
        };

        let rounded = round_result(value, self.config.round_decimals);
        self.current = stringify(rounded);
        self.pending = None;
        self.previous.clear();
        self.should_reset = true;
        tracing::debug!(lhs, rhs, %op, result = %self.current, "computed");

        vec![
            Effect::Flash,
            Effect::Schedule {
                delay: self.config.flash_duration(),
                task: DeferredTask::EndFlash,
            },
            Effect::ClearOperatorMarks,
            Effect::Render,
        ]
    }

    /// Divides the current operand by 100
    pub fn calculate_percent(&mut self) -> Effects {
        if self.is_error() {
            return Effects::new();
        }
        let value = match require_operand(&self.current) {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(error = %err, "percent ignored");
                return Effects::new();
            }
        };
        self.current = stringify(value / 100.0);
        tracing::debug!(current = %self.current, "percent applied");
        vec![Effect::Render]
    }

    /// Handles a fired [`DeferredTask::Recover`]
    ///
    /// Clears the calculator only for the latest error, and only while an
    /// operand still holds something other than a number (the error text or
    /// what delete left of it). Recovery on top of fresh numeric input is a
    /// no-op.
    pub fn recover(&mut self, epoch: u64) -> Effects {
        if self.error_epoch == epoch && self.holds_non_numeric() {
            tracing::debug!(epoch, "recovering from error");
            return self.clear();
        }
        tracing::trace!(epoch, current_epoch = self.error_epoch, "stale recovery ignored");
        Effects::new()
    }

    fn holds_non_numeric(&self) -> bool {
        require_operand(&self.current).is_err()
            || (!self.previous.is_empty() && require_operand(&self.previous).is_err())
    }

    fn enter_error(&mut self) -> Effects {
        self.current = MATH_ERROR.to_string();
        self.previous.clear();
        self.pending = None;
        self.should_reset = true;
        self.error_epoch += 1;

        vec![
            Effect::ClearOperatorMarks,
            Effect::Render,
            Effect::Schedule {
                delay: self.config.recovery_delay(),
                task: DeferredTask::Recover {
                    epoch: self.error_epoch,
                },
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(calc: &mut Calculator, digits: &str) {
        for c in digits.chars() {
            calc.append_digit(c);
        }
    }

    fn recovery_epoch(effects: &Effects) -> Option<u64> {
        effects.iter().find_map(|e| match e {
            Effect::Schedule {
                task: DeferredTask::Recover { epoch },
                ..
            } => Some(*epoch),
            _ => None,
        })
    }

    // ===== Construction =====

    #[test]
    fn test_new_is_cleared() {
        let calc = Calculator::new();
        assert_eq!(calc.current_operand(), "0");
        assert!(calc.previous_operand().is_empty());
        assert_eq!(calc.pending_operation(), None);
        assert!(!calc.should_reset_screen());
        assert_eq!(calc.phase(), Phase::Idle);
    }

    #[test]
    fn test_default_matches_new() {
        assert_eq!(Calculator::default().snapshot(), Calculator::new().snapshot());
    }

    // ===== clear =====

    #[test]
    fn test_clear_resets_everything() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "42");
        calc.choose_operation(Operation::Add);
        type_digits(&mut calc, "1");

        let effects = calc.clear();
        assert_eq!(effects, vec![Effect::ClearOperatorMarks, Effect::Render]);
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut calc = Calculator::new();
        calc.clear();
        let first = calc.snapshot();
        calc.clear();
        assert_eq!(calc.snapshot(), first);
    }

    // ===== delete_last_char =====

    #[test]
    fn test_delete_on_zero_is_noop() {
        let mut calc = Calculator::new();
        assert!(calc.delete_last_char().is_empty());
        assert_eq!(calc.current_operand(), "0");
    }

    #[test]
    fn test_delete_sequence() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "12");
        calc.delete_last_char();
        assert_eq!(calc.current_operand(), "1");
        calc.delete_last_char();
        assert_eq!(calc.current_operand(), "0");
        assert!(calc.delete_last_char().is_empty());
        assert_eq!(calc.current_operand(), "0");
    }

    #[test]
    fn test_delete_keeps_pending_operation() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "8");
        calc.choose_operation(Operation::Multiply);
        type_digits(&mut calc, "34");
        calc.delete_last_char();
        assert_eq!(calc.current_operand(), "3");
        assert_eq!(calc.previous_operand(), "8");
        assert_eq!(calc.pending_operation(), Some(Operation::Multiply));
    }

    #[test]
    fn test_delete_on_negative_result() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "2");
        calc.choose_operation(Operation::Subtract);
        type_digits(&mut calc, "7");
        calc.compute();
        assert_eq!(calc.current_operand(), "-5");
        calc.delete_last_char();
        assert_eq!(calc.current_operand(), "-");
        assert_eq!(calc.display().current, "");
    }

    // ===== append_digit =====

    #[test]
    fn test_append_replaces_leading_zero() {
        let mut calc = Calculator::new();
        calc.append_digit('7');
        assert_eq!(calc.current_operand(), "7");
    }

    #[test]
    fn test_append_zero_on_zero() {
        let mut calc = Calculator::new();
        calc.append_digit('0');
        calc.append_digit('0');
        assert_eq!(calc.current_operand(), "0");
    }

    #[test]
    fn test_append_decimal_keeps_zero() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, ".5");
        assert_eq!(calc.current_operand(), "0.5");
    }

    #[test]
    fn test_second_decimal_ignored() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "1.");
        assert!(calc.append_digit('.').is_empty());
        type_digits(&mut calc, "5.");
        assert_eq!(calc.current_operand(), "1.5");
    }

    #[test]
    fn test_append_invalid_token_ignored() {
        let mut calc = Calculator::new();
        assert!(calc.append_digit('x').is_empty());
        assert!(calc.append_digit('+').is_empty());
        assert_eq!(calc.current_operand(), "0");
    }

    #[test]
    fn test_append_after_result_starts_fresh() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "2");
        calc.choose_operation(Operation::Add);
        type_digits(&mut calc, "2");
        calc.compute();
        calc.append_digit('9');
        assert_eq!(calc.current_operand(), "9");
        assert!(!calc.should_reset_screen());
    }

    #[test]
    fn test_decimal_after_result_starts_fresh() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "1");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "4");
        calc.compute();
        assert_eq!(calc.current_operand(), "0.25");
        calc.append_digit('.');
        assert_eq!(calc.current_operand(), ".");
        assert_eq!(calc.display().current, ".");
    }

    // ===== choose_operation =====

    #[test]
    fn test_choose_operation_sets_pending() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "12");
        let effects = calc.choose_operation(Operation::Divide);
        assert_eq!(
            effects,
            vec![Effect::MarkOperator(Operation::Divide), Effect::Render]
        );
        assert_eq!(calc.previous_operand(), "12");
        assert_eq!(calc.pending_operation(), Some(Operation::Divide));
        assert!(calc.should_reset_screen());
        assert_eq!(calc.phase(), Phase::OperatorPending);
        assert_eq!(calc.display().previous, "12 ÷");
    }

    #[test]
    fn test_choose_operation_twice_swaps_operator() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "2");
        calc.choose_operation(Operation::Add);
        let effects = calc.choose_operation(Operation::Multiply);
        assert_eq!(
            effects,
            vec![Effect::MarkOperator(Operation::Multiply), Effect::Render]
        );
        assert_eq!(calc.previous_operand(), "2");
        assert_eq!(calc.pending_operation(), Some(Operation::Multiply));
        assert_eq!(calc.current_operand(), "2");
    }

    #[test]
    fn test_operator_after_percent_computes_first() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "50");
        calc.choose_operation(Operation::Add);
        calc.calculate_percent();
        assert_eq!(calc.current_operand(), "0.5");

        calc.choose_operation(Operation::Multiply);
        assert_eq!(calc.previous_operand(), "50.5");
        assert_eq!(calc.pending_operation(), Some(Operation::Multiply));

        type_digits(&mut calc, "2");
        calc.compute();
        assert_eq!(calc.current_operand(), "101");
    }

    #[test]
    fn test_operator_after_delete_computes_first() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "12");
        calc.choose_operation(Operation::Add);
        calc.delete_last_char();
        assert_eq!(calc.current_operand(), "1");

        calc.choose_operation(Operation::Multiply);
        assert_eq!(calc.previous_operand(), "13");
        assert_eq!(calc.pending_operation(), Some(Operation::Multiply));
    }

    #[test]
    fn test_chained_operations() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "2");
        calc.choose_operation(Operation::Add);
        type_digits(&mut calc, "3");
        let effects = calc.choose_operation(Operation::Add);
        assert!(effects.contains(&Effect::Flash));
        assert_eq!(calc.current_operand(), "5");
        assert_eq!(calc.previous_operand(), "5");
        type_digits(&mut calc, "4");
        calc.compute();
        assert_eq!(calc.current_operand(), "9");
    }

    #[test]
    fn test_chained_mark_comes_after_compute_clear() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "6");
        calc.choose_operation(Operation::Multiply);
        type_digits(&mut calc, "7");
        let effects = calc.choose_operation(Operation::Subtract);
        let clear_at = effects
            .iter()
            .position(|e| *e == Effect::ClearOperatorMarks)
            .unwrap();
        let mark_at = effects
            .iter()
            .position(|e| *e == Effect::MarkOperator(Operation::Subtract))
            .unwrap();
        assert!(clear_at < mark_at);
        assert_eq!(calc.display().previous, "42 −");
    }

    #[test]
    fn test_chained_division_by_zero_stops_at_error() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        let effects = calc.choose_operation(Operation::Add);
        assert!(calc.is_error());
        assert_eq!(calc.pending_operation(), None);
        assert!(!effects.iter().any(|e| matches!(e, Effect::MarkOperator(_))));
    }

    // ===== compute =====

    #[test]
    fn test_compute_without_pending_is_noop() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        assert!(calc.compute().is_empty());
        assert_eq!(calc.current_operand(), "5");
    }

    #[test]
    fn test_compute_effects() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "2");
        calc.choose_operation(Operation::Multiply);
        type_digits(&mut calc, "21");
        let effects = calc.compute();
        assert_eq!(
            effects,
            vec![
                Effect::Flash,
                Effect::Schedule {
                    delay: Duration::from_millis(200),
                    task: DeferredTask::EndFlash,
                },
                Effect::ClearOperatorMarks,
                Effect::Render,
            ]
        );
        assert_eq!(calc.current_operand(), "42");
        assert!(calc.previous_operand().is_empty());
        assert_eq!(calc.pending_operation(), None);
        assert!(calc.should_reset_screen());
    }

    #[test]
    fn test_compute_right_after_operator_uses_same_operand() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "4");
        calc.choose_operation(Operation::Multiply);
        calc.compute();
        assert_eq!(calc.current_operand(), "16");
    }

    #[test]
    fn test_compute_rounds_float_noise() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "0.1");
        calc.choose_operation(Operation::Add);
        type_digits(&mut calc, "0.2");
        calc.compute();
        assert_eq!(calc.current_operand(), "0.3");
    }

    #[test]
    fn test_compute_with_unparseable_operand_is_noop() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "3");
        calc.choose_operation(Operation::Add);
        calc.append_digit('.');
        assert!(calc.compute().is_empty());
        assert_eq!(calc.current_operand(), ".");
        assert_eq!(calc.pending_operation(), Some(Operation::Add));
    }

    #[test]
    fn test_compute_result_formats_with_separators() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "1000");
        calc.choose_operation(Operation::Multiply);
        type_digits(&mut calc, "1000");
        calc.compute();
        assert_eq!(calc.current_operand(), "1000000");
        assert_eq!(calc.display().current, "1,000,000");
    }

    // ===== division by zero =====

    #[test]
    fn test_division_by_zero_enters_error() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        let effects = calc.compute();

        assert_eq!(calc.current_operand(), MATH_ERROR);
        assert!(calc.previous_operand().is_empty());
        assert_eq!(calc.pending_operation(), None);
        assert_eq!(calc.phase(), Phase::Error);
        assert_eq!(calc.error_epoch(), 1);
        assert_eq!(recovery_epoch(&effects), Some(1));
        assert!(effects.contains(&Effect::Schedule {
            delay: Duration::from_millis(2000),
            task: DeferredTask::Recover { epoch: 1 },
        }));
        assert!(!effects.contains(&Effect::Flash));

        let text = calc.display();
        assert_eq!(text.current, "Math Error");
        assert!(text.previous.is_empty());
    }

    #[test]
    fn test_recover_returns_to_idle() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        calc.compute();

        let effects = calc.recover(1);
        assert!(effects.contains(&Effect::Render));
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_stale_recovery_after_new_input_is_noop() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        calc.compute();

        type_digits(&mut calc, "7");
        assert_eq!(calc.current_operand(), "7");
        assert!(calc.recover(1).is_empty());
        assert_eq!(calc.current_operand(), "7");
    }

    #[test]
    fn test_recovery_for_older_error_is_noop() {
        let mut calc = Calculator::new();
        for _ in 0..2 {
            calc.clear();
            type_digits(&mut calc, "1");
            calc.choose_operation(Operation::Divide);
            type_digits(&mut calc, "0");
            calc.compute();
        }
        assert_eq!(calc.error_epoch(), 2);
        assert!(calc.recover(1).is_empty());
        assert!(calc.is_error());
        assert!(!calc.recover(2).is_empty());
        assert!(!calc.is_error());
    }

    #[test]
    fn test_percent_and_compute_ignored_while_error() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "9");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        calc.compute();

        assert!(calc.calculate_percent().is_empty());
        assert!(calc.compute().is_empty());
        assert_eq!(calc.current_operand(), MATH_ERROR);
    }

    #[test]
    fn test_delete_edits_error_text() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        calc.compute();

        assert_eq!(calc.delete_last_char(), vec![Effect::Render]);
        assert_eq!(calc.current_operand(), "Math Erro");
        assert_eq!(calc.phase(), Phase::Entering);
        // Not a number, so the integer part renders empty
        assert_eq!(calc.display().current, "");

        assert!(!calc.recover(1).is_empty());
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_operator_on_error_text() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "5");
        calc.choose_operation(Operation::Divide);
        type_digits(&mut calc, "0");
        calc.compute();

        let effects = calc.choose_operation(Operation::Add);
        assert_eq!(effects, vec![Effect::MarkOperator(Operation::Add), Effect::Render]);
        assert_eq!(calc.previous_operand(), MATH_ERROR);
        assert_eq!(calc.pending_operation(), Some(Operation::Add));
        assert_eq!(calc.display().previous, "");

        // Digits typed on top still leave the error text on the left
        type_digits(&mut calc, "3");
        assert!(calc.compute().is_empty());
        assert!(!calc.recover(1).is_empty());
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    // ===== calculate_percent =====

    #[test]
    fn test_percent() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "50");
        assert_eq!(calc.calculate_percent(), vec![Effect::Render]);
        assert_eq!(calc.current_operand(), "0.5");
    }

    #[test]
    fn test_percent_keeps_pending_and_appends_after() {
        let mut calc = Calculator::new();
        type_digits(&mut calc, "200");
        calc.choose_operation(Operation::Add);
        type_digits(&mut calc, "10");
        calc.calculate_percent();
        assert_eq!(calc.current_operand(), "0.1");
        assert_eq!(calc.previous_operand(), "200");
        calc.append_digit('5');
        assert_eq!(calc.current_operand(), "0.15");
    }

    #[test]
    fn test_percent_of_unparseable_is_noop() {
        let mut calc = Calculator::new();
        calc.append_digit('1');
        calc.calculate_percent();
        calc.choose_operation(Operation::Add);
        calc.append_digit('.');
        assert!(calc.calculate_percent().is_empty());
        assert_eq!(calc.current_operand(), ".");
    }

    #[test]
    fn test_percent_of_trailing_decimal() {
        let mut calc = Calculator::new();
        calc.append_digit('.');
        assert_eq!(calc.current_operand(), "0.");
        calc.calculate_percent();
        assert_eq!(calc.current_operand(), "0");
    }

    // ===== phase and snapshot =====

    #[test]
    fn test_phase_progression() {
        let mut calc = Calculator::new();
        assert_eq!(calc.phase(), Phase::Idle);
        calc.append_digit('3');
        assert_eq!(calc.phase(), Phase::Entering);
        calc.choose_operation(Operation::Add);
        assert_eq!(calc.phase(), Phase::OperatorPending);
        calc.append_digit('4');
        assert_eq!(calc.phase(), Phase::Entering);
        calc.compute();
        assert_eq!(calc.phase(), Phase::Entering);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut calc = Calculator::new();
        calc.append_digit('8');
        calc.choose_operation(Operation::Subtract);
        let json = serde_json::to_string(&calc.snapshot()).unwrap();
        assert!(json.contains("\"pending_operation\":\"-\""));
        assert!(json.contains("\"phase\":\"OperatorPending\""));
    }

    #[test]
    fn test_custom_separator_in_display() {
        let config = CalculatorConfig::new().with_thousands_separator(' ');
        let mut calc = Calculator::with_config(config);
        type_digits(&mut calc, "1234567");
        assert_eq!(calc.display().current, "1 234 567");
    }
}
