//! Unified calculator driver
//!
//! Scenario checks are written once against [`CalculatorDriver`] and run on
//! every front end: the [`HeadlessDriver`] that tracks UI state in plain
//! fields, and the [`WasmDriver`](crate::wasm::WasmDriver) that renders into
//! a mock DOM.

use crate::core::{CalculatorSnapshot, Operation, Phase};
use crate::wasm::{Keypad, KeypadAction};

/// Abstract driver trait for calculator interactions
///
/// # Example
///
/// ```rust
/// use web_calculator::driver::{CalculatorDriver, HeadlessDriver};
///
/// let mut driver = HeadlessDriver::new();
/// driver.enter("12+30=");
/// assert_eq!(driver.current_display(), "42");
/// ```
pub trait CalculatorDriver {
    /// Performs one keypad action
    fn press(&mut self, action: KeypadAction);

    /// Text of the main display line
    fn current_display(&self) -> String;

    /// Text of the upper display line
    fn previous_display(&self) -> String;

    /// Operator key currently highlighted
    fn active_operator(&self) -> Option<Operation>;

    /// Whether the result flash cue is showing
    fn is_flashing(&self) -> bool;

    /// Lets `ms` milliseconds pass, firing deferred tasks that become due
    fn advance_ms(&mut self, ms: u64);

    /// State machine snapshot
    fn snapshot(&self) -> CalculatorSnapshot;

    /// Types a key sequence; each character is mapped like a key press and
    /// characters without a mapping (such as spaces) are skipped
    fn enter(&mut self, keys: &str) {
        let mut buf = [0u8; 4];
        for c in keys.chars() {
            if let Some(action) = Keypad::key_to_action(c.encode_utf8(&mut buf)) {
                self.press(action);
            }
        }
    }
}

/// Driver without any DOM
pub mod headless {
    use super::{CalculatorDriver, Operation};
    use crate::config::CalculatorConfig;
    use crate::core::{Calculator, CalculatorSnapshot, DeferredTask, Effect, Effects, TimerQueue};
    use crate::wasm::KeypadAction;

    /// Driver that keeps the UI state (highlight, flash, display text) in
    /// plain fields
    #[derive(Debug)]
    pub struct HeadlessDriver {
        calculator: Calculator,
        timers: TimerQueue,
        current_text: String,
        previous_text: String,
        active_operator: Option<Operation>,
        flashing: bool,
    }

    impl Default for HeadlessDriver {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HeadlessDriver {
        /// Creates a new headless driver
        #[must_use]
        pub fn new() -> Self {
            Self::with_config(CalculatorConfig::default())
        }

        /// Creates a headless driver with custom settings
        #[must_use]
        pub fn with_config(config: CalculatorConfig) -> Self {
            let mut driver = Self {
                calculator: Calculator::with_config(config),
                timers: TimerQueue::new(),
                current_text: String::new(),
                previous_text: String::new(),
                active_operator: None,
                flashing: false,
            };
            driver.apply(vec![Effect::Render]);
            driver
        }

        /// Returns a reference to the state machine
        #[must_use]
        pub fn calculator(&self) -> &Calculator {
            &self.calculator
        }

        /// Returns the timer queue
        #[must_use]
        pub fn timers(&self) -> &TimerQueue {
            &self.timers
        }

        fn apply(&mut self, effects: Effects) {
            for effect in effects {
                match effect {
                    Effect::Render => {
                        let text = self.calculator.display();
                        self.current_text = text.current;
                        self.previous_text = text.previous;
                    }
                    Effect::MarkOperator(op) => self.active_operator = Some(op),
                    Effect::ClearOperatorMarks => self.active_operator = None,
                    Effect::Flash => self.flashing = true,
                    Effect::Schedule { delay, task } => {
                        self.timers.schedule(delay, task);
                    }
                }
            }
        }
    }

    impl CalculatorDriver for HeadlessDriver {
        fn press(&mut self, action: KeypadAction) {
            let effects = action.apply(&mut self.calculator);
            self.apply(effects);
        }

        fn current_display(&self) -> String {
            self.current_text.clone()
        }

        fn previous_display(&self) -> String {
            self.previous_text.clone()
        }

        fn active_operator(&self) -> Option<Operation> {
            self.active_operator
        }

        fn is_flashing(&self) -> bool {
            self.flashing
        }

        fn advance_ms(&mut self, ms: u64) {
            for task in self.timers.advance_ms(ms) {
                match task {
                    DeferredTask::Recover { epoch } => {
                        let effects = self.calculator.recover(epoch);
                        self.apply(effects);
                    }
                    DeferredTask::EndFlash => self.flashing = false,
                }
            }
        }

        fn snapshot(&self) -> CalculatorSnapshot {
            self.calculator.snapshot()
        }
    }
}

pub use headless::HeadlessDriver;

// ===== Unified scenarios =====
// These checks work with ANY CalculatorDriver implementation

/// Verifies digit entry and decimal point handling
pub fn verify_digit_entry<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);
    assert_eq!(driver.current_display(), "0");

    driver.enter("007");
    assert_eq!(driver.current_display(), "7");

    driver.enter(".5.2");
    assert_eq!(driver.current_display(), "7.52");
    assert_eq!(driver.snapshot().phase, Phase::Entering);
    driver.press(KeypadAction::Clear);
}

/// Verifies the four operations and left-to-right chaining
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("2+3=");
    assert_eq!(driver.current_display(), "5");
    driver.press(KeypadAction::Clear);

    driver.enter("10-4=");
    assert_eq!(driver.current_display(), "6");
    driver.press(KeypadAction::Clear);

    driver.enter("6*7=");
    assert_eq!(driver.current_display(), "42");
    driver.press(KeypadAction::Clear);

    driver.enter("20/4=");
    assert_eq!(driver.current_display(), "5");
    driver.press(KeypadAction::Clear);
}

/// Verifies that choosing an operator with a second operand computes first
pub fn verify_chaining<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("2+3+");
    assert_eq!(driver.current_display(), "5");
    assert_eq!(driver.previous_display(), "5 +");

    driver.enter("4=");
    assert_eq!(driver.current_display(), "9");
    assert!(driver.previous_display().is_empty());
    driver.press(KeypadAction::Clear);
}

/// Verifies that a second operator before any digit replaces the first
pub fn verify_operator_swap<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("8+");
    assert_eq!(driver.active_operator(), Some(Operation::Add));
    driver.enter("*");
    assert_eq!(driver.active_operator(), Some(Operation::Multiply));
    assert_eq!(driver.previous_display(), "8 ×");

    driver.enter("2=");
    assert_eq!(driver.current_display(), "16");
    assert_eq!(driver.active_operator(), None);
    driver.press(KeypadAction::Clear);
}

/// Verifies the division-by-zero error display and its timed recovery
pub fn verify_division_by_zero<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("5/0=");
    assert_eq!(driver.current_display(), "Math Error");
    assert!(driver.previous_display().is_empty());
    assert_eq!(driver.active_operator(), None);
    assert_eq!(driver.snapshot().phase, Phase::Error);

    driver.advance_ms(1999);
    assert_eq!(driver.current_display(), "Math Error");
    driver.advance_ms(1);
    assert_eq!(driver.current_display(), "0");
    assert_eq!(driver.snapshot().phase, Phase::Idle);

    // Delete trims the error text, and recovery still clears what is left
    driver.enter("5/0=");
    driver.press(KeypadAction::Delete);
    assert_eq!(driver.snapshot().current_operand, "Math Erro");
    assert_eq!(driver.current_display(), "");
    driver.advance_ms(2000);
    assert_eq!(driver.current_display(), "0");

    // An operator takes the error text as its left operand until recovery
    driver.enter("5/0=+");
    assert_eq!(driver.current_display(), "Math Error");
    assert_eq!(driver.active_operator(), Some(Operation::Add));
    driver.advance_ms(2000);
    assert_eq!(driver.current_display(), "0");
    assert_eq!(driver.active_operator(), None);
}

/// Verifies that typing during the error display cancels the recovery
pub fn verify_error_then_typing<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("1/0=");
    driver.enter("7");
    assert_eq!(driver.current_display(), "7");

    driver.advance_ms(2000);
    assert_eq!(driver.current_display(), "7");
    driver.press(KeypadAction::Clear);
}

/// Verifies rounding of floating point results
pub fn verify_rounding<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("0.1+0.2=");
    assert_eq!(driver.current_display(), "0.3");
    driver.press(KeypadAction::Clear);

    driver.enter("1/3=");
    assert_eq!(driver.current_display(), "0.3333333333");
    driver.press(KeypadAction::Clear);
}

/// Verifies percent, delete and clear
pub fn verify_editing<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("50%");
    assert_eq!(driver.current_display(), "0.5");

    driver.press(KeypadAction::Clear);
    driver.enter("123");
    driver.press(KeypadAction::Delete);
    assert_eq!(driver.current_display(), "12");
    driver.press(KeypadAction::Delete);
    driver.press(KeypadAction::Delete);
    assert_eq!(driver.current_display(), "0");

    driver.enter("9+");
    driver.press(KeypadAction::Clear);
    assert_eq!(driver.current_display(), "0");
    assert!(driver.previous_display().is_empty());
    assert_eq!(driver.active_operator(), None);
}

/// Verifies thousands separators on both display lines
pub fn verify_thousands_separators<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);

    driver.enter("1234567");
    assert_eq!(driver.current_display(), "1,234,567");

    driver.enter("-1.5");
    assert_eq!(driver.previous_display(), "1,234,567 −");
    assert_eq!(driver.current_display(), "1.5");
    driver.press(KeypadAction::Clear);
}

/// Verifies the flash cue after a computation
pub fn verify_flash<D: CalculatorDriver>(driver: &mut D) {
    driver.press(KeypadAction::Clear);
    // Let cues from earlier computations run out
    driver.advance_ms(1000);

    driver.enter("1+1");
    assert!(!driver.is_flashing());
    driver.enter("=");
    assert!(driver.is_flashing());
    driver.advance_ms(200);
    assert!(!driver.is_flashing());
    driver.press(KeypadAction::Clear);
}

/// Complete verification suite - runs all scenarios
pub fn run_all_scenarios<D: CalculatorDriver>(driver: &mut D) {
    verify_digit_entry(driver);
    verify_basic_arithmetic(driver);
    verify_chaining(driver);
    verify_operator_swap(driver);
    verify_division_by_zero(driver);
    verify_error_then_typing(driver);
    verify_rounding(driver);
    verify_editing(driver);
    verify_thousands_separators(driver);
    verify_flash(driver);
}
