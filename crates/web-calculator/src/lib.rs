//! Web Calculator - pocket calculator state machine for the browser
//!
//! The crate is split the way the page is:
//!
//! - [`core`]: the input/compute state machine, display formatting and the
//!   deferred-task clock. Pure Rust, no DOM.
//! - [`wasm`]: keypad layout, effect handling on a mock DOM, and (with the
//!   `wasm` feature) the `wasm-bindgen` binding for the real page.
//! - [`driver`]: one driver trait plus scenario checks that run on every
//!   front end.
//!
//! Every input returns the [`Effects`](core::Effects) the page has to carry
//! out, so the state machine itself never touches a display.
//!
//! # Example
//!
//! ```rust
//! use web_calculator::prelude::*;
//!
//! let mut calc = Calculator::new();
//! calc.append_digit('7');
//! calc.choose_operation(Operation::Multiply);
//! calc.append_digit('6');
//! calc.compute();
//! assert_eq!(calc.display().current, "42");
//!
//! // Division by zero shows an error that clears itself
//! let mut driver = HeadlessDriver::new();
//! driver.enter("1/0=");
//! assert_eq!(driver.current_display(), "Math Error");
//! driver.advance_ms(2000);
//! assert_eq!(driver.current_display(), "0");
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod driver;

/// Web front end - always available for testing
/// (Mock DOM allows testing without actual browser bindings)
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{CalculatorConfig, ConfigError};
    pub use crate::core::{
        CalcError, CalcResult, Calculator, CalculatorSnapshot, DeferredTask, DisplayText, Effect,
        Effects, Operation, Phase, TimerQueue,
    };
    pub use crate::driver::{CalculatorDriver, HeadlessDriver};
    pub use crate::wasm::{DomElement, DomEvent, Keypad, KeypadAction, MockDom, WasmDriver};

    #[cfg(feature = "wasm")]
    pub use crate::wasm::BrowserCalculator;
}
