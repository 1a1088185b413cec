//! Web front end for the calculator
//!
//! The keypad and effect handling compile everywhere and are tested against a
//! mock DOM; the `wasm` feature adds the real browser binding.

#[cfg(feature = "wasm")]
mod browser;
pub mod dom;
mod driver;
mod keypad;

#[cfg(feature = "wasm")]
pub use browser::BrowserCalculator;
pub use dom::{DomElement, DomEvent, MockDom};
pub use driver::WasmDriver;
pub use keypad::{Keypad, KeypadAction, KeypadButtonDef, MockDomKeypadExt, DATA_ATTRS};
