//! WASM Driver - calculator page on a mock DOM
//!
//! Applies the state machine's effects to [`MockDom`] exactly as the browser
//! binding applies them to the real page, with deferred tasks running on a
//! virtual clock.

use super::dom::{
    DomEvent, MockDom, ACTIVE_CLASS, CURRENT_OPERAND_ID, FLASH_CLASS, OPERATOR_CLASS,
    PREVIOUS_OPERAND_ID,
};
use super::keypad::{Keypad, KeypadAction, MockDomKeypadExt};
use crate::config::CalculatorConfig;
use crate::core::{
    Calculator, CalculatorSnapshot, DeferredTask, Effect, Effects, Operation, TimerQueue,
};
use crate::driver::CalculatorDriver;

/// WASM Driver wrapping calculator, keypad and mock DOM
#[derive(Debug)]
pub struct WasmDriver {
    /// The state machine
    calculator: Calculator,
    /// Mock DOM for testing
    dom: MockDom,
    /// Button layout used to find the key for an action
    keypad: Keypad,
    /// Virtual clock for deferred tasks
    timers: TimerQueue,
}

impl Default for WasmDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmDriver {
    /// Creates a new WASM driver
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::default())
    }

    /// Creates a WASM driver with custom settings
    #[must_use]
    pub fn with_config(config: CalculatorConfig) -> Self {
        let keypad = Keypad::new();
        let mut dom = MockDom::calculator();
        dom.add_keypad(&keypad);

        let mut driver = Self {
            calculator: Calculator::with_config(config),
            dom,
            keypad,
            timers: TimerQueue::new(),
        };
        driver.apply_effects(vec![Effect::Render]);
        driver
    }

    /// Returns a reference to the calculator
    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Returns a reference to the DOM
    #[must_use]
    pub fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Returns the timer queue
    #[must_use]
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Simulates clicking an element; returns false if it is not a key
    pub fn click(&mut self, element_id: &str) -> bool {
        self.dom.dispatch_event(DomEvent::click(element_id));
        let action = self
            .dom
            .get_element(element_id)
            .and_then(KeypadAction::from_element);
        match action {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    /// Simulates a key press; returns false if the key is not mapped
    pub fn press_key(&mut self, key: &str) -> bool {
        self.dom.dispatch_event(DomEvent::key_press(key));
        match Keypad::key_to_action(key) {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    /// Feeds an action into the state machine and applies its effects
    pub fn perform(&mut self, action: KeypadAction) {
        let effects = action.apply(&mut self.calculator);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                Effect::Render => {
                    let text = self.calculator.display();
                    self.dom.set_element_text(CURRENT_OPERAND_ID, &text.current);
                    self.dom.set_element_text(PREVIOUS_OPERAND_ID, &text.previous);
                }
                Effect::MarkOperator(op) => {
                    self.dom.remove_class_where(OPERATOR_CLASS, ACTIVE_CLASS);
                    let target = self
                        .dom
                        .find_by_attr("data-operator", op.token())
                        .map(|e| e.id.clone());
                    if let Some(id) = target {
                        self.dom.add_class(&id, ACTIVE_CLASS);
                    }
                }
                Effect::ClearOperatorMarks => {
                    self.dom.remove_class_where(OPERATOR_CLASS, ACTIVE_CLASS);
                }
                Effect::Flash => self.dom.add_class(CURRENT_OPERAND_ID, FLASH_CLASS),
                Effect::Schedule { delay, task } => {
                    self.timers.schedule(delay, task);
                }
            }
        }
    }

    fn run_task(&mut self, task: DeferredTask) {
        match task {
            DeferredTask::Recover { epoch } => {
                let effects = self.calculator.recover(epoch);
                self.apply_effects(effects);
            }
            DeferredTask::EndFlash => self.dom.remove_class(CURRENT_OPERAND_ID, FLASH_CLASS),
        }
    }

    /// Gets the main display line's text
    #[must_use]
    pub fn current_element_text(&self) -> Option<&str> {
        self.dom.get_element_text(CURRENT_OPERAND_ID)
    }

    /// Gets the upper display line's text
    #[must_use]
    pub fn previous_element_text(&self) -> Option<&str> {
        self.dom.get_element_text(PREVIOUS_OPERAND_ID)
    }
}

impl CalculatorDriver for WasmDriver {
    fn press(&mut self, action: KeypadAction) {
        let id = self
            .keypad
            .find_button_by_action(action)
            .map(|btn| btn.id.clone());
        match id {
            Some(id) => {
                self.click(&id);
            }
            None => self.perform(action),
        }
    }

    fn current_display(&self) -> String {
        self.current_element_text().unwrap_or_default().to_string()
    }

    fn previous_display(&self) -> String {
        self.previous_element_text().unwrap_or_default().to_string()
    }

    fn active_operator(&self) -> Option<Operation> {
        self.dom
            .elements_with_class(OPERATOR_CLASS)
            .into_iter()
            .find(|e| e.has_class(ACTIVE_CLASS))
            .and_then(|e| e.get_attr("data-operator"))
            .and_then(|token| Operation::from_token(token).ok())
    }

    fn is_flashing(&self) -> bool {
        self.dom.has_class(CURRENT_OPERAND_ID, FLASH_CLASS)
    }

    fn advance_ms(&mut self, ms: u64) {
        for task in self.timers.advance_ms(ms) {
            self.run_task(task);
        }
    }

    fn snapshot(&self) -> CalculatorSnapshot {
        self.calculator.snapshot()
    }
}
