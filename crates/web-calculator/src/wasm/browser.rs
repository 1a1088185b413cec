//! Browser WASM bindings for the calculator page
//!
//! Applies the state machine's effects to the real document through
//! `web-sys`, and runs deferred tasks with `setTimeout`. A pending timeout
//! holds only a weak reference, so dropping the [`BrowserCalculator`] turns
//! every outstanding task into a no-op.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element};

use crate::config::CalculatorConfig;
use crate::core::{Calculator, DeferredTask, Effect, Effects};
use crate::wasm::dom::{ACTIVE_CLASS, FLASH_CLASS, OPERATOR_CLASS};
use crate::wasm::keypad::{Keypad, KeypadAction, DATA_ATTRS};

/// State shared between the binding and its pending timeouts
#[derive(Debug)]
struct Session {
    calculator: Calculator,
    keypad: Keypad,
    document: Document,
    previous: Element,
    current: Element,
}

impl Session {
    fn apply(&self, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::Render => {
                let text = self.calculator.display();
                self.current.set_text_content(Some(&text.current));
                self.previous.set_text_content(Some(&text.previous));
            }
            Effect::MarkOperator(op) => {
                self.clear_operator_marks()?;
                let selector = format!(".{OPERATOR_CLASS}[data-operator=\"{}\"]", op.token());
                if let Some(button) = self.document.query_selector(&selector)? {
                    button.class_list().add_1(ACTIVE_CLASS)?;
                }
            }
            Effect::ClearOperatorMarks => self.clear_operator_marks()?,
            Effect::Flash => self.current.class_list().add_1(FLASH_CLASS)?,
            // Needs the shared handle, see `apply_effects`
            Effect::Schedule { .. } => {}
        }
        Ok(())
    }

    fn clear_operator_marks(&self) -> Result<(), JsValue> {
        let buttons = self
            .document
            .query_selector_all(&format!(".{OPERATOR_CLASS}"))?;
        for i in 0..buttons.length() {
            if let Some(element) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                element.class_list().remove_1(ACTIVE_CLASS)?;
            }
        }
        Ok(())
    }
}

fn apply_effects(session: &Rc<RefCell<Session>>, effects: Effects) -> Result<(), JsValue> {
    for effect in effects {
        match effect {
            Effect::Schedule { delay, task } => schedule(session, delay, task)?,
            other => session.borrow().apply(other)?,
        }
    }
    Ok(())
}

fn perform(session: &Rc<RefCell<Session>>, action: KeypadAction) -> Result<(), JsValue> {
    let effects = action.apply(&mut session.borrow_mut().calculator);
    apply_effects(session, effects)
}

fn schedule(
    session: &Rc<RefCell<Session>>,
    delay: Duration,
    task: DeferredTask,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let weak = Rc::downgrade(session);
    let callback = Closure::once_into_js(move || {
        if let Some(session) = weak.upgrade() {
            if let Err(err) = run_task(&session, task) {
                console::error_1(&err);
            }
        }
    });
    let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref::<js_sys::Function>(),
        timeout,
    )?;
    Ok(())
}

fn run_task(session: &Rc<RefCell<Session>>, task: DeferredTask) -> Result<(), JsValue> {
    match task {
        DeferredTask::Recover { epoch } => {
            let effects = session.borrow_mut().calculator.recover(epoch);
            apply_effects(session, effects)
        }
        DeferredTask::EndFlash => session.borrow().current.class_list().remove_1(FLASH_CLASS),
    }
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

/// Browser Calculator - the main WASM entry point
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Binds to the two display elements with default settings
    #[wasm_bindgen(constructor)]
    pub fn new(previous_id: &str, current_id: &str) -> Result<BrowserCalculator, JsValue> {
        Self::bind(previous_id, current_id, CalculatorConfig::default())
    }

    /// Binds to the two display elements with settings from JSON
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        previous_id: &str,
        current_id: &str,
        config_json: &str,
    ) -> Result<BrowserCalculator, JsValue> {
        let config = CalculatorConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::bind(previous_id, current_id, config)
    }

    /// Handles a click on the element with this id; returns false if it is
    /// not a key
    #[wasm_bindgen(js_name = handleButton)]
    pub fn handle_button(&self, button_id: &str) -> Result<bool, JsValue> {
        let action = self.session.borrow().keypad.handle_click(button_id);
        self.dispatch(action)
    }

    /// Handles a click on a key element, resolved from its `data-*` attributes
    #[wasm_bindgen(js_name = handleElement)]
    pub fn handle_element(&self, element: &Element) -> Result<bool, JsValue> {
        let action = DATA_ATTRS.iter().find_map(|name| {
            element
                .get_attribute(name)
                .and_then(|value| KeypadAction::from_data_attr(name, &value))
        });
        self.dispatch(action)
    }

    /// Handles a `KeyboardEvent.key` value; returns false if it is not mapped
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> Result<bool, JsValue> {
        self.dispatch(Keypad::key_to_action(key))
    }

    /// Whether the page should call `preventDefault` for this key
    #[wasm_bindgen(js_name = preventsDefault)]
    pub fn prevents_default(key: &str) -> bool {
        Keypad::prevents_default(key)
    }

    /// Text of the main display line
    #[wasm_bindgen(getter, js_name = currentDisplay)]
    pub fn current_display(&self) -> String {
        self.session.borrow().calculator.display().current
    }

    /// Text of the upper display line
    #[wasm_bindgen(getter, js_name = previousDisplay)]
    pub fn previous_display(&self) -> String {
        self.session.borrow().calculator.display().previous
    }

    /// State machine snapshot as JSON
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let snapshot = self.session.borrow().calculator.snapshot();
        serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl BrowserCalculator {
    fn bind(
        previous_id: &str,
        current_id: &str,
        config: CalculatorConfig,
    ) -> Result<BrowserCalculator, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let previous = element_by_id(&document, previous_id)?;
        let current = element_by_id(&document, current_id)?;

        let session = Rc::new(RefCell::new(Session {
            calculator: Calculator::with_config(config),
            keypad: Keypad::new(),
            document,
            previous,
            current,
        }));
        apply_effects(&session, vec![Effect::ClearOperatorMarks, Effect::Render])?;
        Ok(Self { session })
    }

    fn dispatch(&self, action: Option<KeypadAction>) -> Result<bool, JsValue> {
        match action {
            Some(action) => {
                perform(&self.session, action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Initialize the calculator in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"Calculator WASM initialized".into());
}
