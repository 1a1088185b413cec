//! Calculator keypad: button grid, DOM markup and keyboard mapping
//!
//! Buttons carry the same `data-*` attributes the page markup uses
//! (`data-number`, `data-operator`, `data-action`), so the browser binding
//! and the mock DOM resolve clicks the same way.

use super::dom::{DomElement, MockDom, OPERATOR_CLASS};
use crate::core::{Calculator, Effects, Operation};

/// Attributes a key element may carry, in lookup order
pub const DATA_ATTRS: [&str; 3] = ["data-number", "data-operator", "data-action"];

/// Actions that keypad buttons can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadAction {
    /// Insert a digit (0-9)
    Digit(u8),
    /// Insert a decimal point
    Decimal,
    /// Choose an operation
    Operator(Operation),
    /// Compute the pending operation
    Equals,
    /// Reset everything (AC)
    Clear,
    /// Remove the last typed character (DEL)
    Delete,
    /// Divide the current operand by 100
    Percent,
}

impl KeypadAction {
    /// Returns the operand character this action appends, if any
    #[must_use]
    pub fn digit_token(&self) -> Option<char> {
        match self {
            KeypadAction::Digit(d) => char::from_digit(u32::from(*d), 10),
            KeypadAction::Decimal => Some('.'),
            _ => None,
        }
    }

    /// Returns the button label for this action
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            KeypadAction::Digit(d) => d.to_string(),
            KeypadAction::Decimal => ".".to_string(),
            KeypadAction::Operator(op) => op.glyph().to_string(),
            KeypadAction::Equals => "=".to_string(),
            KeypadAction::Clear => "AC".to_string(),
            KeypadAction::Delete => "DEL".to_string(),
            KeypadAction::Percent => "%".to_string(),
        }
    }

    /// Resolves one `data-*` attribute of a key element
    #[must_use]
    pub fn from_data_attr(name: &str, value: &str) -> Option<Self> {
        match name {
            "data-number" => match value {
                "." => Some(KeypadAction::Decimal),
                _ => value
                    .parse::<u8>()
                    .ok()
                    .filter(|d| *d <= 9)
                    .map(KeypadAction::Digit),
            },
            "data-operator" => Operation::from_token(value).ok().map(KeypadAction::Operator),
            "data-action" => match value {
                "equals" => Some(KeypadAction::Equals),
                "clear" => Some(KeypadAction::Clear),
                "delete" => Some(KeypadAction::Delete),
                "percent" => Some(KeypadAction::Percent),
                _ => None,
            },
            _ => None,
        }
    }

    /// Resolves the action of a key element from its `data-*` attributes
    #[must_use]
    pub fn from_element(element: &DomElement) -> Option<Self> {
        DATA_ATTRS.iter().find_map(|name| {
            element
                .get_attr(name)
                .and_then(|value| Self::from_data_attr(name, value))
        })
    }

    /// Feeds this action into the state machine
    pub fn apply(self, calc: &mut Calculator) -> Effects {
        match self {
            KeypadAction::Digit(_) | KeypadAction::Decimal => match self.digit_token() {
                Some(token) => calc.append_digit(token),
                None => Effects::new(),
            },
            KeypadAction::Operator(op) => calc.choose_operation(op),
            KeypadAction::Equals => calc.compute(),
            KeypadAction::Clear => calc.clear(),
            KeypadAction::Delete => calc.delete_last_char(),
            KeypadAction::Percent => calc.calculate_percent(),
        }
    }
}

/// A single keypad button definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// The action this button performs
    pub action: KeypadAction,
    /// The DOM element ID for this button
    pub id: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
    /// Number of grid columns the button covers
    pub span: usize,
}

impl KeypadButtonDef {
    /// Creates a new single-column button definition
    #[must_use]
    pub fn new(action: KeypadAction, row: usize, col: usize) -> Self {
        let id = match action {
            KeypadAction::Digit(d) => format!("btn-{d}"),
            KeypadAction::Decimal => "btn-decimal".to_string(),
            KeypadAction::Operator(op) => format!("btn-{}", op.name()),
            KeypadAction::Equals => "btn-equals".to_string(),
            KeypadAction::Clear => "btn-clear".to_string(),
            KeypadAction::Delete => "btn-delete".to_string(),
            KeypadAction::Percent => "btn-percent".to_string(),
        };
        Self {
            action,
            id,
            row,
            col,
            span: 1,
        }
    }

    /// Makes the button cover `span` columns
    #[must_use]
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }

    /// Whether the button covers grid cell (`row`, `col`)
    #[must_use]
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row == row && (self.col..self.col + self.span).contains(&col)
    }

    /// Builds the `<button>` element for this definition
    #[must_use]
    pub fn to_element(&self) -> DomElement {
        let elem = DomElement::new("button")
            .with_id(&self.id)
            .with_text(&self.action.label())
            .with_class("btn")
            .with_class(&format!("keypad-row-{}", self.row))
            .with_class(&format!("keypad-col-{}", self.col));

        let elem = match self.action {
            KeypadAction::Digit(_) | KeypadAction::Decimal => {
                elem.with_attr("data-number", &self.action.label())
            }
            KeypadAction::Operator(op) => elem
                .with_class(OPERATOR_CLASS)
                .with_attr("data-operator", op.token()),
            KeypadAction::Equals => elem.with_attr("data-action", "equals"),
            KeypadAction::Clear => elem.with_attr("data-action", "clear"),
            KeypadAction::Delete => elem.with_attr("data-action", "delete"),
            KeypadAction::Percent => elem.with_attr("data-action", "percent"),
        };

        if self.span > 1 {
            elem.with_class(&format!("span-{}", self.span))
        } else {
            elem
        }
    }
}

/// Calculator keypad layout
///
/// ```text
/// [ AC ] [ DEL ] [ % ] [ ÷ ]
/// [ 7  ] [ 8   ] [ 9 ] [ × ]
/// [ 4  ] [ 5   ] [ 6 ] [ − ]
/// [ 1  ] [ 2   ] [ 3 ] [ + ]
/// [ 0          ] [ . ] [ = ]
/// ```
#[derive(Debug, Clone)]
pub struct Keypad {
    /// Button definitions
    buttons: Vec<KeypadButtonDef>,
    /// Number of columns
    cols: usize,
    /// Number of rows
    rows: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    /// Creates the standard keypad
    #[must_use]
    pub fn new() -> Self {
        let buttons = vec![
            // Row 0: AC DEL % ÷
            KeypadButtonDef::new(KeypadAction::Clear, 0, 0),
            KeypadButtonDef::new(KeypadAction::Delete, 0, 1),
            KeypadButtonDef::new(KeypadAction::Percent, 0, 2),
            KeypadButtonDef::new(KeypadAction::Operator(Operation::Divide), 0, 3),
            // Row 1: 7 8 9 ×
            KeypadButtonDef::new(KeypadAction::Digit(7), 1, 0),
            KeypadButtonDef::new(KeypadAction::Digit(8), 1, 1),
            KeypadButtonDef::new(KeypadAction::Digit(9), 1, 2),
            KeypadButtonDef::new(KeypadAction::Operator(Operation::Multiply), 1, 3),
            // Row 2: 4 5 6 −
            KeypadButtonDef::new(KeypadAction::Digit(4), 2, 0),
            KeypadButtonDef::new(KeypadAction::Digit(5), 2, 1),
            KeypadButtonDef::new(KeypadAction::Digit(6), 2, 2),
            KeypadButtonDef::new(KeypadAction::Operator(Operation::Subtract), 2, 3),
            // Row 3: 1 2 3 +
            KeypadButtonDef::new(KeypadAction::Digit(1), 3, 0),
            KeypadButtonDef::new(KeypadAction::Digit(2), 3, 1),
            KeypadButtonDef::new(KeypadAction::Digit(3), 3, 2),
            KeypadButtonDef::new(KeypadAction::Operator(Operation::Add), 3, 3),
            // Row 4: 0 (wide) . =
            KeypadButtonDef::new(KeypadAction::Digit(0), 4, 0).with_span(2),
            KeypadButtonDef::new(KeypadAction::Decimal, 4, 2),
            KeypadButtonDef::new(KeypadAction::Equals, 4, 3),
        ];

        Self {
            buttons,
            cols: 4,
            rows: 5,
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets all button definitions
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Gets the button covering a grid cell
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButtonDef> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.buttons.iter().find(|b| b.covers(row, col))
    }

    /// Finds a button by element ID
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Finds the button that performs `action`
    #[must_use]
    pub fn find_button_by_action(&self, action: KeypadAction) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.action == action)
    }

    /// Creates DOM elements for all keypad buttons
    pub fn create_dom_elements(&self) -> Vec<DomElement> {
        self.buttons.iter().map(KeypadButtonDef::to_element).collect()
    }

    /// Creates a keypad container element with all buttons
    #[must_use]
    pub fn create_keypad_element(&self) -> DomElement {
        self.create_dom_elements().into_iter().fold(
            DomElement::new("div").with_id("calc-keypad").with_class("buttons"),
            DomElement::with_child,
        )
    }

    /// Processes a button click event and returns the action
    #[must_use]
    pub fn handle_click(&self, element_id: &str) -> Option<KeypadAction> {
        self.find_button_by_id(element_id).map(|btn| btn.action)
    }

    /// Maps a `KeyboardEvent.key` value to a keypad action
    #[must_use]
    pub fn key_to_action(key: &str) -> Option<KeypadAction> {
        match key {
            "0" => Some(KeypadAction::Digit(0)),
            "1" => Some(KeypadAction::Digit(1)),
            "2" => Some(KeypadAction::Digit(2)),
            "3" => Some(KeypadAction::Digit(3)),
            "4" => Some(KeypadAction::Digit(4)),
            "5" => Some(KeypadAction::Digit(5)),
            "6" => Some(KeypadAction::Digit(6)),
            "7" => Some(KeypadAction::Digit(7)),
            "8" => Some(KeypadAction::Digit(8)),
            "9" => Some(KeypadAction::Digit(9)),
            "." => Some(KeypadAction::Decimal),
            "+" => Some(KeypadAction::Operator(Operation::Add)),
            "-" => Some(KeypadAction::Operator(Operation::Subtract)),
            "*" => Some(KeypadAction::Operator(Operation::Multiply)),
            "/" => Some(KeypadAction::Operator(Operation::Divide)),
            "Enter" | "=" => Some(KeypadAction::Equals),
            "Backspace" => Some(KeypadAction::Delete),
            "Escape" => Some(KeypadAction::Clear),
            "%" => Some(KeypadAction::Percent),
            _ => None,
        }
    }

    /// Whether the browser default for this key must be suppressed
    ///
    /// Enter would otherwise re-activate the focused button. `=` is consumed
    /// the same way.
    #[must_use]
    pub fn prevents_default(key: &str) -> bool {
        matches!(key, "Enter" | "=")
    }
}

/// Extension trait for MockDom to add keypad
pub trait MockDomKeypadExt {
    /// Adds keypad to an existing calculator DOM
    fn add_keypad(&mut self, keypad: &Keypad);
}

impl MockDomKeypadExt for MockDom {
    fn add_keypad(&mut self, keypad: &Keypad) {
        self.register_element(keypad.create_keypad_element());
    }
}
