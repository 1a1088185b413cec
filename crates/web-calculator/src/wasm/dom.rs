//! Mock DOM for testing the calculator page without a browser
//!
//! Only what the calculator page needs: elements with ids, text, attributes
//! and CSS classes, a flat id registry standing in for `getElementById`, and
//! attribute/class queries standing in for `querySelector(All)`.

use std::collections::BTreeMap;

/// Id of the upper display line (previous operand and operator glyph)
pub const PREVIOUS_OPERAND_ID: &str = "previousOperand";
/// Id of the main display line
pub const CURRENT_OPERAND_ID: &str = "currentOperand";
/// Class carried by every operator key
pub const OPERATOR_CLASS: &str = "btn-operator";
/// Class marking the highlighted operator key
pub const ACTIVE_CLASS: &str = "active";
/// Class added to the main display line while a result flashes
pub const FLASH_CLASS: &str = "flash";

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Element attributes
    pub attributes: BTreeMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Whether element is visible
    pub visible: bool,
    /// Child elements (only used while building; the registry is flat)
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            visible: true,
            children: Vec::new(),
        }
    }

    /// Creates an element with an ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Sets text content
    pub fn set_text(&mut self, text: &str) {
        self.text_content = text.to_string();
    }

    /// Adds a class (no duplicates)
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// DOM events that reach the calculator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Pointer click on an element
    Click {
        /// The ID of the clicked element
        element_id: String,
    },
    /// Key press anywhere on the page
    KeyPress {
        /// The `KeyboardEvent.key` value
        key: String,
    },
}

impl DomEvent {
    /// Creates a click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Creates a key press event
    #[must_use]
    pub fn key_press(key: &str) -> Self {
        Self::KeyPress {
            key: key.to_string(),
        }
    }
}

/// Mock DOM: flat registry of elements by id plus event history
#[derive(Debug, Default)]
pub struct MockDom {
    /// Elements by ID
    elements: BTreeMap<String, DomElement>,
    /// Event history for verification
    event_history: Vec<DomEvent>,
}

impl MockDom {
    /// Creates an empty mock DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the calculator page skeleton: container and both display lines
    ///
    /// Keys are added separately, see
    /// [`MockDomKeypadExt`](crate::wasm::MockDomKeypadExt).
    #[must_use]
    pub fn calculator() -> Self {
        let mut dom = Self::new();

        let display = DomElement::new("div")
            .with_id("display")
            .with_class("display")
            .with_child(
                DomElement::new("div")
                    .with_id(PREVIOUS_OPERAND_ID)
                    .with_class("previous-operand"),
            )
            .with_child(
                DomElement::new("div")
                    .with_id(CURRENT_OPERAND_ID)
                    .with_class("current-operand")
                    .with_text("0"),
            );

        dom.register_element(
            DomElement::new("div")
                .with_id("calculator")
                .with_class("calculator")
                .with_child(display),
        );
        dom
    }

    /// Registers an element and, recursively, its children
    ///
    /// Elements without an id cannot be looked up and are skipped.
    pub fn register_element(&mut self, mut element: DomElement) {
        for child in std::mem::take(&mut element.children) {
            self.register_element(child);
        }
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Number of registered elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no element is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Gets a mutable element by ID
    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DomElement> {
        self.elements.get_mut(id)
    }

    /// Records an event
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.event_history.push(event);
    }

    /// Gets the event history
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Clears event history
    pub fn clear_event_history(&mut self) {
        self.event_history.clear();
    }

    /// Updates element text by ID
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.set_text(text);
        }
    }

    /// Gets element text by ID
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Adds a class to the element with this ID
    pub fn add_class(&mut self, id: &str, class: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.add_class(class);
        }
    }

    /// Removes a class from the element with this ID
    pub fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.remove_class(class);
        }
    }

    /// Checks whether the element with this ID has a class
    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Removes `class` from every element matching `selector_class`
    /// (`querySelectorAll('.selector').forEach(el => el.classList.remove(class))`)
    pub fn remove_class_where(&mut self, selector_class: &str, class: &str) {
        for elem in self.elements.values_mut() {
            if elem.has_class(selector_class) {
                elem.remove_class(class);
            }
        }
    }

    /// All elements carrying a class, in id order
    #[must_use]
    pub fn elements_with_class(&self, class: &str) -> Vec<&DomElement> {
        self.elements.values().filter(|e| e.has_class(class)).collect()
    }

    /// First element whose attribute `key` equals `value`
    /// (`querySelector('[key="value"]')`)
    #[must_use]
    pub fn find_by_attr(&self, key: &str, value: &str) -> Option<&DomElement> {
        self.elements.values().find(|e| e.get_attr(key) == Some(value))
    }
}
