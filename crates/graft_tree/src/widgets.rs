//! Host widgets and their change events.
//!
//! Widgets only store state and listeners. Interaction goes through the
//! `commit_*` methods on [`UiTree`], which apply the new value and hand back
//! the event to fire, so a caller holding a shared tree can release the lock
//! before listeners run. The `change_*` helpers do both in one call.

use std::fmt;
use std::sync::Arc;

use graft_shared::constants::SLIDER_VALUE;

use crate::component::Text;
use crate::node::NodeId;
use crate::tree::UiTree;

/// A change listener.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered listener list.
pub struct Event<T> {
    listeners: Vec<Listener<T>>,
}

impl<T> Event<T> {
    /// Creates an event without listeners.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Appends a listener.
    pub fn add_listener(&mut self, listener: impl Fn(&T) + Send + Sync + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    /// Drops every listener.
    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Number of listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Calls every listener in registration order.
    pub fn invoke(&self, value: &T) {
        for listener in &self.listeners {
            listener(value);
        }
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Clickable button.
#[derive(Debug, Clone)]
pub struct Button {
    /// Accepts clicks.
    pub interactable: bool,
    /// Fired on click.
    pub on_click: Event<()>,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            interactable: true,
            on_click: Event::new(),
        }
    }
}

/// Boolean setting widget.
#[derive(Debug, Clone, Default)]
pub struct SettingToggle {
    /// Preference key.
    pub key: String,
    /// Value restored on reset.
    pub default: bool,
    /// Current value.
    pub value: bool,
    /// Fired when the player changes the value.
    pub on_changed: Event<bool>,
}

/// Single-choice setting widget over string options.
#[derive(Debug, Clone, Default)]
pub struct SettingDropdown {
    /// Preference key.
    pub key: String,
    /// Available options.
    pub options: Vec<String>,
    /// Value restored on reset.
    pub default: String,
    /// Current value.
    pub value: String,
    /// Fired when the player picks an option.
    pub on_changed: Event<String>,
}

impl SettingDropdown {
    /// Replaces the option list.
    pub fn populate_options(&mut self, options: Vec<String>) {
        self.options = options;
    }

    /// Index of `value` in the option list.
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|option| option == value)
    }
}

/// Integer slider setting widget.
#[derive(Debug, Clone, Default)]
pub struct SettingSlider {
    /// Preference key.
    pub key: String,
    /// Lower bound.
    pub min: i32,
    /// Upper bound.
    pub max: i32,
    /// Value restored on reset.
    pub default: i32,
    /// Current value.
    pub value: i32,
    /// Fired when the player moves the slider.
    pub on_changed: Event<i32>,
}

impl SettingSlider {
    /// Clamps `value` into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min.min(self.max), self.max.max(self.min))
    }
}

/// Free text input.
#[derive(Debug, Clone)]
pub struct InputField {
    /// Accepts edits.
    pub enabled: bool,
    /// Current text.
    pub text: String,
    /// Fired on every keystroke.
    pub on_value_changed: Event<String>,
    /// Fired when editing ends.
    pub on_end_edit: Event<String>,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            enabled: true,
            text: String::new(),
            on_value_changed: Event::new(),
            on_end_edit: Event::new(),
        }
    }
}

// =============================================================================
// INTERACTION
// =============================================================================

impl UiTree {
    /// Returns the click event of an interactable, active button.
    #[must_use]
    pub fn commit_click(&self, id: NodeId) -> Option<Event<()>> {
        if !self.is_active_in_hierarchy(id) {
            return None;
        }
        let button = self.get::<Button>(id)?;
        button.interactable.then(|| button.on_click.clone())
    }

    /// Sets a toggle value and returns its change event.
    pub fn commit_toggle(&mut self, id: NodeId, value: bool) -> Option<Event<bool>> {
        let toggle = self.get_mut::<SettingToggle>(id)?;
        toggle.value = value;
        Some(toggle.on_changed.clone())
    }

    /// Selects a dropdown option and returns its change event.
    ///
    /// Values outside the option list are rejected.
    pub fn commit_dropdown(&mut self, id: NodeId, value: &str) -> Option<Event<String>> {
        let dropdown = self.get_mut::<SettingDropdown>(id)?;
        dropdown.index_of(value)?;
        dropdown.value = value.to_string();
        Some(dropdown.on_changed.clone())
    }

    /// Moves a slider and returns the clamped value with its change event.
    pub fn commit_slider(&mut self, id: NodeId, value: i32) -> Option<(i32, Event<i32>)> {
        let slider = self.get_mut::<SettingSlider>(id)?;
        let clamped = slider.clamp(value);
        slider.value = clamped;
        let event = slider.on_changed.clone();
        self.display_slider_value(id);
        Some((clamped, event))
    }

    /// Finishes an edit and returns the end-edit event.
    pub fn commit_end_edit(&mut self, id: NodeId, text: &str) -> Option<Event<String>> {
        let input = self.get_mut::<InputField>(id)?;
        if !input.enabled {
            return None;
        }
        input.text = text.to_string();
        Some(input.on_end_edit.clone())
    }

    /// Clicks a button. Returns false if nothing fired.
    pub fn click(&mut self, id: NodeId) -> bool {
        self.commit_click(id).map(|event| event.invoke(&())).is_some()
    }

    /// Changes a toggle as the player would.
    pub fn change_toggle(&mut self, id: NodeId, value: bool) -> bool {
        self.commit_toggle(id, value)
            .map(|event| event.invoke(&value))
            .is_some()
    }

    /// Changes a dropdown as the player would.
    pub fn change_dropdown(&mut self, id: NodeId, value: &str) -> bool {
        self.commit_dropdown(id, value)
            .map(|event| event.invoke(&value.to_string()))
            .is_some()
    }

    /// Changes a slider as the player would.
    pub fn change_slider(&mut self, id: NodeId, value: i32) -> bool {
        self.commit_slider(id, value)
            .map(|(clamped, event)| event.invoke(&clamped))
            .is_some()
    }

    /// Edits an input field as the player would.
    pub fn end_edit(&mut self, id: NodeId, text: &str) -> bool {
        self.commit_end_edit(id, text)
            .map(|event| event.invoke(&text.to_string()))
            .is_some()
    }

    /// Writes a slider's value into its `Value` label, if it has one.
    pub fn display_slider_value(&mut self, id: NodeId) {
        let Some(value) = self.get::<SettingSlider>(id).map(|slider| slider.value) else {
            return;
        };
        let label = self
            .find_descendant(id, SLIDER_VALUE)
            .and_then(|node| self.find_in_children::<Text>(node));
        if let Some(text) = label.and_then(|node| self.get_mut::<Text>(node)) {
            text.text = value.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_shared::Vec2;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_event_order_and_clear() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut event = Event::<i32>::new();
        let first = Arc::clone(&seen);
        event.add_listener(move |v| first.lock().push(("a", *v)));
        let second = Arc::clone(&seen);
        event.add_listener(move |v| second.lock().push(("b", *v)));

        event.invoke(&7);
        assert_eq!(*seen.lock(), vec![("a", 7), ("b", 7)]);

        event.remove_all_listeners();
        event.invoke(&8);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_slider_clamps_and_displays() {
        let mut tree = UiTree::new();
        let root = tree.create_root("Slider", Vec2::new(300.0, 60.0));
        let value = tree.create_child(root, "Value").unwrap();
        tree.insert(value, Text::new("0"));
        tree.insert(
            root,
            SettingSlider {
                key: "k".into(),
                min: 0,
                max: 10,
                ..SettingSlider::default()
            },
        );

        let fired = Arc::new(AtomicI32::new(-1));
        let sink = Arc::clone(&fired);
        tree.get_mut::<SettingSlider>(root)
            .unwrap()
            .on_changed
            .add_listener(move |v| sink.store(*v, Ordering::SeqCst));

        assert!(tree.change_slider(root, 42));
        assert_eq!(fired.load(Ordering::SeqCst), 10);
        assert_eq!(tree.get::<Text>(value).unwrap().text, "10");
    }

    #[test]
    fn test_dropdown_rejects_unknown_option() {
        let mut tree = UiTree::new();
        let root = tree.create_root("Dropdown", Vec2::new(300.0, 60.0));
        tree.insert(
            root,
            SettingDropdown {
                options: vec!["Low".into(), "High".into()],
                value: "Low".into(),
                ..SettingDropdown::default()
            },
        );

        assert!(!tree.change_dropdown(root, "Ultra"));
        assert!(tree.change_dropdown(root, "High"));
        assert_eq!(tree.get::<SettingDropdown>(root).unwrap().value, "High");
    }

    #[test]
    fn test_inactive_button_ignores_clicks() {
        let mut tree = UiTree::new();
        let root = tree.create_root("Root", Vec2::new(100.0, 100.0));
        let button = tree.create_child(root, "Button").unwrap();
        tree.insert(button, Button::default());

        assert!(tree.click(button));
        tree.set_active(root, false);
        assert!(!tree.click(button));
    }
}
