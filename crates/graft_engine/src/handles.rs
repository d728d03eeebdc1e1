//! Live control handles.
//!
//! A handle names one built widget node in a shared tree. Reads lock the
//! tree briefly; interactions commit the new value under the lock and run
//! the widget's listeners after it is released, so a listener may lock the
//! tree again.

use graft_tree::{
    Button, InputField, NodeId, SettingDropdown, SettingSlider, SettingToggle, SharedTree, Text,
};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            tree: SharedTree,
            node: NodeId,
        }

        impl $name {
            pub(crate) fn new(tree: SharedTree, node: NodeId) -> Self {
                Self { tree, node }
            }

            /// Widget node.
            #[must_use]
            pub const fn node(&self) -> NodeId {
                self.node
            }

            /// Returns true while the widget node exists.
            #[must_use]
            pub fn is_alive(&self) -> bool {
                self.tree.lock().contains(self.node)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("node", &self.node)
                    .finish_non_exhaustive()
            }
        }
    };
}

handle!(
    /// A built button.
    ButtonHandle
);
handle!(
    /// A built label.
    LabelHandle
);
handle!(
    /// A built toggle.
    ToggleHandle
);
handle!(
    /// A built dropdown.
    DropdownHandle
);
handle!(
    /// A built slider.
    SliderHandle
);
handle!(
    /// A built text input.
    InputHandle
);

impl ButtonHandle {
    /// Clicks the button. Returns false if it is inactive or not
    /// interactable.
    pub fn click(&self) -> bool {
        let event = self.tree.lock().commit_click(self.node);
        event.map(|event| event.invoke(&())).is_some()
    }

    /// Number of click listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tree
            .lock()
            .get::<Button>(self.node)
            .map_or(0, |button| button.on_click.listener_count())
    }
}

impl LabelHandle {
    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.tree
            .lock()
            .get::<Text>(self.node)
            .map(|label| label.text.clone())
    }
}

impl ToggleHandle {
    /// Current value.
    #[must_use]
    pub fn value(&self) -> Option<bool> {
        self.tree
            .lock()
            .get::<SettingToggle>(self.node)
            .map(|toggle| toggle.value)
    }

    /// Changes the value as the player would.
    pub fn set(&self, value: bool) -> bool {
        let event = self.tree.lock().commit_toggle(self.node, value);
        event.map(|event| event.invoke(&value)).is_some()
    }
}

impl DropdownHandle {
    /// Selected option.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.tree
            .lock()
            .get::<SettingDropdown>(self.node)
            .map(|dropdown| dropdown.value.clone())
    }

    /// Available options.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        self.tree
            .lock()
            .get::<SettingDropdown>(self.node)
            .map(|dropdown| dropdown.options.clone())
            .unwrap_or_default()
    }

    /// Picks an option as the player would. Unknown options are rejected.
    pub fn select(&self, value: &str) -> bool {
        let event = self.tree.lock().commit_dropdown(self.node, value);
        event.map(|event| event.invoke(&value.to_string())).is_some()
    }
}

impl SliderHandle {
    /// Current value.
    #[must_use]
    pub fn value(&self) -> Option<i32> {
        self.tree
            .lock()
            .get::<SettingSlider>(self.node)
            .map(|slider| slider.value)
    }

    /// Bounds in ascending order.
    #[must_use]
    pub fn range(&self) -> Option<(i32, i32)> {
        self.tree
            .lock()
            .get::<SettingSlider>(self.node)
            .map(|slider| (slider.min, slider.max))
    }

    /// Moves the slider as the player would. The value is clamped.
    pub fn set(&self, value: i32) -> bool {
        let committed = self.tree.lock().commit_slider(self.node, value);
        committed
            .map(|(clamped, event)| event.invoke(&clamped))
            .is_some()
    }
}

impl InputHandle {
    /// Current text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.tree
            .lock()
            .get::<InputField>(self.node)
            .map(|input| input.text.clone())
    }

    /// Types `text` and ends the edit as the player would.
    pub fn submit(&self, text: &str) -> bool {
        let event = self.tree.lock().commit_end_edit(self.node, text);
        event.map(|event| event.invoke(&text.to_string())).is_some()
    }
}
