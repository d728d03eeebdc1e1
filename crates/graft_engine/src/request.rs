//! # Control Requests
//!
//! Declarative descriptions of the controls a tab wants, plus the
//! [`UiRef`] cell through which callers receive the live control once it
//! has been built.
//!
//! ```text
//! ToggleSpec::new("fx", "Settings_Fx", title, true)     (declare)
//!        │
//!        ▼
//! SettingsTab::create_toggle ──> ControlRequest::Toggle  (register)
//!        │                              │
//!        ▼                              ▼ every rebuild
//! UiRef<ToggleHandle> <──────── builders::build_control  (bind)
//! ```

use std::fmt;
use std::sync::Arc;

use graft_shared::{LocalText, Vec2};
use parking_lot::Mutex;

use crate::handles::{
    ButtonHandle, DropdownHandle, InputHandle, LabelHandle, SliderHandle, ToggleHandle,
};

/// Click callback.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// Value-change callback.
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

// =============================================================================
// KINDS & COMMON FIELDS
// =============================================================================

/// Control archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Clickable button.
    Button,
    /// Static text.
    Label,
    /// Boolean setting.
    Toggle,
    /// Choice over string options.
    Dropdown,
    /// Integer range setting.
    Slider,
    /// Free text setting.
    Input,
}

impl ControlKind {
    /// Prefix of generated ids.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Label => "Label",
            Self::Toggle => "Toggle",
            Self::Dropdown => "Dropdown",
            Self::Slider => "Slider",
            Self::Input => "Input",
        }
    }

    /// A fresh `<Kind>_<uuid>` id.
    #[must_use]
    pub fn generate_id(self) -> String {
        format!("{}_{}", self.name(), uuid::Uuid::new_v4().simple())
    }
}

/// Fields every control request carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlCommon {
    /// Stable id, also the node name of the built control.
    pub id: String,
    /// Built into in-game panels too.
    pub show_in_game: bool,
    /// Preferred size. Declaring one switches the tab to row packing.
    pub preferred_size: Option<Vec2>,
    /// Added to the anchored position of the built control.
    pub position_offset: Option<Vec2>,
}

impl ControlCommon {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            show_in_game: true,
            preferred_size: None,
            position_offset: None,
        }
    }
}

/// Builder setters shared by every spec.
pub trait ControlSpec: Sized {
    /// Common fields.
    fn common(&self) -> &ControlCommon;

    /// Mutable common fields.
    fn common_mut(&mut self) -> &mut ControlCommon;

    /// Sets whether the control appears in in-game panels.
    #[must_use]
    fn show_in_game(mut self, show: bool) -> Self {
        self.common_mut().show_in_game = show;
        self
    }

    /// Sets the preferred size.
    #[must_use]
    fn preferred_size(mut self, size: Vec2) -> Self {
        self.common_mut().preferred_size = Some(size);
        self
    }

    /// Sets the position offset.
    #[must_use]
    fn position_offset(mut self, offset: Vec2) -> Self {
        self.common_mut().position_offset = Some(offset);
        self
    }
}

macro_rules! impl_spec {
    ($($spec:ty),* $(,)?) => {
        $(
            impl ControlSpec for $spec {
                fn common(&self) -> &ControlCommon {
                    &self.common
                }

                fn common_mut(&mut self) -> &mut ControlCommon {
                    &mut self.common
                }
            }
        )*
    };
}

// =============================================================================
// SPECS
// =============================================================================

/// A button.
#[derive(Clone)]
pub struct ButtonSpec {
    /// Common fields.
    pub common: ControlCommon,
    /// Caption.
    pub text: LocalText,
    /// Click callback.
    pub on_click: Option<Action>,
}

impl ButtonSpec {
    /// Creates a button without a callback.
    #[must_use]
    pub fn new(id: impl Into<String>, text: LocalText) -> Self {
        Self {
            common: ControlCommon::new(id),
            text,
            on_click: None,
        }
    }

    /// Sets the click callback.
    #[must_use]
    pub fn on_click(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(action));
        self
    }
}

/// A static label.
#[derive(Debug, Clone)]
pub struct LabelSpec {
    /// Common fields.
    pub common: ControlCommon,
    /// Text.
    pub text: LocalText,
}

impl LabelSpec {
    /// Creates a label.
    #[must_use]
    pub fn new(id: impl Into<String>, text: LocalText) -> Self {
        Self {
            common: ControlCommon::new(id),
            text,
        }
    }
}

/// A persisted boolean.
#[derive(Clone)]
pub struct ToggleSpec {
    /// Common fields.
    pub common: ControlCommon,
    /// Preference key. Empty disables persistence.
    pub key: String,
    /// Title.
    pub title: LocalText,
    /// Value used when nothing is stored.
    pub initial: bool,
    /// Change callback.
    pub on_changed: Option<Callback<bool>>,
}

impl ToggleSpec {
    /// Creates a toggle.
    #[must_use]
    pub fn new(id: impl Into<String>, key: impl Into<String>, title: LocalText, initial: bool) -> Self {
        Self {
            common: ControlCommon::new(id),
            key: key.into(),
            title,
            initial,
            on_changed: None,
        }
    }

    /// Sets the change callback.
    #[must_use]
    pub fn on_changed(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_changed = Some(Arc::new(callback));
        self
    }
}

/// A persisted choice among string options.
#[derive(Clone)]
pub struct DropdownSpec {
    /// Common fields.
    pub common: ControlCommon,
    /// Preference key. Empty disables persistence.
    pub key: String,
    /// Title.
    pub title: LocalText,
    /// Options in display order.
    pub options: Vec<String>,
    /// Value used when nothing valid is stored.
    pub initial: String,
    /// Change callback.
    pub on_changed: Option<Callback<String>>,
}

impl DropdownSpec {
    /// Creates a dropdown.
    #[must_use]
    pub fn new<I, S>(
        id: impl Into<String>,
        key: impl Into<String>,
        title: LocalText,
        options: I,
        initial: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            common: ControlCommon::new(id),
            key: key.into(),
            title,
            options: options.into_iter().map(Into::into).collect(),
            initial: initial.into(),
            on_changed: None,
        }
    }

    /// Sets the change callback.
    #[must_use]
    pub fn on_changed(mut self, callback: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_changed = Some(Arc::new(callback));
        self
    }
}

/// A persisted integer in a range.
#[derive(Clone)]
pub struct SliderSpec {
    /// Common fields.
    pub common: ControlCommon,
    /// Preference key. Empty disables persistence.
    pub key: String,
    /// Title.
    pub title: LocalText,
    /// One bound.
    pub min: i32,
    /// Other bound.
    pub max: i32,
    /// Value used when nothing is stored.
    pub initial: i32,
    /// Change callback.
    pub on_changed: Option<Callback<i32>>,
}

impl SliderSpec {
    /// Creates a slider. Reversed bounds are accepted.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        title: LocalText,
        min: i32,
        max: i32,
        initial: i32,
    ) -> Self {
        Self {
            common: ControlCommon::new(id),
            key: key.into(),
            title,
            min,
            max,
            initial,
            on_changed: None,
        }
    }

    /// Bounds in ascending order.
    #[must_use]
    pub fn bounds(&self) -> (i32, i32) {
        (self.min.min(self.max), self.min.max(self.max))
    }

    /// Sets the change callback.
    #[must_use]
    pub fn on_changed(mut self, callback: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.on_changed = Some(Arc::new(callback));
        self
    }
}

/// A persisted free-text value.
#[derive(Clone)]
pub struct InputSpec {
    /// Common fields.
    pub common: ControlCommon,
    /// Preference key. Empty disables persistence.
    pub key: String,
    /// Title.
    pub title: LocalText,
    /// Value used when nothing is stored.
    pub initial: String,
    /// Called when editing ends.
    pub on_changed: Option<Callback<String>>,
}

impl InputSpec {
    /// Creates a text input.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        title: LocalText,
        initial: impl Into<String>,
    ) -> Self {
        Self {
            common: ControlCommon::new(id),
            key: key.into(),
            title,
            initial: initial.into(),
            on_changed: None,
        }
    }

    /// Sets the change callback.
    #[must_use]
    pub fn on_changed(mut self, callback: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_changed = Some(Arc::new(callback));
        self
    }
}

impl_spec!(ButtonSpec, LabelSpec, ToggleSpec, DropdownSpec, SliderSpec, InputSpec);

macro_rules! opaque_debug {
    ($($spec:ident { $($field:ident),* }),* $(,)?) => {
        $(
            impl fmt::Debug for $spec {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($spec))
                        .field("common", &self.common)
                        $(.field(stringify!($field), &self.$field))*
                        .finish_non_exhaustive()
                }
            }
        )*
    };
}

opaque_debug! {
    ButtonSpec { text },
    ToggleSpec { key, initial },
    DropdownSpec { key, options, initial },
    SliderSpec { key, min, max, initial },
    InputSpec { key, initial },
}

// =============================================================================
// UI REFERENCE
// =============================================================================

type ReadyListener<H> = Arc<dyn Fn(&H) + Send + Sync>;

struct RefState<H> {
    value: Option<H>,
    listeners: Vec<ReadyListener<H>>,
}

/// Late-bound reference to a built control.
///
/// Holds the handle from the most recent build. Ready listeners run on
/// every bind, including rebuilds into new panels; a listener added after
/// the first bind runs immediately.
pub struct UiRef<H> {
    state: Arc<Mutex<RefState<H>>>,
}

impl<H: Clone + Send + 'static> UiRef<H> {
    /// Creates an unbound reference.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RefState {
                value: None,
                listeners: Vec::new(),
            })),
        }
    }

    /// Handle from the most recent build.
    #[must_use]
    pub fn get(&self) -> Option<H> {
        self.state.lock().value.clone()
    }

    /// Returns true once the control was built at least once.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.lock().value.is_some()
    }

    /// Registers a ready listener.
    pub fn on_ready(&self, listener: impl Fn(&H) + Send + Sync + 'static) {
        let listener: ReadyListener<H> = Arc::new(listener);
        let current = {
            let mut state = self.state.lock();
            state.listeners.push(Arc::clone(&listener));
            state.value.clone()
        };
        if let Some(value) = current {
            listener(&value);
        }
    }

    /// Stores a freshly built handle. Listeners run when the returned
    /// notice is fired, which callers do after releasing their locks.
    pub(crate) fn set(&self, value: H) -> ReadyNotice {
        let listeners = {
            let mut state = self.state.lock();
            state.value = Some(value.clone());
            state.listeners.clone()
        };
        ReadyNotice(Box::new(move || {
            for listener in &listeners {
                listener(&value);
            }
        }))
    }
}

impl<H: Clone + Send + 'static> Default for UiRef<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for UiRef<H> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<H> fmt::Debug for UiRef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("UiRef")
            .field("ready", &state.value.is_some())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Ready listeners waiting to run.
#[must_use = "ready listeners only run when the notice is fired"]
pub struct ReadyNotice(Box<dyn FnOnce() + Send>);

impl ReadyNotice {
    /// Runs the listeners.
    pub fn fire(self) {
        (self.0)();
    }
}

impl fmt::Debug for ReadyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReadyNotice")
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A registered control request and the reference its builds feed.
#[derive(Debug, Clone)]
pub enum ControlRequest {
    /// Button.
    Button(ButtonSpec, UiRef<ButtonHandle>),
    /// Label.
    Label(LabelSpec, UiRef<LabelHandle>),
    /// Toggle.
    Toggle(ToggleSpec, UiRef<ToggleHandle>),
    /// Dropdown.
    Dropdown(DropdownSpec, UiRef<DropdownHandle>),
    /// Slider.
    Slider(SliderSpec, UiRef<SliderHandle>),
    /// Text input.
    Input(InputSpec, UiRef<InputHandle>),
}

impl ControlRequest {
    /// Archetype.
    #[must_use]
    pub const fn kind(&self) -> ControlKind {
        match self {
            Self::Button(..) => ControlKind::Button,
            Self::Label(..) => ControlKind::Label,
            Self::Toggle(..) => ControlKind::Toggle,
            Self::Dropdown(..) => ControlKind::Dropdown,
            Self::Slider(..) => ControlKind::Slider,
            Self::Input(..) => ControlKind::Input,
        }
    }

    /// Common fields.
    #[must_use]
    pub fn common(&self) -> &ControlCommon {
        match self {
            Self::Button(spec, _) => spec.common(),
            Self::Label(spec, _) => spec.common(),
            Self::Toggle(spec, _) => spec.common(),
            Self::Dropdown(spec, _) => spec.common(),
            Self::Slider(spec, _) => spec.common(),
            Self::Input(spec, _) => spec.common(),
        }
    }

    pub(crate) fn common_mut(&mut self) -> &mut ControlCommon {
        match self {
            Self::Button(spec, _) => spec.common_mut(),
            Self::Label(spec, _) => spec.common_mut(),
            Self::Toggle(spec, _) => spec.common_mut(),
            Self::Dropdown(spec, _) => spec.common_mut(),
            Self::Slider(spec, _) => spec.common_mut(),
            Self::Input(spec, _) => spec.common_mut(),
        }
    }

    /// Stable id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.common().id
    }

    /// Preferred size, if declared.
    #[must_use]
    pub fn preferred_size(&self) -> Option<Vec2> {
        self.common().preferred_size
    }

    /// Returns true if the control is built into a panel of this kind.
    #[must_use]
    pub fn visible_in(&self, in_game: bool) -> bool {
        !in_game || self.common().show_in_game
    }

    /// Replaces a blank id with a generated one.
    pub(crate) fn ensure_id(&mut self) {
        if self.common().id.trim().is_empty() {
            let id = self.kind().generate_id();
            self.common_mut().id = id;
        }
    }
}
