//! Typed host components.
//!
//! A node carries a small list of [`Component`]s. Access is typed through
//! [`ComponentType`], so `tree.get::<GridLayout>(id)` reads like the host's
//! own component lookup while the storage stays a plain enum.

use graft_shared::{Language, LocalText, Vec2};

use crate::node::NodeId;
use crate::panel::SettingsPanel;
use crate::widgets::{Button, InputField, SettingDropdown, SettingSlider, SettingToggle};

// =============================================================================
// LAYOUT COMPONENTS
// =============================================================================

/// Padding inside a layout group, in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    /// Left padding.
    pub left: i32,
    /// Right padding.
    pub right: i32,
    /// Top padding.
    pub top: i32,
    /// Bottom padding.
    pub bottom: i32,
}

impl Padding {
    /// Creates padding from its four sides.
    #[must_use]
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Same padding on every side.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Child alignment inside a layout group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Upper left.
    #[default]
    UpperLeft,
    /// Upper center.
    UpperCenter,
    /// Middle left.
    MiddleLeft,
    /// Middle center.
    MiddleCenter,
}

/// How a grid limits its columns or rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridConstraint {
    /// As many columns as fit.
    #[default]
    Flexible,
    /// A fixed number of columns.
    FixedColumnCount,
    /// A fixed number of rows.
    FixedRowCount,
}

/// Grid layout group.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Whether the group drives its children.
    pub enabled: bool,
    /// Size of every cell.
    pub cell_size: Vec2,
    /// Gap between cells.
    pub spacing: Vec2,
    /// Inner padding.
    pub padding: Padding,
    /// Column/row constraint.
    pub constraint: GridConstraint,
    /// Count used by the constraint.
    pub constraint_count: i32,
    /// Child alignment.
    pub child_alignment: Alignment,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            enabled: true,
            cell_size: Vec2::new(100.0, 100.0),
            spacing: Vec2::ZERO,
            padding: Padding::default(),
            constraint: GridConstraint::Flexible,
            constraint_count: 2,
            child_alignment: Alignment::UpperLeft,
        }
    }
}

/// Axis of a linear layout group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Children laid out left to right.
    Horizontal,
    /// Children laid out top to bottom.
    #[default]
    Vertical,
}

/// Horizontal or vertical layout group.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLayout {
    /// Whether the group drives its children.
    pub enabled: bool,
    /// Layout axis.
    pub direction: Direction,
    /// Gap between children.
    pub spacing: f32,
    /// Inner padding.
    pub padding: Padding,
    /// Child alignment.
    pub child_alignment: Alignment,
    /// Group sets child widths.
    pub control_child_width: bool,
    /// Group sets child heights.
    pub control_child_height: bool,
    /// Children expand to fill the width.
    pub force_expand_width: bool,
    /// Children expand to fill the height.
    pub force_expand_height: bool,
}

impl Default for LinearLayout {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: Direction::Vertical,
            spacing: 0.0,
            padding: Padding::default(),
            child_alignment: Alignment::UpperLeft,
            control_child_width: true,
            control_child_height: true,
            force_expand_width: true,
            force_expand_height: true,
        }
    }
}

/// Fit mode of a [`ContentSizeFitter`] axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Leave the axis alone.
    #[default]
    Unconstrained,
    /// Fit to the minimum size.
    MinSize,
    /// Fit to the preferred size.
    PreferredSize,
}

/// Resizes a node to its content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSizeFitter {
    /// Whether the fitter is applied.
    pub enabled: bool,
    /// Horizontal fit.
    pub horizontal: FitMode,
    /// Vertical fit.
    pub vertical: FitMode,
}

impl Default for ContentSizeFitter {
    fn default() -> Self {
        Self {
            enabled: true,
            horizontal: FitMode::Unconstrained,
            vertical: FitMode::PreferredSize,
        }
    }
}

/// Per-node layout overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutElement {
    /// Excluded from parent layout groups.
    pub ignore_layout: bool,
    /// Minimum width.
    pub min_width: Option<f32>,
    /// Minimum height.
    pub min_height: Option<f32>,
    /// Preferred width.
    pub preferred_width: Option<f32>,
    /// Preferred height.
    pub preferred_height: Option<f32>,
    /// Flexible width weight.
    pub flexible_width: Option<f32>,
    /// Flexible height weight.
    pub flexible_height: Option<f32>,
}

// =============================================================================
// TEXT & BOOKKEEPING COMPONENTS
// =============================================================================

/// Text label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    /// Displayed string.
    pub text: String,
    /// Text pair re-resolved on language changes, if bound.
    pub binding: Option<LocalText>,
}

impl Text {
    /// Creates an unbound label.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            binding: None,
        }
    }
}

/// The host's own localization hook, which rewrites a sibling [`Text`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostLocalization {
    /// Host string table key.
    pub key: String,
}

/// Visibility fader used by tab indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fader {
    /// Faded in.
    pub visible: bool,
}

/// Which scene a host controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    /// Main menu controller.
    Menu,
    /// In-game controller.
    Game,
}

/// A host controller that owns a settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    /// Scene kind.
    pub kind: ControllerKind,
    /// The settings panel node, once the host created it.
    pub settings: Option<NodeId>,
}

/// Bookkeeping left on the root of an engine-built control.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlTag {
    /// Position offset currently folded into the anchored position.
    pub applied_offset: Vec2,
}

/// The host's language source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalisationManager {
    /// Language currently selected by the player.
    pub current: Option<Language>,
    /// Default language of the build.
    pub default: Option<Language>,
}

impl LocalisationManager {
    /// The language in effect: current, then default.
    #[must_use]
    pub fn effective(&self) -> Option<Language> {
        self.current.or(self.default)
    }
}

// =============================================================================
// COMPONENT STORAGE
// =============================================================================

/// Typed access to one [`Component`] variant.
pub trait ComponentType: Sized + 'static {
    /// Borrows the payload if `component` is this type.
    fn from_component(component: &Component) -> Option<&Self>;
    /// Mutably borrows the payload if `component` is this type.
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
    /// Moves the payload out if `component` is this type.
    fn take(component: Component) -> Option<Self>;
    /// Wraps a payload.
    fn into_component(self) -> Component;
}

macro_rules! components {
    ($($(#[$meta:meta])* $variant:ident($ty:ty),)*) => {
        /// A component attached to a node.
        #[derive(Debug, Clone)]
        pub enum Component {
            $($(#[$meta])* $variant($ty),)*
        }

        $(
            impl ComponentType for $ty {
                fn from_component(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn take(component: Component) -> Option<Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn into_component(self) -> Component {
                    Component::$variant(self)
                }
            }
        )*
    };
}

components! {
    /// Grid layout group.
    Grid(GridLayout),
    /// Horizontal or vertical layout group.
    Linear(LinearLayout),
    /// Content size fitter.
    SizeFitter(ContentSizeFitter),
    /// Layout overrides.
    Element(LayoutElement),
    /// Text label.
    Text(Text),
    /// Host localization hook.
    HostLocalization(HostLocalization),
    /// Tab indicator fader.
    Fader(Fader),
    /// Scene controller.
    Controller(Controller),
    /// Language source.
    Localisation(LocalisationManager),
    /// Engine control bookkeeping.
    Tag(ControlTag),
    /// Settings panel bookkeeping.
    Panel(SettingsPanel),
    /// Clickable button.
    Button(Button),
    /// Boolean setting widget.
    Toggle(SettingToggle),
    /// Choice setting widget.
    Dropdown(SettingDropdown),
    /// Numeric setting widget.
    Slider(SettingSlider),
    /// Free text input.
    Input(InputField),
}

impl Component {
    /// Returns true for components that position their node's children.
    #[must_use]
    pub const fn is_layout_group(&self) -> bool {
        matches!(self, Self::Grid(_) | Self::Linear(_))
    }

    /// Returns true for components that change layout on their own node.
    #[must_use]
    pub const fn affects_layout(&self) -> bool {
        matches!(self, Self::Grid(_) | Self::Linear(_) | Self::SizeFitter(_))
    }

    /// Enables or disables a layout-affecting component.
    ///
    /// Returns false for components without an enabled switch.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        match self {
            Self::Grid(grid) => grid.enabled = enabled,
            Self::Linear(linear) => linear.enabled = enabled,
            Self::SizeFitter(fitter) => fitter.enabled = enabled,
            _ => return false,
        }
        true
    }

    /// Returns the enabled state, or true for components without one.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::Grid(grid) => grid.enabled,
            Self::Linear(linear) => linear.enabled,
            Self::SizeFitter(fitter) => fitter.enabled,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let mut component = GridLayout::default().into_component();
        assert!(GridLayout::from_component(&component).is_some());
        assert!(Text::from_component(&component).is_none());

        if let Some(grid) = GridLayout::from_component_mut(&mut component) {
            grid.constraint_count = 3;
        }
        let grid = GridLayout::take(component).unwrap();
        assert_eq!(grid.constraint_count, 3);
    }

    #[test]
    fn test_layout_switch() {
        let mut fitter = ContentSizeFitter::default().into_component();
        assert!(fitter.affects_layout());
        assert!(!fitter.is_layout_group());
        assert!(fitter.set_enabled(false));
        assert!(!fitter.is_enabled());

        let mut text = Text::new("x").into_component();
        assert!(!text.set_enabled(false));
        assert!(text.is_enabled());
    }

    #[test]
    fn test_effective_language() {
        let manager = LocalisationManager {
            current: None,
            default: Some(Language::Chinese),
        };
        assert_eq!(manager.effective(), Some(Language::Chinese));
    }
}
