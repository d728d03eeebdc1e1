//! A host settings panel built in memory.
//!
//! Mirrors the layout of the host's real settings UI so discovery, packing
//! and bridging can be exercised end to end:
//!
//! ```text
//! MenuCanvas                    LocalisationManager
//! ├── UISettings                SettingsPanel
//! │   └── Window
//! │       └── Content
//! │           ├── Tabs
//! │           │   ├── Tab_General   Button, Text, Indicator
//! │           │   └── Tab_Audio
//! │           ├── SettingsSection
//! │           │   ├── Sec_General
//! │           │   └── Sec_Audio     GridLayout, ContentSizeFitter
//! │           │       ├── MasterVolume   SettingSlider
//! │           │       ├── Microphone     SettingDropdown
//! │           │       └── PushToTalk     SettingToggle
//! │           └── ButtonContainer
//! │               └── Close          Button
//! └── MenuController            Controller { settings: UISettings }
//! ```

use graft_shared::{Language, Vec2};

use crate::component::{
    Alignment, ContentSizeFitter, Controller, ControllerKind, Fader, GridConstraint, GridLayout,
    HostLocalization, LocalisationManager, Padding, Text,
};
use crate::geometry::RectTransform;
use crate::node::NodeId;
use crate::panel::{SectionList, SectionRecord, SettingsPanel};
use crate::tree::UiTree;
use crate::widgets::{Button, InputField, SettingDropdown, SettingSlider, SettingToggle};

/// Knobs for [`HostFixture::build`].
#[derive(Debug, Clone)]
pub struct FixtureOptions {
    /// Controller to create, `None` for a panel without one.
    pub controller: Option<ControllerKind>,
    /// Keep section records in fixed-size storage.
    pub fixed_sections: bool,
    /// Put a grid layout on the reference section.
    pub with_grid: bool,
    /// Name of a template node to leave out.
    pub omit: Option<&'static str>,
    /// Language source attached to the canvas.
    pub language: Option<Language>,
    /// Canvas size.
    pub canvas: Vec2,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            controller: Some(ControllerKind::Menu),
            fixed_sections: false,
            with_grid: true,
            omit: None,
            language: Some(Language::English),
            canvas: Vec2::new(1920.0, 1080.0),
        }
    }
}

impl FixtureOptions {
    /// An in-game panel.
    #[must_use]
    pub fn in_game() -> Self {
        Self {
            controller: Some(ControllerKind::Game),
            ..Self::default()
        }
    }
}

/// Node ids of a built host panel.
#[derive(Debug, Clone, Copy)]
pub struct HostFixture {
    /// Canvas root.
    pub root: NodeId,
    /// Controller node, if created.
    pub controller: Option<NodeId>,
    /// Settings panel node.
    pub settings: NodeId,
    /// Content region.
    pub content: NodeId,
    /// Tabs container.
    pub tabs: NodeId,
    /// Sections container.
    pub sections: NodeId,
    /// Built-in general tab.
    pub tab_general: NodeId,
    /// Built-in general section.
    pub sec_general: NodeId,
    /// Built-in audio tab.
    pub tab_audio: NodeId,
    /// Reference section.
    pub sec_audio: Option<NodeId>,
    /// Slider reference.
    pub slider: Option<NodeId>,
    /// Dropdown reference.
    pub dropdown: Option<NodeId>,
    /// Toggle reference.
    pub toggle: Option<NodeId>,
    /// Close button reference.
    pub close: Option<NodeId>,
}

/// Horizontal inset of the reference controls inside their section.
pub const FIXTURE_CONTROL_INSET: f32 = 45.0;

/// Grid padding on the reference section.
pub const FIXTURE_GRID_PADDING: Padding = Padding::new(24, 24, 18, 18);

impl HostFixture {
    /// Builds a host panel into `tree`.
    ///
    /// # Panics
    ///
    /// Panics if the tree rejects a node, which only happens if `tree` is
    /// corrupted.
    #[must_use]
    pub fn build(tree: &mut UiTree, options: &FixtureOptions) -> Self {
        let canvas_name = match options.controller {
            Some(ControllerKind::Game) => "GameCanvas",
            _ => "MenuCanvas",
        };
        let root = tree.create_root(canvas_name, options.canvas);
        if let Some(language) = options.language {
            tree.insert(
                root,
                LocalisationManager {
                    current: Some(language),
                    default: Some(Language::English),
                },
            );
        }

        let settings = node(tree, root, "UISettings", RectTransform::fill());
        let window = node(tree, settings, "Window", centered(Vec2::new(1100.0, 860.0)));
        let content = node(tree, window, "Content", RectTransform::fill());

        let tabs = node(tree, content, "Tabs", RectTransform::top_strip(0.0, 60.0));
        let sections = node(tree, content, "SettingsSection", stretched(80.0, 70.0));

        let (tab_general, general_indicator) = tab(tree, tabs, "Tab_General", "General");
        let (tab_audio, audio_indicator) = tab(tree, tabs, "Tab_Audio", "Audio");

        let sec_general = node(tree, sections, "Sec_General", section_rect());
        let language_row = node(tree, sec_general, "Language", control_rect(0.0));
        title(tree, language_row, "Language", "SETTINGS_LANGUAGE");

        let sec_audio = optional(options, "Sec_Audio")
            .then(|| build_audio_section(tree, sections, options));
        if let Some(audio) = sec_audio.as_ref() {
            tree.set_active(audio.section, false);
        }

        let container = node(tree, content, "ButtonContainer", bottom_strip(60.0));
        let close = optional(options, "Close").then(|| {
            let close = node(tree, container, "Close", centered(Vec2::new(200.0, 50.0)));
            tree.insert(close, Button::default());
            let label = node(tree, close, "Text", RectTransform::fill());
            tree.insert(label, Text::new("Close"));
            tree.insert(label, HostLocalization { key: "SETTINGS_CLOSE".into() });
            close
        });

        let mut records = vec![SectionRecord {
            section: sec_general,
            tab_button: tab_general,
            indicator: Some(general_indicator),
        }];
        if let Some(audio) = sec_audio.as_ref() {
            records.push(SectionRecord {
                section: audio.section,
                tab_button: tab_audio,
                indicator: Some(audio_indicator),
            });
        }
        let list = if options.fixed_sections {
            SectionList::Fixed(records.into_boxed_slice())
        } else {
            SectionList::Growable(records)
        };
        tree.insert(settings, SettingsPanel::new(list));

        let controller = options
            .controller
            .map(|kind| Self::attach_controller(tree, root, settings, kind));

        Self {
            root,
            controller,
            settings,
            content,
            tabs,
            sections,
            tab_general,
            sec_general,
            tab_audio,
            sec_audio: sec_audio.as_ref().map(|audio| audio.section),
            slider: sec_audio.as_ref().and_then(|audio| audio.slider),
            dropdown: sec_audio.as_ref().and_then(|audio| audio.dropdown),
            toggle: sec_audio.as_ref().and_then(|audio| audio.toggle),
            close,
        }
    }

    /// Adds a controller that points at `settings`, as the host does once
    /// its scene finished loading.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not alive.
    pub fn attach_controller(
        tree: &mut UiTree,
        root: NodeId,
        settings: NodeId,
        kind: ControllerKind,
    ) -> NodeId {
        let name = match kind {
            ControllerKind::Menu => "MenuController",
            ControllerKind::Game => "GameController",
        };
        let controller = node(tree, root, name, RectTransform::fill());
        tree.insert(
            controller,
            Controller {
                kind,
                settings: Some(settings),
            },
        );
        controller
    }
}

struct AudioSection {
    section: NodeId,
    slider: Option<NodeId>,
    dropdown: Option<NodeId>,
    toggle: Option<NodeId>,
}

fn build_audio_section(tree: &mut UiTree, sections: NodeId, options: &FixtureOptions) -> AudioSection {
    let section = node(tree, sections, "Sec_Audio", section_rect());
    if options.with_grid {
        tree.insert(
            section,
            GridLayout {
                enabled: true,
                cell_size: Vec2::new(420.0, 64.0),
                spacing: Vec2::new(16.0, 12.0),
                padding: FIXTURE_GRID_PADDING,
                constraint: GridConstraint::FixedColumnCount,
                constraint_count: 2,
                child_alignment: Alignment::UpperCenter,
            },
        );
    }
    tree.insert(section, ContentSizeFitter::default());

    let slider = optional(options, "MasterVolume").then(|| {
        let root = node(tree, section, "MasterVolume", control_rect(-18.0));
        tree.insert(
            root,
            SettingSlider {
                key: "Settings_MasterVolume".into(),
                min: 0,
                max: 100,
                default: 80,
                value: 80,
                ..SettingSlider::default()
            },
        );
        if optional(options, "Title") {
            title(tree, root, "Master Volume", "SETTINGS_MASTER_VOLUME");
        }
        let body = node(tree, root, "Slider", anchored_right(Vec2::new(360.0, 40.0)));
        node(tree, body, "Fill Area", RectTransform::fill());
        node(tree, body, "Handle", centered(Vec2::new(20.0, 40.0)));
        let value = node(tree, body, "Value", anchored_right(Vec2::new(60.0, 40.0)));
        tree.insert(value, Text::new("80"));
        let field = node(tree, body, "Field", RectTransform::fill());
        tree.insert(field, InputField::default());
        tree.set_active(field, false);
        root
    });

    let dropdown = optional(options, "Microphone").then(|| {
        let root = node(tree, section, "Microphone", control_rect(-94.0));
        title(tree, root, "Microphone", "SETTINGS_MICROPHONE");
        let body = node(tree, root, "Dropdown", anchored_right(Vec2::new(360.0, 40.0)));
        tree.insert(
            body,
            SettingDropdown {
                key: "Settings_Microphone".into(),
                options: vec!["Default".into()],
                default: "Default".into(),
                value: "Default".into(),
                ..SettingDropdown::default()
            },
        );
        root
    });

    let toggle = optional(options, "PushToTalk").then(|| {
        let root = node(tree, section, "PushToTalk", control_rect(-170.0));
        title(tree, root, "Push To Talk", "SETTINGS_PUSH_TO_TALK");
        let body = node(tree, root, "Toggle", anchored_right(Vec2::new(60.0, 40.0)));
        tree.insert(
            body,
            SettingToggle {
                key: "Settings_PushToTalk".into(),
                ..SettingToggle::default()
            },
        );
        root
    });

    AudioSection {
        section,
        slider,
        dropdown,
        toggle,
    }
}

fn optional(options: &FixtureOptions, name: &str) -> bool {
    options.omit != Some(name)
}

fn node(tree: &mut UiTree, parent: NodeId, name: &str, rect: RectTransform) -> NodeId {
    let id = tree
        .create_child(parent, name)
        .expect("fixture parent is alive");
    if let Some(slot) = tree.rect_mut(id) {
        *slot = rect;
    }
    id
}

fn tab(tree: &mut UiTree, tabs: NodeId, name: &str, label: &str) -> (NodeId, NodeId) {
    let tab = node(tree, tabs, name, centered(Vec2::new(180.0, 50.0)));
    tree.insert(tab, Button::default());
    let text = node(tree, tab, "Text", RectTransform::fill());
    tree.insert(text, Text::new(label));
    tree.insert(
        text,
        HostLocalization {
            key: format!("SETTINGS_TAB_{}", label.to_uppercase()),
        },
    );
    let indicator = node(tree, tab, "Indicator", RectTransform::top_strip(-46.0, 4.0));
    tree.insert(indicator, Fader { visible: false });
    (tab, indicator)
}

fn title(tree: &mut UiTree, parent: NodeId, text: &str, key: &str) {
    let label = node(tree, parent, "Title", anchored_left(Vec2::new(300.0, 40.0)));
    tree.insert(label, Text::new(text));
    tree.insert(label, HostLocalization { key: key.into() });
}

const fn centered(size: Vec2) -> RectTransform {
    RectTransform {
        anchor_min: Vec2::new(0.5, 0.5),
        anchor_max: Vec2::new(0.5, 0.5),
        pivot: Vec2::new(0.5, 0.5),
        anchored_position: Vec2::ZERO,
        size_delta: size,
        local_scale: Vec2::ONE,
    }
}

const fn anchored_left(size: Vec2) -> RectTransform {
    RectTransform {
        anchor_min: Vec2::new(0.0, 0.5),
        anchor_max: Vec2::new(0.0, 0.5),
        pivot: Vec2::new(0.0, 0.5),
        anchored_position: Vec2::ZERO,
        size_delta: size,
        local_scale: Vec2::ONE,
    }
}

const fn anchored_right(size: Vec2) -> RectTransform {
    RectTransform {
        anchor_min: Vec2::new(1.0, 0.5),
        anchor_max: Vec2::new(1.0, 0.5),
        pivot: Vec2::new(1.0, 0.5),
        anchored_position: Vec2::ZERO,
        size_delta: size,
        local_scale: Vec2::ONE,
    }
}

/// Stretched on both axes, with `top`/`bottom` margins.
fn stretched(top: f32, bottom: f32) -> RectTransform {
    let mut rect = RectTransform::fill();
    rect.set_offset_min(Vec2::new(0.0, bottom));
    rect.set_offset_max(Vec2::new(0.0, -top));
    rect
}

fn bottom_strip(height: f32) -> RectTransform {
    RectTransform {
        anchor_min: Vec2::ZERO,
        anchor_max: Vec2::new(1.0, 0.0),
        pivot: Vec2::new(0.5, 0.0),
        anchored_position: Vec2::ZERO,
        size_delta: Vec2::new(0.0, height),
        local_scale: Vec2::ONE,
    }
}

/// Sections hang from the top of their container, 20px in on each side.
fn section_rect() -> RectTransform {
    let mut rect = RectTransform::top_strip(0.0, 640.0);
    rect.set_offset_min(Vec2::new(20.0, rect.offset_min().y));
    rect.set_offset_max(Vec2::new(-20.0, rect.offset_max().y));
    rect
}

/// Reference controls span the section minus the fixture inset per side.
fn control_rect(y: f32) -> RectTransform {
    let mut rect = RectTransform::top_strip(y, 64.0);
    rect.set_offset_min(Vec2::new(FIXTURE_CONTROL_INSET, rect.offset_min().y));
    rect.set_offset_max(Vec2::new(-FIXTURE_CONTROL_INSET, rect.offset_max().y));
    rect
}
