//! # Control Builders
//!
//! One builder per control kind. Every builder owns exactly one node tree
//! named after the request id:
//!
//! 1. **Acquire**: reuse the node of that name anywhere under the section
//!    (moved into the target parent if needed), else clone the template.
//! 2. **Bind**: title text, widget key, stored value, listeners.
//! 3. **Finish**: preferred size, position offset, control flag, activate.
//!
//! Listeners are always replaced, never appended, so rebuilding a control
//! does not stack callbacks.

use graft_prefs::{SettingsStore, SharedStore};
use graft_shared::constants::{BUTTON_TEXT_CHILD, INPUT_BODY, SLIDER_BODY, SLIDER_PARTS, TITLE_CHILD};
use graft_shared::{Language, LocalText, Vec2};
use graft_tree::{
    Button, ControlTag, HostLocalization, InputField, LayoutElement, NodeFlags, NodeId,
    SettingDropdown, SettingSlider, SettingToggle, SharedTree, Text, UiTree,
};
use std::sync::Arc;

use crate::error::{GraftError, GraftResult};
use crate::handles::{
    ButtonHandle, DropdownHandle, InputHandle, LabelHandle, SliderHandle, ToggleHandle,
};
use crate::localization;
use crate::request::{
    ButtonSpec, Callback, ControlRequest, DropdownSpec, InputSpec, LabelSpec, ReadyNotice,
    SliderSpec, ToggleSpec,
};
use crate::templates::Templates;

/// Everything a build needs besides the tree itself.
pub struct BuildEnv<'a> {
    /// Metrics snapshot of the target panel.
    pub templates: &'a Templates,
    /// Handle of the locked tree, stored in the produced handles.
    pub shared_tree: &'a SharedTree,
    /// Preference store.
    pub store: &'a SharedStore,
    /// Language titles are rendered in.
    pub language: Language,
    /// How far past the used rows stale rows are searched.
    pub lookahead: usize,
    /// Ready notifications to fire once every lock is released.
    pub notices: Vec<ReadyNotice>,
}

/// Builds (or rebuilds) `request` under `parent`, inside `section`.
///
/// Returns the control's root node.
///
/// # Errors
///
/// [`GraftError::Binding`] if the template lacks the widget the control
/// binds to, [`GraftError::Discovery`] if `parent` is gone.
pub fn build_control(
    tree: &mut UiTree,
    section: NodeId,
    parent: NodeId,
    request: &ControlRequest,
    env: &mut BuildEnv<'_>,
) -> GraftResult<NodeId> {
    let template = match request {
        ControlRequest::Button(..) => env.templates.button,
        ControlRequest::Label(..) => env.templates.label,
        ControlRequest::Toggle(..) => env.templates.toggle,
        ControlRequest::Dropdown(..) => env.templates.dropdown,
        ControlRequest::Slider(..) | ControlRequest::Input(..) => env.templates.slider,
    };
    let root = acquire(tree, section, parent, template, request.id())?;

    let notice = match request {
        ControlRequest::Button(spec, cell) => {
            let node = bind_button(tree, root, spec, env.language)?;
            cell.set(ButtonHandle::new(Arc::clone(env.shared_tree), node))
        }
        ControlRequest::Label(spec, cell) => {
            let node = bind_label(tree, root, spec, env.language)?;
            cell.set(LabelHandle::new(Arc::clone(env.shared_tree), node))
        }
        ControlRequest::Toggle(spec, cell) => {
            let node = bind_toggle(tree, root, spec, env)?;
            cell.set(ToggleHandle::new(Arc::clone(env.shared_tree), node))
        }
        ControlRequest::Dropdown(spec, cell) => {
            let node = bind_dropdown(tree, root, spec, env)?;
            cell.set(DropdownHandle::new(Arc::clone(env.shared_tree), node))
        }
        ControlRequest::Slider(spec, cell) => {
            let node = bind_slider(tree, root, spec, env)?;
            cell.set(SliderHandle::new(Arc::clone(env.shared_tree), node))
        }
        ControlRequest::Input(spec, cell) => {
            let node = bind_input(tree, root, spec, env)?;
            cell.set(InputHandle::new(Arc::clone(env.shared_tree), node))
        }
    };
    env.notices.push(notice);

    let common = request.common();
    apply_preferred_size(tree, root, common.preferred_size);
    apply_position_offset(tree, root, common.position_offset);
    tree.set_flag(root, NodeFlags::CONTROL, true);
    tree.set_active(root, true);
    Ok(root)
}

/// Reuses the control named `id` under `section`, or clones `template`.
///
/// Only nodes flagged as controls are candidates, so an id that matches a
/// template part never steals that part from a sibling control.
fn acquire(
    tree: &mut UiTree,
    section: NodeId,
    parent: NodeId,
    template: NodeId,
    id: &str,
) -> GraftResult<NodeId> {
    let existing = tree
        .descendants(section)
        .skip(1)
        .find(|&node| tree.has_flag(node, NodeFlags::CONTROL) && tree.name(node) == Some(id));
    if let Some(node) = existing {
        if tree.parent(node) != Some(parent) && !tree.reparent(node, parent) {
            return Err(GraftError::missing(format!("parent of {id}")));
        }
        return Ok(node);
    }

    let node = tree
        .instantiate(template, parent)
        .ok_or_else(|| GraftError::missing(format!("parent of {id}")))?;
    tree.rename(node, id);
    if let Some(rect) = tree.rect_mut(node) {
        rect.local_scale = Vec2::ONE;
    }
    Ok(node)
}

// =============================================================================
// PER-KIND BINDING
// =============================================================================

fn bind_button(
    tree: &mut UiTree,
    root: NodeId,
    spec: &ButtonSpec,
    language: Language,
) -> GraftResult<NodeId> {
    let caption = tree.find_child(root, BUTTON_TEXT_CHILD).unwrap_or(root);
    localization::bind_first_text(tree, caption, &spec.text, language);

    let node = tree
        .find_in_children::<Button>(root)
        .ok_or_else(|| GraftError::binding(&spec.common.id, "Button"))?;
    if let Some(button) = tree.get_mut::<Button>(node) {
        button.on_click.remove_all_listeners();
        if let Some(action) = spec.on_click.clone() {
            button.on_click.add_listener(move |_| action());
        }
    }
    Ok(node)
}

fn bind_label(
    tree: &mut UiTree,
    root: NodeId,
    spec: &LabelSpec,
    language: Language,
) -> GraftResult<NodeId> {
    tree.remove::<HostLocalization>(root);
    let node = tree
        .find_in_children::<Text>(root)
        .ok_or_else(|| GraftError::binding(&spec.common.id, "Text"))?;
    localization::bind_text(tree, node, &spec.text, language);
    Ok(node)
}

fn bind_toggle(
    tree: &mut UiTree,
    root: NodeId,
    spec: &ToggleSpec,
    env: &BuildEnv<'_>,
) -> GraftResult<NodeId> {
    apply_title(tree, root, &spec.title, env.language);
    let node = tree
        .find_in_children::<SettingToggle>(root)
        .ok_or_else(|| GraftError::binding(&spec.common.id, "SettingToggle"))?;

    let value = if spec.key.is_empty() {
        spec.initial
    } else {
        env.store.lock().get_bool(&spec.key, spec.initial)
    };
    let listener = persist(env.store, &spec.key, spec.on_changed.clone(), |store, key, v| {
        store.set_bool(key, *v)
    });

    if let Some(toggle) = tree.get_mut::<SettingToggle>(node) {
        toggle.key.clone_from(&spec.key);
        toggle.default = spec.initial;
        toggle.value = value;
        toggle.on_changed.remove_all_listeners();
        toggle.on_changed.add_listener(listener);
    }
    Ok(node)
}

fn bind_dropdown(
    tree: &mut UiTree,
    root: NodeId,
    spec: &DropdownSpec,
    env: &BuildEnv<'_>,
) -> GraftResult<NodeId> {
    apply_title(tree, root, &spec.title, env.language);
    let node = tree
        .find_in_children::<SettingDropdown>(root)
        .ok_or_else(|| GraftError::binding(&spec.common.id, "SettingDropdown"))?;

    let stored = if spec.key.is_empty() {
        spec.initial.clone()
    } else {
        env.store.lock().get_string(&spec.key, &spec.initial)
    };
    let value = if spec.options.contains(&stored) {
        stored
    } else {
        spec.initial.clone()
    };
    let listener = persist(env.store, &spec.key, spec.on_changed.clone(), |store, key, v: &String| {
        store.set_string(key, v)
    });

    if let Some(dropdown) = tree.get_mut::<SettingDropdown>(node) {
        dropdown.key.clone_from(&spec.key);
        dropdown.populate_options(spec.options.clone());
        dropdown.default.clone_from(&spec.initial);
        dropdown.value = value;
        dropdown.on_changed.remove_all_listeners();
        dropdown.on_changed.add_listener(listener);
    }
    Ok(node)
}

fn bind_slider(
    tree: &mut UiTree,
    root: NodeId,
    spec: &SliderSpec,
    env: &BuildEnv<'_>,
) -> GraftResult<NodeId> {
    apply_title(tree, root, &spec.title, env.language);
    let node = tree
        .find_in_children::<SettingSlider>(root)
        .ok_or_else(|| GraftError::binding(&spec.common.id, "SettingSlider"))?;

    let (min, max) = spec.bounds();
    let initial = spec.initial.clamp(min, max);
    let value = if spec.key.is_empty() {
        initial
    } else {
        env.store.lock().get_int(&spec.key, initial).clamp(min, max)
    };
    let listener = persist(env.store, &spec.key, spec.on_changed.clone(), |store, key, v| {
        store.set_int(key, *v)
    });

    if let Some(slider) = tree.get_mut::<SettingSlider>(node) {
        slider.key.clone_from(&spec.key);
        slider.min = min;
        slider.max = max;
        slider.default = initial;
        slider.value = value;
        slider.on_changed.remove_all_listeners();
        slider.on_changed.add_listener(listener);
    }
    tree.display_slider_value(node);
    Ok(node)
}

/// Converts a slider clone into a text input: the slider widget and its
/// value, fill and handle parts go, the body becomes `Input`.
fn bind_input(
    tree: &mut UiTree,
    root: NodeId,
    spec: &InputSpec,
    env: &BuildEnv<'_>,
) -> GraftResult<NodeId> {
    apply_title(tree, root, &spec.title, env.language);
    tree.remove::<SettingSlider>(root);

    let body = tree
        .find_descendant(root, INPUT_BODY)
        .or_else(|| tree.find_descendant(root, SLIDER_BODY));
    if let Some(body) = body {
        tree.set_active(body, true);
        for part in SLIDER_PARTS {
            if let Some(child) = tree.find_child(body, part) {
                tree.destroy(child);
            }
        }
        tree.rename(body, INPUT_BODY);
    }

    let node = tree
        .find_in_children::<InputField>(root)
        .ok_or_else(|| GraftError::binding(&spec.common.id, "InputField"))?;

    let text = if spec.key.is_empty() {
        spec.initial.clone()
    } else {
        env.store.lock().get_string(&spec.key, &spec.initial)
    };
    let listener = persist(env.store, &spec.key, spec.on_changed.clone(), |store, key, v: &String| {
        store.set_string(key, v)
    });

    tree.set_active(node, true);
    if let Some(input) = tree.get_mut::<InputField>(node) {
        input.enabled = true;
        input.text = text;
        input.on_value_changed.remove_all_listeners();
        input.on_end_edit.remove_all_listeners();
        input.on_end_edit.add_listener(listener);
    }
    Ok(node)
}

/// Binds the `Title` child, if the control has one.
fn apply_title(tree: &mut UiTree, root: NodeId, title: &LocalText, language: Language) {
    if let Some(node) = tree.find_child(root, TITLE_CHILD) {
        localization::bind_first_text(tree, node, title, language);
    }
}

/// Listener that writes the store (non-empty keys only), then calls the
/// caller's callback.
fn persist<T, W>(
    store: &SharedStore,
    key: &str,
    callback: Option<Callback<T>>,
    write: W,
) -> impl Fn(&T) + Send + Sync + 'static
where
    T: Clone + Send + Sync + 'static,
    W: Fn(&mut dyn SettingsStore, &str, &T) -> graft_prefs::PrefsResult<()> + Send + Sync + 'static,
{
    let store = Arc::clone(store);
    let key = key.to_string();
    move |value: &T| {
        if !key.is_empty() {
            if let Err(error) = write(&mut *store.lock(), &key, value) {
                tracing::warn!(key = %key, %error, "Failed to persist setting");
            }
        }
        if let Some(callback) = &callback {
            callback(value.clone());
        }
    }
}

// =============================================================================
// FINISHING
// =============================================================================

/// Sets the preferred size on the node's layout element.
pub fn apply_preferred_size(tree: &mut UiTree, node: NodeId, size: Option<Vec2>) {
    let Some(size) = size else {
        return;
    };
    if let Some(element) = tree.get_or_insert_with(node, LayoutElement::default) {
        element.preferred_width = Some(size.x);
        element.preferred_height = Some(size.y);
        element.flexible_width = Some(0.0);
        element.flexible_height = Some(0.0);
    }
}

/// Moves the node so that exactly `offset` is added to its anchored
/// position, however often it is rebuilt.
pub fn apply_position_offset(tree: &mut UiTree, node: NodeId, offset: Option<Vec2>) {
    let applied = tree
        .get::<ControlTag>(node)
        .map_or(Vec2::ZERO, |tag| tag.applied_offset);
    let wanted = offset.unwrap_or(Vec2::ZERO);
    if wanted == applied {
        return;
    }
    if let Some(rect) = tree.rect_mut(node) {
        rect.anchored_position += wanted - applied;
    }
    tree.insert(
        node,
        ControlTag {
            applied_offset: wanted,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::request::{ControlSpec, UiRef};
    use graft_prefs::{shared, MemoryStore};
    use graft_tree::{FixtureOptions, HostFixture};
    use parking_lot::Mutex;

    struct Bench {
        tree: SharedTree,
        store: SharedStore,
        templates: Templates,
        section: NodeId,
    }

    impl Bench {
        fn new() -> Self {
            let mut tree = UiTree::new();
            let host = HostFixture::build(&mut tree, &FixtureOptions::default());
            let templates = Templates::resolve(
                &tree,
                host.content,
                &EngineConfig::default(),
                Language::English,
            )
            .unwrap();
            let section = tree.create_child(host.sections, "Sec_test").unwrap();
            Self {
                tree: tree.into_shared(),
                store: shared(MemoryStore::new()),
                templates,
                section,
            }
        }

        fn build(&self, request: &ControlRequest) -> GraftResult<NodeId> {
            let mut env = BuildEnv {
                templates: &self.templates,
                shared_tree: &self.tree,
                store: &self.store,
                language: Language::English,
                lookahead: 50,
                notices: Vec::new(),
            };
            let result = {
                let mut tree = self.tree.lock();
                build_control(&mut tree, self.section, self.section, request, &mut env)
            };
            for notice in env.notices {
                notice.fire();
            }
            result
        }
    }

    fn title(english: &str) -> LocalText {
        LocalText::new(english, "", english)
    }

    #[test]
    fn test_rebuild_reuses_node_and_listener() {
        let bench = Bench::new();
        let clicks = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&clicks);
        let cell = UiRef::new();
        let request = ControlRequest::Button(
            ButtonSpec::new("ping", title("Ping")).on_click(move || *counter.lock() += 1),
            cell.clone(),
        );

        let first = bench.build(&request).unwrap();
        let second = bench.build(&request).unwrap();
        assert_eq!(first, second);

        let handle: ButtonHandle = cell.get().unwrap();
        assert_eq!(handle.listener_count(), 1);
        assert!(handle.click());
        assert_eq!(*clicks.lock(), 1);

        let tree = bench.tree.lock();
        let caption = tree.find_child(first, BUTTON_TEXT_CHILD).unwrap();
        assert_eq!(tree.get::<Text>(caption).unwrap().text, "Ping");
        assert!(tree.has_flag(first, NodeFlags::CONTROL));
    }

    #[test]
    fn test_id_matching_template_part_keeps_sibling_intact() {
        let bench = Bench::new();
        let slider = bench
            .build(&ControlRequest::Slider(
                SliderSpec::new("vol", "Settings_Vol", title("Volume"), 0, 10, 5),
                UiRef::new(),
            ))
            .unwrap();
        let label = bench
            .build(&ControlRequest::Label(
                LabelSpec::new("Title", title("Stray")),
                UiRef::new(),
            ))
            .unwrap();

        let tree = bench.tree.lock();
        let slider_title = tree.find_child(slider, "Title").unwrap();
        assert_ne!(slider_title, label);
        assert_eq!(tree.get::<Text>(slider_title).unwrap().text, "Volume");
        assert_eq!(tree.parent(label), Some(bench.section));
        assert!(tree.has_flag(label, NodeFlags::CONTROL));
        assert!(!tree.has_flag(slider_title, NodeFlags::CONTROL));
    }

    #[test]
    fn test_toggle_reads_and_writes_store() {
        let bench = Bench::new();
        bench.store.lock().set_bool("Settings_Fx", false).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cell = UiRef::new();
        let request = ControlRequest::Toggle(
            ToggleSpec::new("fx", "Settings_Fx", title("Effects"), true)
                .on_changed(move |v| sink.lock().push(v)),
            cell.clone(),
        );
        bench.build(&request).unwrap();

        let handle: ToggleHandle = cell.get().unwrap();
        assert_eq!(handle.value(), Some(false));
        assert!(handle.set(true));
        assert!(bench.store.lock().get_bool("Settings_Fx", false));
        assert_eq!(*seen.lock(), vec![true]);
    }

    #[test]
    fn test_dropdown_falls_back_on_unknown_value() {
        let bench = Bench::new();
        bench.store.lock().set_string("Settings_Mode", "Z").unwrap();
        let cell = UiRef::new();
        let request = ControlRequest::Dropdown(
            DropdownSpec::new("mode", "Settings_Mode", title("Mode"), ["A", "B"], "B"),
            cell.clone(),
        );
        bench.build(&request).unwrap();

        let handle: DropdownHandle = cell.get().unwrap();
        assert_eq!(handle.value().as_deref(), Some("B"));
        assert_eq!(handle.options(), vec!["A".to_string(), "B".to_string()]);
        assert!(!handle.select("C"));
        assert!(handle.select("A"));
        assert_eq!(bench.store.lock().get_string("Settings_Mode", ""), "A");
    }

    #[test]
    fn test_slider_normalises_and_clamps() {
        let bench = Bench::new();
        bench.store.lock().set_int("Settings_Power", 500).unwrap();
        let cell = UiRef::new();
        let request = ControlRequest::Slider(
            SliderSpec::new("power", "Settings_Power", title("Power"), 100, 0, 50),
            cell.clone(),
        );
        let root = bench.build(&request).unwrap();

        let handle: SliderHandle = cell.get().unwrap();
        assert_eq!(handle.range(), Some((0, 100)));
        assert_eq!(handle.value(), Some(100));

        let tree = bench.tree.lock();
        let value = tree.find_descendant(root, "Value").unwrap();
        assert_eq!(tree.get::<Text>(value).unwrap().text, "100");
    }

    #[test]
    fn test_input_is_built_from_slider() {
        let bench = Bench::new();
        let cell = UiRef::new();
        let request = ControlRequest::Input(
            InputSpec::new("name", "Settings_Name", title("Name"), "Hello"),
            cell.clone(),
        );
        let root = bench.build(&request).unwrap();
        bench.build(&request).unwrap();

        {
            let tree = bench.tree.lock();
            assert!(!tree.has::<SettingSlider>(root));
            let body = tree.find_child(root, INPUT_BODY).unwrap();
            assert!(tree.find_child(root, SLIDER_BODY).is_none());
            for part in SLIDER_PARTS {
                assert!(tree.find_child(body, part).is_none());
            }
        }

        let handle: InputHandle = cell.get().unwrap();
        assert_eq!(handle.text().as_deref(), Some("Hello"));
        assert!(handle.is_alive());
        assert!(handle.submit("World"));
        assert_eq!(bench.store.lock().get_string("Settings_Name", ""), "World");
    }

    #[test]
    fn test_empty_key_skips_store() {
        let bench = Bench::new();
        let cell = UiRef::new();
        let request = ControlRequest::Toggle(ToggleSpec::new("t", "", title("T"), true), cell.clone());
        bench.build(&request).unwrap();

        let handle: ToggleHandle = cell.get().unwrap();
        assert!(handle.set(false));
        assert!(!bench.store.lock().contains(""));
    }

    #[test]
    fn test_label_binds_text() {
        let bench = Bench::new();
        let cell = UiRef::new();
        let request = ControlRequest::Label(LabelSpec::new("intro", title("Intro")), cell.clone());
        let root = bench.build(&request).unwrap();

        let handle: LabelHandle = cell.get().unwrap();
        assert_eq!(handle.text().as_deref(), Some("Intro"));
        assert!(!bench.tree.lock().has::<HostLocalization>(root));
    }

    #[test]
    fn test_missing_widget_is_binding_error() {
        let bench = Bench::new();
        {
            let mut tree = bench.tree.lock();
            let widget = tree.find_in_children::<SettingToggle>(bench.templates.toggle).unwrap();
            tree.remove::<SettingToggle>(widget);
        }
        let request = ControlRequest::Toggle(ToggleSpec::new("t", "k", title("T"), true), UiRef::new());

        match bench.build(&request) {
            Err(GraftError::Binding { control, expected }) => {
                assert_eq!(control, "t");
                assert_eq!(expected, "SettingToggle");
            }
            other => panic!("expected binding failure, got {other:?}"),
        }
    }

    #[test]
    fn test_offset_is_applied_once() {
        let bench = Bench::new();
        let request = ControlRequest::Label(
            LabelSpec::new("moved", title("Moved"))
                .position_offset(Vec2::new(5.0, -3.0))
                .preferred_size(Vec2::new(200.0, 40.0)),
            UiRef::new(),
        );
        let root = bench.build(&request).unwrap();
        let before = bench.tree.lock().rect(root).unwrap().anchored_position;
        bench.build(&request).unwrap();

        let tree = bench.tree.lock();
        assert_eq!(tree.rect(root).unwrap().anchored_position, before);
        let element = tree.get::<LayoutElement>(root).unwrap();
        assert_eq!(element.preferred_width, Some(200.0));
        assert_eq!(element.flexible_width, Some(0.0));
    }
}
