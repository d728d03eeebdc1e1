//! # Settings Registry
//!
//! Owns the registered tabs and the host panels they are injected into.
//!
//! ```text
//! register_tab ──┐                         ┌──> Context (menu panel)
//! create_*  ─────┼──> rebuild_tab ─────────┼──> Context (in-game panel)
//! inject ────────┘    (every live context) └──> ...
//! ```
//!
//! Every mutation rebuilds the affected tab into every live context, newest
//! first. Builds are idempotent, so rebuilding a tab that did not change
//! leaves the panel as it was.
//!
//! ## Locking
//!
//! Registry state, then tree, then preference store. Ready listeners run
//! after all three are released.

use std::sync::{Arc, Weak};

use graft_prefs::SharedStore;
use graft_shared::{Language, LocalText};
use graft_tree::{NodeId, SharedTree, UiTree};
use parking_lot::{Mutex, RwLock};

use crate::bridge;
use crate::builders::BuildEnv;
use crate::config::EngineConfig;
use crate::context::{Context, ContextRegistry};
use crate::error::GraftResult;
use crate::handles::{
    ButtonHandle, DropdownHandle, InputHandle, LabelHandle, SliderHandle, ToggleHandle,
};
use crate::localization;
use crate::request::{
    ButtonSpec, ControlRequest, DropdownSpec, InputSpec, LabelSpec, ReadyNotice, SliderSpec,
    ToggleSpec, UiRef,
};
use crate::rows;
use crate::section;
use crate::templates::Templates;

// =============================================================================
// STATE
// =============================================================================

struct TabInner {
    id: String,
    title: LocalText,
    show_in_game: bool,
    requests: Mutex<Vec<Arc<ControlRequest>>>,
}

impl TabInner {
    fn snapshot(&self) -> Vec<Arc<ControlRequest>> {
        self.requests.lock().clone()
    }
}

#[derive(Default)]
struct RegistryState {
    tabs: Vec<Arc<TabInner>>,
    contexts: ContextRegistry,
    shut_down: bool,
}

struct Shared {
    tree: SharedTree,
    store: SharedStore,
    config: EngineConfig,
    state: Mutex<RegistryState>,
    language: RwLock<Language>,
}

/// Result of [`NativeSettings::inject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The panel has no content region.
    NoContent,
    /// The panel was injected before.
    AlreadyInjected,
    /// The registry was shut down.
    Inactive,
    /// New context; `tabs` tabs were built into it.
    Injected {
        /// Tabs built.
        tabs: usize,
    },
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Entry point of the engine.
///
/// Cheap to clone; clones share the same tabs and contexts.
#[derive(Clone)]
pub struct NativeSettings {
    shared: Arc<Shared>,
}

impl NativeSettings {
    /// Creates a registry over `tree`, persisting control values to `store`.
    #[must_use]
    pub fn init(tree: SharedTree, store: SharedStore, config: EngineConfig, language: Language) -> Self {
        tracing::info!(?language, "Native settings registry initialized");
        Self {
            shared: Arc::new(Shared {
                tree,
                store,
                config,
                state: Mutex::new(RegistryState::default()),
                language: RwLock::new(language),
            }),
        }
    }

    /// Registers a tab, or returns the one already registered under `id`.
    ///
    /// A blank id is replaced by a generated one. A new tab is built into
    /// every live context straight away.
    pub fn register_tab(&self, id: &str, title: LocalText, show_in_game: bool) -> SettingsTab {
        let id = if id.trim().is_empty() {
            uuid::Uuid::new_v4().simple().to_string()
        } else {
            id.to_string()
        };

        let inner = {
            let mut state = self.shared.state.lock();
            if let Some(existing) = state.tabs.iter().find(|tab| tab.id == id) {
                return self.wrap(Arc::clone(existing));
            }
            let inner = Arc::new(TabInner {
                id,
                title,
                show_in_game,
                requests: Mutex::new(Vec::new()),
            });
            state.tabs.push(Arc::clone(&inner));
            inner
        };

        tracing::debug!(tab = %inner.id, show_in_game, "Registered settings tab");
        if let Err(err) = self.shared.rebuild_tab(&inner) {
            tracing::error!(tab = %inner.id, error = %err, "Failed to build new settings tab");
        }
        self.wrap(inner)
    }

    /// Attaches to the host panel rooted at `settings_root` and builds every
    /// registered tab into it.
    ///
    /// # Errors
    ///
    /// Returns [`Binding`](crate::GraftError::Binding) if a control cannot be bound. Tabs
    /// whose templates are missing are skipped with a warning instead.
    pub fn inject(&self, settings_root: NodeId, in_game: bool) -> GraftResult<InjectOutcome> {
        let mut notices = Vec::new();
        let result = self.shared.inject(settings_root, in_game, &mut notices);
        fire(notices);
        result
    }

    /// Stores the new language and re-renders every bound text node.
    pub fn notify_language_changed(&self, language: Language) {
        *self.shared.language.write() = language;
        let changed = localization::apply_language(&mut self.shared.tree.lock(), language);
        tracing::debug!(?language, changed, "Language changed");
    }

    /// Language text is rendered in.
    #[must_use]
    pub fn language(&self) -> Language {
        *self.shared.language.read()
    }

    /// Binds `node`'s text to `text`, rendered in the current language.
    pub fn bind_text(&self, node: NodeId, text: &LocalText) -> bool {
        let language = self.language();
        localization::bind_text(&mut self.shared.tree.lock(), node, text, language)
    }

    /// Removes the text binding of `node`. The text keeps its last value.
    pub fn unbind_text(&self, node: NodeId) -> bool {
        localization::unbind_text(&mut self.shared.tree.lock(), node)
    }

    /// Tab registered under `id`.
    #[must_use]
    pub fn tab(&self, id: &str) -> Option<SettingsTab> {
        let state = self.shared.state.lock();
        state
            .tabs
            .iter()
            .find(|tab| tab.id == id)
            .map(|tab| self.wrap(Arc::clone(tab)))
    }

    /// Every tab in registration order.
    #[must_use]
    pub fn tabs(&self) -> Vec<SettingsTab> {
        let state = self.shared.state.lock();
        state.tabs.iter().map(|tab| self.wrap(Arc::clone(tab))).collect()
    }

    /// Number of known contexts, dead ones included until the next rebuild.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.shared.state.lock().contexts.len()
    }

    /// The host tree.
    #[must_use]
    pub fn tree(&self) -> &SharedTree {
        &self.shared.tree
    }

    /// The preference store.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.shared.store
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Returns true once [`shutdown`](Self::shutdown) ran.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shared.state.lock().shut_down
    }

    /// Stops all further builds, forgets every context and flushes the
    /// preference store. Built controls stay in the host tree.
    ///
    /// # Errors
    ///
    /// Returns [`Prefs`](crate::GraftError::Prefs) if the store cannot be flushed.
    pub fn shutdown(&self) -> GraftResult<()> {
        {
            let mut state = self.shared.state.lock();
            state.shut_down = true;
            state.contexts.clear();
        }
        self.shared.store.lock().flush()?;
        tracing::info!("Native settings registry shut down");
        Ok(())
    }

    fn wrap(&self, inner: Arc<TabInner>) -> SettingsTab {
        SettingsTab {
            inner,
            owner: Arc::downgrade(&self.shared),
        }
    }
}

impl std::fmt::Debug for NativeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("NativeSettings")
            .field("tabs", &state.tabs.len())
            .field("contexts", &state.contexts.len())
            .field("shut_down", &state.shut_down)
            .finish_non_exhaustive()
    }
}

fn fire(notices: Vec<ReadyNotice>) {
    for notice in notices {
        notice.fire();
    }
}

impl Shared {
    fn inject(
        &self,
        settings_root: NodeId,
        in_game: bool,
        notices: &mut Vec<ReadyNotice>,
    ) -> GraftResult<InjectOutcome> {
        let mut state = self.state.lock();
        if state.shut_down {
            return Ok(InjectOutcome::Inactive);
        }
        let mut tree = self.tree.lock();
        let Some(content) = tree.find_path(settings_root, &self.config.paths.content) else {
            tracing::debug!(panel = %settings_root, "Settings panel has no content region");
            return Ok(InjectOutcome::NoContent);
        };

        let context = Context {
            settings: settings_root,
            content,
            in_game,
        };
        if !state.contexts.register(context) {
            return Ok(InjectOutcome::AlreadyInjected);
        }

        let language = *self.language.read();
        let mut built = 0;
        for tab in &state.tabs {
            if self.build_tab(&mut tree, context, tab, language, notices)? {
                built += 1;
            }
        }
        tracing::info!(panel = %settings_root, in_game, tabs = built, "Injected settings tabs");
        Ok(InjectOutcome::Injected { tabs: built })
    }

    fn rebuild_tab(&self, tab: &TabInner) -> GraftResult<()> {
        let mut notices = Vec::new();
        let result = {
            let mut state = self.state.lock();
            if state.shut_down {
                return Ok(());
            }
            let mut tree = self.tree.lock();
            let language = *self.language.read();
            state
                .contexts
                .live_rev(&tree)
                .into_iter()
                .try_for_each(|context| {
                    self.build_tab(&mut tree, context, tab, language, &mut notices)
                        .map(|_| ())
                })
        };
        fire(notices);
        result
    }

    /// Builds one tab into one context. Returns false if the tab was
    /// skipped for this context.
    fn build_tab(
        &self,
        tree: &mut UiTree,
        context: Context,
        tab: &TabInner,
        language: Language,
        notices: &mut Vec<ReadyNotice>,
    ) -> GraftResult<bool> {
        if context.in_game && !tab.show_in_game {
            return Ok(false);
        }

        let templates = match Templates::resolve(tree, context.content, &self.config, language) {
            Ok(templates) => templates,
            Err(err) if err.is_discovery() => {
                tracing::warn!(tab = %tab.id, error = %err, "UI templates not found; cannot build settings tab");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let (Some(tab_node), Some(section_node)) = (
            section::ensure_tab(tree, &templates, &tab.id),
            section::ensure_section(tree, &templates, &tab.id),
        ) else {
            return Ok(false);
        };
        section::apply_tab_title(tree, tab_node, &tab.title, language);

        let requests = tab.snapshot();
        let mut env = BuildEnv {
            templates: &templates,
            shared_tree: &self.tree,
            store: &self.store,
            language,
            lookahead: self.config.layout.stale_row_lookahead,
            notices: Vec::new(),
        };
        let report = rows::ensure_controls(tree, section_node, &requests, context.in_game, &mut env);
        notices.append(&mut env.notices);
        let report = report.map_err(|err| {
            tracing::error!(tab = %tab.id, error = %err, "Failed to build settings controls");
            err
        })?;

        let outcome = bridge::ensure_section_binding(tree, context.content, tab_node, section_node);
        tracing::debug!(
            tab = %tab.id,
            in_game = context.in_game,
            general = report.general,
            rows = report.rows,
            placed = report.placed,
            ?outcome,
            "Built settings tab"
        );
        Ok(true)
    }
}

// =============================================================================
// TABS
// =============================================================================

/// A registered tab. Cheap to clone.
#[derive(Clone)]
pub struct SettingsTab {
    inner: Arc<TabInner>,
    owner: Weak<Shared>,
}

impl SettingsTab {
    /// Tab id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Tab caption.
    #[must_use]
    pub fn title(&self) -> &LocalText {
        &self.inner.title
    }

    /// Returns true if the tab is built into in-game panels.
    #[must_use]
    pub fn show_in_game(&self) -> bool {
        self.inner.show_in_game
    }

    /// Request ids in registration order.
    #[must_use]
    pub fn control_ids(&self) -> Vec<String> {
        self.inner
            .requests
            .lock()
            .iter()
            .map(|request| request.id().to_string())
            .collect()
    }

    /// Adds a button.
    ///
    /// # Errors
    ///
    /// Returns [`Binding`](crate::GraftError::Binding) if the control cannot be bound in a
    /// live panel. The request stays registered.
    pub fn create_button(&self, spec: ButtonSpec) -> GraftResult<UiRef<ButtonHandle>> {
        let cell = UiRef::new();
        self.add(ControlRequest::Button(spec, cell.clone()))?;
        Ok(cell)
    }

    /// Adds a label.
    ///
    /// # Errors
    ///
    /// See [`create_button`](Self::create_button).
    pub fn create_label(&self, spec: LabelSpec) -> GraftResult<UiRef<LabelHandle>> {
        let cell = UiRef::new();
        self.add(ControlRequest::Label(spec, cell.clone()))?;
        Ok(cell)
    }

    /// Adds a persisted toggle.
    ///
    /// # Errors
    ///
    /// See [`create_button`](Self::create_button).
    pub fn create_toggle(&self, spec: ToggleSpec) -> GraftResult<UiRef<ToggleHandle>> {
        let cell = UiRef::new();
        self.add(ControlRequest::Toggle(spec, cell.clone()))?;
        Ok(cell)
    }

    /// Adds a persisted string dropdown.
    ///
    /// # Errors
    ///
    /// See [`create_button`](Self::create_button).
    pub fn create_dropdown(&self, spec: DropdownSpec) -> GraftResult<UiRef<DropdownHandle>> {
        let cell = UiRef::new();
        self.add(ControlRequest::Dropdown(spec, cell.clone()))?;
        Ok(cell)
    }

    /// Adds a persisted integer slider.
    ///
    /// # Errors
    ///
    /// See [`create_button`](Self::create_button).
    pub fn create_slider_int(&self, spec: SliderSpec) -> GraftResult<UiRef<SliderHandle>> {
        let cell = UiRef::new();
        self.add(ControlRequest::Slider(spec, cell.clone()))?;
        Ok(cell)
    }

    /// Adds a persisted text input.
    ///
    /// # Errors
    ///
    /// See [`create_button`](Self::create_button).
    pub fn create_input_string(&self, spec: InputSpec) -> GraftResult<UiRef<InputHandle>> {
        let cell = UiRef::new();
        self.add(ControlRequest::Input(spec, cell.clone()))?;
        Ok(cell)
    }

    /// Appends `request`, or replaces the request with the same id in
    /// place, then rebuilds the tab everywhere.
    fn add(&self, mut request: ControlRequest) -> GraftResult<()> {
        request.ensure_id();
        {
            let mut requests = self.inner.requests.lock();
            let request = Arc::new(request);
            match requests.iter().position(|known| known.id() == request.id()) {
                Some(index) => requests[index] = request,
                None => requests.push(request),
            }
        }
        match self.owner.upgrade() {
            Some(shared) => shared.rebuild_tab(&self.inner),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for SettingsTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsTab")
            .field("id", &self.inner.id)
            .field("show_in_game", &self.inner.show_in_game)
            .field("controls", &self.inner.requests.lock().len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for SettingsTab {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for SettingsTab {}
