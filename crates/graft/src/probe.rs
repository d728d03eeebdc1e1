//! Host lookups the runtime needs between frames.

use graft_shared::Language;
use graft_tree::{Controller, ControllerKind, LocalisationManager, NodeId, SettingsPanel, UiTree};

/// Finds host objects in a tree.
pub trait HostProbe {
    /// The first active controller of `kind`.
    fn find_controller(&self, tree: &UiTree, kind: ControllerKind) -> Option<NodeId>;

    /// The settings panel a controller owns.
    fn settings_for(&self, tree: &UiTree, controller: NodeId) -> Option<NodeId>;

    /// The language the host currently displays.
    fn current_language(&self, tree: &UiTree) -> Option<Language>;
}

/// [`HostProbe`] that reads the host components of a [`UiTree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeProbe;

impl HostProbe for TreeProbe {
    fn find_controller(&self, tree: &UiTree, kind: ControllerKind) -> Option<NodeId> {
        tree.iter_dfs().find(|&node| {
            tree.get::<Controller>(node)
                .is_some_and(|controller| controller.kind == kind)
                && tree.is_active_in_hierarchy(node)
        })
    }

    /// The controller's explicit panel reference, else the first panel
    /// below the controller.
    fn settings_for(&self, tree: &UiTree, controller: NodeId) -> Option<NodeId> {
        tree.get::<Controller>(controller)
            .and_then(|controller| controller.settings)
            .filter(|&panel| tree.contains(panel))
            .or_else(|| tree.find_in_children::<SettingsPanel>(controller))
    }

    fn current_language(&self, tree: &UiTree) -> Option<Language> {
        tree.iter_dfs()
            .find_map(|node| tree.get::<LocalisationManager>(node))
            .and_then(LocalisationManager::effective)
    }
}
