//! Localization binder.
//!
//! A bound [`Text`] carries its [`LocalText`] pair and is re-rendered on
//! every language change. Binding strips the host's own localisation hook
//! from the node, otherwise the host would overwrite the text again.

use graft_shared::{Language, LocalText};
use graft_tree::{HostLocalization, NodeId, Text, UiTree};

/// Binds `text` to the label on `node`, creating the label if needed, and
/// renders it for `language`.
///
/// Returns false if the node is dead.
pub fn bind_text(tree: &mut UiTree, node: NodeId, text: &LocalText, language: Language) -> bool {
    if !tree.contains(node) {
        return false;
    }
    tree.remove::<HostLocalization>(node);
    let rendered = text.resolve(language).to_string();
    tree.get_or_insert_with(node, Text::default)
        .map(|label| {
            label.text = rendered;
            label.binding = Some(text.clone());
        })
        .is_some()
}

/// Removes the binding from `node`. The displayed string is kept.
pub fn unbind_text(tree: &mut UiTree, node: NodeId) -> bool {
    tree.get_mut::<Text>(node)
        .map(|label| label.binding = None)
        .is_some()
}

/// Strips the first host hook under `root` and binds the first label under
/// it (both searched from `root` itself, inactive nodes included).
///
/// Returns the bound node.
pub fn bind_first_text(
    tree: &mut UiTree,
    root: NodeId,
    text: &LocalText,
    language: Language,
) -> Option<NodeId> {
    if let Some(hooked) = tree.find_in_children::<HostLocalization>(root) {
        tree.remove::<HostLocalization>(hooked);
    }
    let label = tree.find_in_children::<Text>(root)?;
    bind_text(tree, label, text, language).then_some(label)
}

/// Re-renders every bound label in the tree. Returns how many changed.
pub fn apply_language(tree: &mut UiTree, language: Language) -> usize {
    let bound: Vec<NodeId> = tree
        .iter_dfs()
        .filter(|&id| tree.get::<Text>(id).is_some_and(|label| label.binding.is_some()))
        .collect();

    let mut changed = 0;
    for id in bound {
        let Some(label) = tree.get_mut::<Text>(id) else {
            continue;
        };
        let Some(rendered) = label.binding.as_ref().map(|b| b.resolve(language).to_string())
        else {
            continue;
        };
        if label.text != rendered {
            label.text = rendered;
            changed += 1;
        }
    }
    changed
}
