//! Tab and section synthesis.
//!
//! Both lookups are by name, so running them again after a host reload or a
//! new registration finds the nodes built last time instead of duplicating
//! them.

use graft_shared::constants::{PLACEHOLDER_NAME, SECTION_PREFIX, TAB_PREFIX};
use graft_shared::{Language, LocalText};
use graft_tree::{Component, NodeId, UiTree};

use crate::localization;
use crate::templates::Templates;

/// Node name of the tab for `tab_id`.
#[must_use]
pub fn tab_name(tab_id: &str) -> String {
    format!("{TAB_PREFIX}{tab_id}")
}

/// Node name of the section for `tab_id`.
#[must_use]
pub fn section_name(tab_id: &str) -> String {
    format!("{SECTION_PREFIX}{tab_id}")
}

/// Finds `Tab_<id>` or clones the reference tab, moved to the end of the
/// tab strip.
pub fn ensure_tab(tree: &mut UiTree, templates: &Templates, tab_id: &str) -> Option<NodeId> {
    let name = tab_name(tab_id);
    if let Some(existing) = tree.find_child(templates.tabs_root, &name) {
        return Some(existing);
    }

    let tab = tree.instantiate(templates.tab, templates.tabs_root)?;
    tree.rename(tab, name);
    tree.set_last_sibling(tab);
    tracing::debug!(tab = tab_id, node = %tab, "Created settings tab");
    Some(tab)
}

/// Finds `Sec_<id>` or creates it as a shallow copy of the reference
/// section. Either way the section gets the reference layout components
/// and a placeholder while it is empty.
pub fn ensure_section(tree: &mut UiTree, templates: &Templates, tab_id: &str) -> Option<NodeId> {
    let name = section_name(tab_id);
    let section = match tree.find_child(templates.sections_root, &name) {
        Some(existing) => existing,
        None => {
            let created =
                tree.instantiate_shallow(templates.section, templates.sections_root, name)?;
            tracing::debug!(tab = tab_id, node = %created, "Created settings section");
            created
        }
    };

    copy_layout_components(tree, templates.section, section);
    ensure_placeholder(tree, section);
    Some(section)
}

/// Copies every layout-affecting component of `from` onto `to`, replacing
/// the ones `to` already has. Returns how many were copied.
pub fn copy_layout_components(tree: &mut UiTree, from: NodeId, to: NodeId) -> usize {
    let layout: Vec<Component> = tree
        .components(from)
        .iter()
        .filter(|component| component.affects_layout())
        .cloned()
        .collect();

    let mut copied = 0;
    for component in layout {
        if tree.insert_component(to, component) {
            copied += 1;
        }
    }
    copied
}

/// Adds a `Placeholder` child to an empty section.
pub fn ensure_placeholder(tree: &mut UiTree, section: NodeId) -> Option<NodeId> {
    if !tree.children(section).is_empty() {
        return tree.find_child(section, PLACEHOLDER_NAME);
    }
    tree.create_child(section, PLACEHOLDER_NAME)
}

/// Removes the placeholder once the section holds a real control.
pub fn remove_placeholder(tree: &mut UiTree, section: NodeId) -> bool {
    tree.find_child(section, PLACEHOLDER_NAME)
        .is_some_and(|placeholder| tree.destroy(placeholder))
}

/// Binds the tab caption.
pub fn apply_tab_title(
    tree: &mut UiTree,
    tab: NodeId,
    title: &LocalText,
    language: Language,
) -> Option<NodeId> {
    localization::bind_first_text(tree, tab, title, language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use graft_tree::{
        ContentSizeFitter, FixtureOptions, GridLayout, HostFixture, HostLocalization, Text,
    };

    fn setup(options: &FixtureOptions) -> (UiTree, HostFixture, Templates) {
        let mut tree = UiTree::new();
        let host = HostFixture::build(&mut tree, options);
        let templates = Templates::resolve(
            &tree,
            host.content,
            &EngineConfig::default(),
            Language::English,
        )
        .unwrap();
        (tree, host, templates)
    }

    #[test]
    fn test_ensure_tab_is_idempotent() {
        let (mut tree, host, templates) = setup(&FixtureOptions::default());

        let tab = ensure_tab(&mut tree, &templates, "demo").unwrap();
        assert_eq!(tree.name(tab), Some("Tab_demo"));
        assert_eq!(tree.children(host.tabs).last(), Some(&tab));

        assert_eq!(ensure_tab(&mut tree, &templates, "demo"), Some(tab));
        assert_eq!(tree.children(host.tabs).len(), 3);
    }

    #[test]
    fn test_new_section_is_shallow_with_layout() {
        let (mut tree, host, templates) = setup(&FixtureOptions::default());

        let section = ensure_section(&mut tree, &templates, "demo").unwrap();
        assert_eq!(tree.parent(section), Some(host.sections));
        assert_eq!(tree.rect(section), tree.rect(templates.section));
        assert!(tree.has::<GridLayout>(section));
        assert!(tree.has::<ContentSizeFitter>(section));
        assert!(!tree.is_active_self(section));

        let children = tree.children(section);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.name(children[0]), Some(PLACEHOLDER_NAME));
    }

    #[test]
    fn test_reused_section_gets_layout_back() {
        let (mut tree, _, templates) = setup(&FixtureOptions::default());
        let section = ensure_section(&mut tree, &templates, "demo").unwrap();
        tree.get_mut::<GridLayout>(section).unwrap().enabled = false;

        assert_eq!(ensure_section(&mut tree, &templates, "demo"), Some(section));
        assert!(tree.get::<GridLayout>(section).unwrap().enabled);
        assert_eq!(tree.children(section).len(), 1);
    }

    #[test]
    fn test_placeholder_only_while_empty() {
        let (mut tree, _, templates) = setup(&FixtureOptions::default());
        let section = ensure_section(&mut tree, &templates, "demo").unwrap();

        assert!(remove_placeholder(&mut tree, section));
        tree.create_child(section, "Control").unwrap();
        assert!(ensure_placeholder(&mut tree, section).is_none());
        assert!(!remove_placeholder(&mut tree, section));
    }

    #[test]
    fn test_tab_title_replaces_host_text() {
        let (mut tree, _, templates) = setup(&FixtureOptions::default());
        let tab = ensure_tab(&mut tree, &templates, "demo").unwrap();

        let label = apply_tab_title(
            &mut tree,
            tab,
            &LocalText::new("demo", "演示", "Demo"),
            Language::English,
        )
        .unwrap();

        assert_eq!(tree.get::<Text>(label).unwrap().text, "Demo");
        assert!(tree.find_in_children::<HostLocalization>(tab).is_none());
    }
}
