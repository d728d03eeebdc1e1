//! Host structural bridge.
//!
//! The host only switches to sections it has a record for, and only after
//! rebuilding its index. This module appends the record for a synthesized
//! tab/section pair and triggers that rebuild.

use graft_tree::{Button, Fader, NodeId, SectionRecord, SectionRegistrar, SettingsPanel, UiTree};

/// Result of linking a section into host bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// A record was appended and the index rebuilt.
    Registered,
    /// The host already knew the section.
    AlreadyRegistered,
    /// No settings panel above the content region.
    NoPanel,
    /// The tab has no button, so it could never select the section.
    NoTabButton,
}

/// Registers `section` with the settings panel above `content`.
pub fn ensure_section_binding(
    tree: &mut UiTree,
    content: NodeId,
    tab: NodeId,
    section: NodeId,
) -> BridgeOutcome {
    let Some(panel) = tree.find_in_parents::<SettingsPanel>(content) else {
        return BridgeOutcome::NoPanel;
    };
    if tree
        .get::<SettingsPanel>(panel)
        .is_some_and(|state| state.has_section(section))
    {
        return BridgeOutcome::AlreadyRegistered;
    }
    if !tree.has::<Button>(tab) {
        return BridgeOutcome::NoTabButton;
    }

    let record = SectionRecord {
        section,
        tab_button: tab,
        indicator: tree.find_in_children::<Fader>(tab),
    };
    match tree.get_mut::<SettingsPanel>(panel) {
        Some(state) => register(state, record),
        None => BridgeOutcome::NoPanel,
    }
}

/// Appends `record` unless present, then rebuilds the registrar's index.
pub fn register(registrar: &mut impl SectionRegistrar, record: SectionRecord) -> BridgeOutcome {
    if registrar.has_section(record.section) {
        return BridgeOutcome::AlreadyRegistered;
    }
    registrar.register_section(record);
    registrar.reinitialize();
    tracing::debug!(section = %record.section, tab = %record.tab_button, "Registered section with host");
    BridgeOutcome::Registered
}
