//! Host settings panel bookkeeping.
//!
//! The host keeps one record per tab/section pair and derives a lookup index
//! from them. Tab switching only recognises sections present in that index,
//! so externally added sections must be registered and the index rebuilt.

use std::collections::HashMap;

use crate::component::Fader;
use crate::node::NodeId;
use crate::tree::UiTree;

/// One tab/section pair known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRecord {
    /// Section content node.
    pub section: NodeId,
    /// Tab button node.
    pub tab_button: NodeId,
    /// Selection indicator under the tab, if any.
    pub indicator: Option<NodeId>,
}

/// Backing storage of the section records.
///
/// Some host builds keep a growable list, others a fixed-size array that
/// has to be reallocated to add an entry.
#[derive(Debug, Clone)]
pub enum SectionList {
    /// Growable list.
    Growable(Vec<SectionRecord>),
    /// Fixed-size array.
    Fixed(Box<[SectionRecord]>),
}

impl SectionList {
    /// Records in order.
    #[must_use]
    pub fn as_slice(&self) -> &[SectionRecord] {
        match self {
            Self::Growable(records) => records,
            Self::Fixed(records) => records,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns true for fixed-size storage.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Appends a record. Fixed storage is reallocated one slot larger.
    pub fn push(&mut self, record: SectionRecord) {
        match self {
            Self::Growable(records) => records.push(record),
            Self::Fixed(records) => {
                let mut grown = std::mem::take(records).into_vec();
                grown.push(record);
                *records = grown.into_boxed_slice();
            }
        }
    }
}

impl Default for SectionList {
    fn default() -> Self {
        Self::Growable(Vec::new())
    }
}

/// The host's "register external section" capability.
pub trait SectionRegistrar {
    /// Returns true if a record for `section` exists.
    fn has_section(&self, section: NodeId) -> bool;

    /// Appends a record.
    fn register_section(&mut self, record: SectionRecord);

    /// Rebuilds the host's derived section index.
    fn reinitialize(&mut self);
}

/// Settings panel component.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    sections: SectionList,
    by_button: HashMap<NodeId, usize>,
    init_count: u32,
    selected: Option<usize>,
}

impl SettingsPanel {
    /// Creates a panel over `sections` and indexes them.
    #[must_use]
    pub fn new(sections: SectionList) -> Self {
        let mut panel = Self {
            sections,
            ..Self::default()
        };
        panel.init_sections();
        panel
    }

    /// Section records.
    #[must_use]
    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    /// Rebuilds the button → section index.
    pub fn init_sections(&mut self) {
        self.by_button = self
            .sections
            .as_slice()
            .iter()
            .enumerate()
            .map(|(index, record)| (record.tab_button, index))
            .collect();
        self.init_count += 1;
    }

    /// How many times the index was built.
    #[must_use]
    pub const fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Indexed section for a tab button.
    #[must_use]
    pub fn section_for_button(&self, tab_button: NodeId) -> Option<&SectionRecord> {
        self.by_button
            .get(&tab_button)
            .and_then(|&index| self.sections.as_slice().get(index))
    }

    /// Index of the selected section.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }
}

impl SectionRegistrar for SettingsPanel {
    fn has_section(&self, section: NodeId) -> bool {
        self.sections
            .as_slice()
            .iter()
            .any(|record| record.section == section)
    }

    fn register_section(&mut self, record: SectionRecord) {
        self.sections.push(record);
    }

    fn reinitialize(&mut self) {
        self.init_sections();
    }
}

impl UiTree {
    /// Host tab switching: shows the section indexed for `tab_button`, hides
    /// every other one and moves the indicators along.
    ///
    /// Returns false if the panel does not know the button.
    pub fn select_section(&mut self, panel: NodeId, tab_button: NodeId) -> bool {
        let Some(state) = self.get::<SettingsPanel>(panel) else {
            return false;
        };
        let Some(&target) = state.by_button.get(&tab_button) else {
            return false;
        };
        let records = state.sections.as_slice().to_vec();

        for (index, record) in records.iter().enumerate() {
            let chosen = index == target;
            self.set_active(record.section, chosen);
            if let Some(fader) = record.indicator.and_then(|id| self.get_mut::<Fader>(id)) {
                fader.visible = chosen;
            }
        }
        if let Some(state) = self.get_mut::<SettingsPanel>(panel) {
            state.selected = Some(target);
        }
        true
    }
}
