//! # Section Layout
//!
//! Lays the controls of one tab out inside its section.
//!
//! - **Fast path**: no control of the tab declares a preferred size. Each
//!   visible control becomes a direct child of the section, in request
//!   order, and the host's own grid flows them.
//! - **General path**: the section's layout groups are switched off and the
//!   [`RowPacker`] drives a [`TreeSink`] that materializes rows and slots:
//!
//! ```text
//! Sec_<tab>
//! ├── GraftRow_0            LayoutElement(h), HorizontalLayout(insets)
//! │   ├── GraftSlot_Left    LayoutElement(col × h)
//! │   ├── GraftSlot_Right   LayoutElement(col × h)
//! │   └── GraftSlot_Full    (inactive)
//! ├── GraftRow_1
//! │   ├── GraftSlot_Left    (inactive)
//! │   ├── GraftSlot_Right   (inactive)
//! │   └── GraftSlot_Full    LayoutElement(available × h)
//! └── GraftRow_2            (stale: inactive)
//! ```
//!
//! Rows, slots and controls are never deleted; passes reuse them by name
//! and toggle their active state.

use std::collections::HashSet;
use std::sync::Arc;

use graft_shared::constants::{ROW_PREFIX, SLOT_FULL, SLOT_LEFT, SLOT_RIGHT};
use graft_shared::Vec2;
use graft_tree::{
    Alignment, Direction, LayoutElement, LinearLayout, NodeFlags, NodeId, Padding, RectTransform,
    UiTree,
};

use crate::builders::{self, BuildEnv};
use crate::error::{GraftError, GraftResult};
use crate::packing::{PackMetrics, RowPacker, RowSink};
use crate::request::ControlRequest;
use crate::section;

/// What a layout pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Row packing was used.
    pub general: bool,
    /// Rows in use.
    pub rows: usize,
    /// Controls placed.
    pub placed: usize,
    /// Rows deactivated past the used ones.
    pub stale_rows: usize,
    /// Controls deactivated because no request placed them.
    pub stale_controls: usize,
}

/// Node name of row `index`.
#[must_use]
pub fn row_name(index: usize) -> String {
    format!("{ROW_PREFIX}{index}")
}

/// Lays out `requests` in `section`.
///
/// `requests` is the tab's full request list; those hidden for this panel
/// kind are skipped, but any declared preferred size still selects the
/// general path.
///
/// # Errors
///
/// Propagates the first control build failure. Rows and controls handled
/// before the failure stay as they are.
pub fn ensure_controls(
    tree: &mut UiTree,
    section: NodeId,
    requests: &[Arc<ControlRequest>],
    in_game: bool,
    env: &mut BuildEnv<'_>,
) -> GraftResult<PassReport> {
    let general = requests
        .iter()
        .any(|request| request.preferred_size().is_some());
    let visible = requests.iter().filter(|request| request.visible_in(in_game));
    let lookahead = env.lookahead;

    let mut placed = HashSet::new();
    let mut report = PassReport {
        general,
        ..PassReport::default()
    };

    if general {
        disable_layout_groups(tree, section);
        stretch_section(tree, section, env);
        let metrics = pack_metrics(tree, section, env);

        let mut sink = TreeSink {
            tree: &mut *tree,
            section,
            env: &mut *env,
            spacing: metrics.spacing.x,
            placed: &mut placed,
        };
        let mut packer = RowPacker::new(&mut sink, metrics);
        for request in visible {
            packer.push(Arc::clone(request), request.preferred_size())?;
        }
        let summary = packer.finish()?;
        report.rows = summary.rows;
        report.placed = summary.placed;
    } else {
        for request in visible {
            let node = builders::build_control(tree, section, section, request, env)?;
            tree.set_last_sibling(node);
            placed.insert(node);
        }
        report.placed = placed.len();
    }

    report.stale_rows = disable_extra_rows(tree, section, report.rows, lookahead);
    report.stale_controls = deactivate_stale_controls(tree, section, &placed);
    if report.placed > 0 {
        section::remove_placeholder(tree, section);
    }
    Ok(report)
}

// =============================================================================
// SECTION PREPARATION
// =============================================================================

/// Switches off grid and linear layout groups on the section. Content size
/// fitters stay on.
pub fn disable_layout_groups(tree: &mut UiTree, section: NodeId) -> usize {
    let Some(components) = tree.components_mut(section) else {
        return 0;
    };
    components
        .iter_mut()
        .filter(|component| component.is_layout_group() && component.is_enabled())
        .map(|component| component.set_enabled(false))
        .filter(|&switched| switched)
        .count()
}

/// Stretches the section horizontally over its parent with the reference
/// section's pivot, then drops the horizontal size delta so the section
/// spans the parent exactly.
fn stretch_section(tree: &mut UiTree, section: NodeId, env: &BuildEnv<'_>) {
    let templates = env.templates;
    let Some(rect) = tree.rect_mut(section) else {
        return;
    };
    rect.anchor_min.x = 0.0;
    rect.anchor_max.x = 1.0;
    rect.pivot.x = templates.section_pivot_x;
    let offset_min = rect.offset_min().with_x(templates.section_offset_min_x);
    rect.set_offset_min(offset_min);
    let offset_max = rect.offset_max().with_x(templates.section_offset_max_x);
    rect.set_offset_max(offset_max);
    rect.size_delta.x = 0.0;
}

/// Measured section width, or its parent's when that is larger. Zero when
/// neither resolves.
#[must_use]
pub fn measure_section_width(tree: &UiTree, section: NodeId) -> f32 {
    let own = tree.world_rect(section).map_or(0.0, |rect| rect.width);
    let parent = tree
        .parent(section)
        .and_then(|parent| tree.world_rect(parent))
        .map_or(0.0, |rect| rect.width);
    own.max(parent)
}

#[allow(clippy::cast_precision_loss)]
fn pack_metrics(tree: &UiTree, section: NodeId, env: &BuildEnv<'_>) -> PackMetrics {
    let templates = env.templates;
    let (left, right) = templates.row_padding();
    PackMetrics::new(
        templates.cell_size,
        templates.spacing,
        templates.padding.top as f32,
        left as f32,
        right as f32,
        measure_section_width(tree, section),
    )
}

/// Deactivates rows `used..used + lookahead`, stopping at the first index
/// that has no row. Returns how many were deactivated.
pub fn disable_extra_rows(
    tree: &mut UiTree,
    section: NodeId,
    used: usize,
    lookahead: usize,
) -> usize {
    let mut disabled = 0;
    for index in used..used + lookahead {
        let Some(row) = tree.find_child(section, &row_name(index)) else {
            break;
        };
        if tree.is_active_self(row) {
            tree.set_active(row, false);
            disabled += 1;
        }
    }
    disabled
}

fn deactivate_stale_controls(tree: &mut UiTree, section: NodeId, placed: &HashSet<NodeId>) -> usize {
    let stale: Vec<NodeId> = tree
        .descendants(section)
        .filter(|&node| tree.has_flag(node, NodeFlags::CONTROL) && !placed.contains(&node))
        .filter(|&node| tree.is_active_self(node))
        .collect();
    for &node in &stale {
        tree.set_active(node, false);
    }
    stale.len()
}

// =============================================================================
// TREE SINK
// =============================================================================

/// [`RowSink`] that builds rows, slots and controls into a section.
pub struct TreeSink<'t, 'e, 'a> {
    tree: &'t mut UiTree,
    section: NodeId,
    env: &'e mut BuildEnv<'a>,
    spacing: f32,
    placed: &'t mut HashSet<NodeId>,
}

impl TreeSink<'_, '_, '_> {
    fn insets(&self) -> (i32, i32) {
        self.env.templates.row_padding()
    }

    fn row(&self, index: usize) -> GraftResult<NodeId> {
        self.tree
            .find_child(self.section, &row_name(index))
            .ok_or_else(|| GraftError::missing(row_name(index)))
    }

    /// Finds or creates row `index`, top-anchored at `y` with height `h`.
    fn ensure_row_base(&mut self, index: usize, y: f32, height: f32) -> GraftResult<NodeId> {
        let name = row_name(index);
        let row = match self.tree.find_child(self.section, &name) {
            Some(row) => row,
            None => self
                .tree
                .create_child(self.section, name.as_str())
                .ok_or_else(|| GraftError::missing(name.clone()))?,
        };
        self.tree.set_active(row, true);
        self.tree.insert(
            row,
            LayoutElement {
                min_height: Some(height),
                preferred_height: Some(height),
                flexible_height: Some(0.0),
                ..LayoutElement::default()
            },
        );
        if let Some(rect) = self.tree.rect_mut(row) {
            *rect = RectTransform::top_strip(y, height);
        }
        Ok(row)
    }

    fn set_row_layout(&mut self, row: NodeId, spacing: f32, alignment: Alignment, expand: bool) {
        let (left, right) = self.insets();
        self.tree.insert(
            row,
            LinearLayout {
                enabled: true,
                direction: Direction::Horizontal,
                spacing,
                padding: Padding::new(left, right, 0, 0),
                child_alignment: alignment,
                control_child_width: true,
                control_child_height: true,
                force_expand_width: expand,
                force_expand_height: false,
            },
        );
    }

    /// Finds or creates a slot of `width × height` whose left edge sits
    /// `x` from the row's left edge.
    fn ensure_slot(
        &mut self,
        row: NodeId,
        name: &str,
        x: f32,
        width: f32,
        height: f32,
    ) -> GraftResult<NodeId> {
        let slot = match self.tree.find_child(row, name) {
            Some(slot) => slot,
            None => self
                .tree
                .create_child(row, name)
                .ok_or_else(|| GraftError::missing(name))?,
        };
        self.tree.set_active(slot, true);
        self.tree.insert(
            slot,
            LayoutElement {
                ignore_layout: false,
                min_width: Some(width),
                min_height: Some(height),
                preferred_width: Some(width),
                preferred_height: Some(height),
                flexible_width: Some(0.0),
                flexible_height: Some(0.0),
            },
        );
        self.tree.insert(
            slot,
            LinearLayout {
                enabled: true,
                direction: Direction::Horizontal,
                spacing: 0.0,
                padding: Padding::default(),
                child_alignment: Alignment::MiddleLeft,
                control_child_width: true,
                control_child_height: true,
                force_expand_width: false,
                force_expand_height: false,
            },
        );
        if let Some(rect) = self.tree.rect_mut(slot) {
            *rect = RectTransform {
                anchor_min: Vec2::new(0.0, 1.0),
                anchor_max: Vec2::new(0.0, 1.0),
                pivot: Vec2::new(0.0, 1.0),
                anchored_position: Vec2::new(x, 0.0),
                size_delta: Vec2::new(width, height),
                local_scale: Vec2::ONE,
            };
        }
        Ok(slot)
    }

    fn hide_slot(&mut self, row: NodeId, name: &str) {
        if let Some(slot) = self.tree.find_child(row, name) {
            self.tree.set_active(slot, false);
        }
    }
}

impl RowSink for TreeSink<'_, '_, '_> {
    type Item = Arc<ControlRequest>;
    type Slot = NodeId;
    type Error = GraftError;

    #[allow(clippy::cast_precision_loss)]
    fn open_pair_row(
        &mut self,
        index: usize,
        y: f32,
        height: f32,
        column_width: f32,
    ) -> GraftResult<(NodeId, NodeId)> {
        let row = self.ensure_row_base(index, y, height)?;
        self.hide_slot(row, SLOT_FULL);
        self.set_row_layout(row, self.spacing, Alignment::UpperLeft, false);

        let inset = self.insets().0 as f32;
        let left = self.ensure_slot(row, SLOT_LEFT, inset, column_width, height)?;
        let right_x = inset + column_width + self.spacing;
        let right = self.ensure_slot(row, SLOT_RIGHT, right_x, column_width, height)?;
        // Slots keep their sibling order so the row layout puts left first.
        self.tree.set_last_sibling(left);
        self.tree.set_last_sibling(right);
        Ok((left, right))
    }

    #[allow(clippy::cast_precision_loss)]
    fn open_full_row(&mut self, index: usize, y: f32, height: f32, width: f32) -> GraftResult<NodeId> {
        let row = self.ensure_row_base(index, y, height)?;
        self.hide_slot(row, SLOT_LEFT);
        self.hide_slot(row, SLOT_RIGHT);
        self.set_row_layout(row, 0.0, Alignment::MiddleLeft, true);

        let inset = self.insets().0 as f32;
        self.ensure_slot(row, SLOT_FULL, inset, width, height)
    }

    fn grow_row(&mut self, index: usize, height: f32) -> GraftResult<()> {
        let row = self.row(index)?;
        if let Some(element) = self.tree.get_mut::<LayoutElement>(row) {
            element.min_height = Some(height);
            element.preferred_height = Some(height);
        }
        if let Some(rect) = self.tree.rect_mut(row) {
            rect.size_delta.y = height;
        }

        let slots: Vec<NodeId> = self
            .tree
            .children(row)
            .iter()
            .copied()
            .filter(|&slot| self.tree.is_active_self(slot))
            .collect();
        for slot in slots {
            if let Some(element) = self.tree.get_mut::<LayoutElement>(slot) {
                element.min_height = Some(height);
                element.preferred_height = Some(height);
            }
            if let Some(rect) = self.tree.rect_mut(slot) {
                rect.size_delta.y = height;
            }
        }
        Ok(())
    }

    fn place(&mut self, item: Arc<ControlRequest>, slot: NodeId) -> GraftResult<()> {
        let node = builders::build_control(self.tree, self.section, slot, &item, self.env)?;
        self.placed.insert(node);
        Ok(())
    }
}
