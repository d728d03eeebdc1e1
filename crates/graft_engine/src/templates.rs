//! # Metrics Resolver
//!
//! Reads layout conventions off a live host panel instead of hard-coding
//! them. The result is an immutable snapshot recomputed on every rebuild.
//!
//! ```text
//!  Sec_Audio (reference section)
//!  ┌──────────────────────────────────────────────┐
//!  │<─ inset ─>┌──────────────────────┐<─ inset ─>│
//!  │           │ MasterVolume         │           │
//!  │           └──────────────────────┘           │
//!  └──────────────────────────────────────────────┘
//! ```
//!
//! The inset is the measured gap between the reference section and the
//! slider reference; it overrides the grid padding when positive and is
//! floored at `min_content_inset`.

use graft_shared::{Language, Vec2};
use graft_tree::{GridConstraint, GridLayout, NodeId, Padding, UiTree};

use crate::config::EngineConfig;
use crate::error::{GraftError, GraftResult};

/// Metrics snapshot of one host panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    /// Tabs container.
    pub tabs_root: NodeId,
    /// Sections container.
    pub sections_root: NodeId,
    /// Reference section.
    pub section: NodeId,
    /// Reference tab.
    pub tab: NodeId,
    /// Slider-like control.
    pub slider: NodeId,
    /// Toggle-like control.
    pub toggle: NodeId,
    /// Dropdown-like control.
    pub dropdown: NodeId,
    /// Button-like control.
    pub button: NodeId,
    /// Label.
    pub label: NodeId,
    /// Language in effect when the snapshot was taken.
    pub language: Language,
    /// Grid cell size.
    pub cell_size: Vec2,
    /// Grid spacing.
    pub spacing: Vec2,
    /// Grid padding.
    pub padding: Padding,
    /// Grid fill-order constraint.
    pub constraint: GridConstraint,
    /// Count used by the constraint.
    pub constraint_count: i32,
    /// Reference section pivot x.
    pub section_pivot_x: f32,
    /// Reference section offset-min x.
    pub section_offset_min_x: f32,
    /// Reference section offset-max x.
    pub section_offset_max_x: f32,
    /// Left content inset.
    pub inset_left: i32,
    /// Right content inset.
    pub inset_right: i32,
}

impl Templates {
    /// Resolves every reference under `content`.
    ///
    /// # Errors
    ///
    /// Returns [`GraftError::Discovery`] naming the first reference that is
    /// missing. Nothing is modified in that case.
    pub fn resolve(
        tree: &UiTree,
        content: NodeId,
        config: &EngineConfig,
        language: Language,
    ) -> GraftResult<Self> {
        let paths = &config.paths;
        let find = |from: NodeId, path: &str| {
            tree.find_path(from, path)
                .ok_or_else(|| GraftError::missing(path))
        };

        let tabs_root = find(content, &paths.tabs)?;
        let sections_root = find(content, &paths.sections)?;
        let tab = find(tabs_root, &paths.tab_template)?;
        let section = find(sections_root, &paths.section_template)?;
        let slider = find(section, &paths.slider)?;
        let dropdown = find(section, &paths.dropdown)?;
        let toggle = find(section, &paths.toggle)?;
        let root = tree
            .root_of(content)
            .ok_or_else(|| GraftError::missing(&paths.button))?;
        let button = find(root, &paths.button)?;
        let label = find(slider, &paths.label)?;

        let section_rect = tree
            .rect(section)
            .copied()
            .ok_or_else(|| GraftError::missing(&paths.section_template))?;

        let defaults = &config.layout;
        let (cell_size, spacing, padding, constraint, constraint_count) =
            match tree.get::<GridLayout>(section) {
                Some(grid) => (
                    grid.cell_size,
                    grid.spacing,
                    grid.padding,
                    grid.constraint,
                    grid.constraint_count,
                ),
                None => (
                    defaults.cell_size,
                    defaults.spacing,
                    Padding::default(),
                    GridConstraint::FixedColumnCount,
                    defaults.column_count,
                ),
            };

        let (measured_left, measured_right) = measure_insets(tree, section, slider);
        let inset_left = if measured_left > 0 { measured_left } else { padding.left };
        let inset_right = if measured_right > 0 { measured_right } else { padding.right };

        Ok(Self {
            tabs_root,
            sections_root,
            section,
            tab,
            slider,
            toggle,
            dropdown,
            button,
            label,
            language,
            cell_size,
            spacing,
            padding,
            constraint,
            constraint_count,
            section_pivot_x: section_rect.pivot.x,
            section_offset_min_x: section_rect.offset_min().x,
            section_offset_max_x: section_rect.offset_max().x,
            inset_left: inset_left.max(defaults.min_content_inset),
            inset_right: inset_right.max(defaults.min_content_inset),
        })
    }

    /// Horizontal padding applied to every synthesized row.
    #[must_use]
    pub const fn row_padding(&self) -> (i32, i32) {
        let left = if self.inset_left > 0 {
            self.inset_left
        } else {
            self.padding.left
        };
        let right = if self.inset_right > 0 {
            self.inset_right
        } else {
            self.padding.right
        };
        (left, right)
    }
}

/// Gap between `section` and `child` on each side, in the section's space,
/// rounded and floored at zero.
#[allow(clippy::cast_possible_truncation)]
fn measure_insets(tree: &UiTree, section: NodeId, child: NodeId) -> (i32, i32) {
    let (Some(outer), Some(inner)) = (
        tree.rect_in_space_of(section, section),
        tree.rect_in_space_of(child, section),
    ) else {
        return (0, 0);
    };

    let left = (inner.x - outer.x).round() as i32;
    let right = (outer.right() - inner.right()).round() as i32;
    (left.max(0), right.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_tree::fixture::{FIXTURE_CONTROL_INSET, FIXTURE_GRID_PADDING};
    use graft_tree::{FixtureOptions, HostFixture, RectTransform};

    fn resolve(options: &FixtureOptions) -> (UiTree, HostFixture, GraftResult<Templates>) {
        let mut tree = UiTree::new();
        let host = HostFixture::build(&mut tree, options);
        let result = Templates::resolve(
            &tree,
            host.content,
            &EngineConfig::default(),
            Language::English,
        );
        (tree, host, result)
    }

    #[test]
    fn test_resolve_reads_grid() {
        let (_, host, result) = resolve(&FixtureOptions::default());
        let templates = result.unwrap();

        assert_eq!(Some(templates.section), host.sec_audio);
        assert_eq!(Some(templates.button), host.close);
        assert_eq!(templates.cell_size, Vec2::new(420.0, 64.0));
        assert_eq!(templates.padding, FIXTURE_GRID_PADDING);
        assert_eq!(templates.constraint, GridConstraint::FixedColumnCount);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_measured_inset_wins_over_padding() {
        let (_, _, result) = resolve(&FixtureOptions::default());
        let templates = result.unwrap();

        assert_eq!(templates.inset_left, FIXTURE_CONTROL_INSET as i32);
        assert_eq!(templates.inset_right, FIXTURE_CONTROL_INSET as i32);
        assert_eq!(templates.section_offset_min_x, 20.0);
        assert_eq!(templates.section_offset_max_x, -20.0);
    }

    #[test]
    fn test_defaults_without_grid() {
        let options = FixtureOptions {
            with_grid: false,
            ..FixtureOptions::default()
        };
        let (_, _, result) = resolve(&options);
        let templates = result.unwrap();

        assert_eq!(templates.cell_size, Vec2::new(300.0, 60.0));
        assert_eq!(templates.spacing, Vec2::new(10.0, 10.0));
        assert_eq!(templates.constraint_count, 2);
    }

    #[test]
    fn test_inset_floor() {
        let mut tree = UiTree::new();
        let host = HostFixture::build(&mut tree, &FixtureOptions::default());
        let slider = host.slider.unwrap();
        *tree.rect_mut(slider).unwrap() = RectTransform::top_strip(0.0, 64.0);

        let templates = Templates::resolve(
            &tree,
            host.content,
            &EngineConfig::default(),
            Language::English,
        )
        .unwrap();

        // No measurable gap: grid padding (24) applies, then the floor.
        assert_eq!(templates.inset_left, 30);
        assert_eq!(templates.inset_right, 30);
    }

    #[test]
    fn test_missing_reference_fails_closed() {
        for missing in ["Sec_Audio", "MasterVolume", "Microphone", "PushToTalk", "Close", "Title"] {
            let options = FixtureOptions {
                omit: Some(missing),
                ..FixtureOptions::default()
            };
            let (_, _, result) = resolve(&options);
            match result {
                Err(GraftError::Discovery { missing: path }) => {
                    assert!(path.ends_with(missing), "{path} should name {missing}");
                }
                other => panic!("expected discovery failure for {missing}, got {other:?}"),
            }
        }
    }
}
