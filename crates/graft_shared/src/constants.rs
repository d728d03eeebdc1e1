//! # Naming & Layout Constants
//!
//! Node names the engine writes into the host tree and the fallback layout
//! metrics used when the host exposes no grid configuration.
//!
//! **NOTE:** Names written here become part of the host tree. Renaming one
//! orphans every node a previous build created under the old name.

use crate::math::Vec2;

// =============================================================================
// SYNTHESIZED NODE NAMES
// =============================================================================

/// Prefix of a synthesized navigation tab (`Tab_<tab id>`).
pub const TAB_PREFIX: &str = "Tab_";

/// Prefix of a synthesized content section (`Sec_<tab id>`).
pub const SECTION_PREFIX: &str = "Sec_";

/// Child kept in an empty section so host auto-sizing does not collapse it.
pub const PLACEHOLDER_NAME: &str = "Placeholder";

/// Prefix of a packing row (`GraftRow_<index>`).
pub const ROW_PREFIX: &str = "GraftRow_";

/// Left slot of a two-column row.
pub const SLOT_LEFT: &str = "GraftSlot_Left";

/// Right slot of a two-column row.
pub const SLOT_RIGHT: &str = "GraftSlot_Right";

/// Single slot of a full-width row.
pub const SLOT_FULL: &str = "GraftSlot_Full";

// =============================================================================
// CONTROL TEMPLATE CHILD NAMES
// =============================================================================

/// Title child of setting controls (and the label reference).
pub const TITLE_CHILD: &str = "Title";

/// Text child of the button reference.
pub const BUTTON_TEXT_CHILD: &str = "Text";

/// Slider body inside the slider reference.
pub const SLIDER_BODY: &str = "Slider";

/// Name the slider body takes once converted into a text input.
pub const INPUT_BODY: &str = "Input";

/// Slider parts stripped when a slider is converted into a text input.
pub const SLIDER_PARTS: [&str; 3] = ["Value", "Fill Area", "Handle"];

/// Value display inside the slider body.
pub const SLIDER_VALUE: &str = "Value";

// =============================================================================
// FALLBACK METRICS
// =============================================================================

/// Grid cell size when the reference section has no grid layout.
pub const DEFAULT_CELL_SIZE: Vec2 = Vec2::new(300.0, 60.0);

/// Grid spacing when the reference section has no grid layout.
pub const DEFAULT_SPACING: Vec2 = Vec2::new(10.0, 10.0);

/// Column count of the fallback grid constraint.
pub const DEFAULT_COLUMN_COUNT: i32 = 2;

/// Lower bound for both content insets.
pub const MIN_CONTENT_INSET: i32 = 30;

/// How many stale rows past the used count are scanned for deactivation.
pub const STALE_ROW_LOOKAHEAD: usize = 50;

/// Tolerance used when comparing layout sizes.
pub const LAYOUT_EPSILON: f32 = 0.01;

// =============================================================================
// ATTACH SCHEDULING
// =============================================================================

/// Frames an attach attempt polls for its host controller before giving up.
pub const ATTACH_MAX_ATTEMPTS: u32 = 60;

/// Frames between two polls of the host language.
pub const LANGUAGE_POLL_INTERVAL: u32 = 10;
