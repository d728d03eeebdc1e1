//! # Engine Configuration
//!
//! Every knob has a default matching the host's stock settings panel, so an
//! empty TOML document is a valid configuration:
//!
//! ```toml
//! fallback_language = "English"
//!
//! [paths]
//! content = "Window/Content"
//! section_template = "Sec_Audio"
//!
//! [layout]
//! min_content_inset = 30
//!
//! [attach]
//! max_attempts = 60
//! ```

use std::path::Path;

use graft_shared::constants::{
    ATTACH_MAX_ATTEMPTS, DEFAULT_CELL_SIZE, DEFAULT_COLUMN_COUNT, DEFAULT_SPACING,
    LANGUAGE_POLL_INTERVAL, MIN_CONTENT_INSET, STALE_ROW_LOOKAHEAD,
};
use graft_shared::{Language, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{GraftError, GraftResult};

/// Where the reference nodes live inside a host panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    /// Content region, relative to the settings panel.
    pub content: String,
    /// Tabs container, relative to the content region.
    pub tabs: String,
    /// Sections container, relative to the content region.
    pub sections: String,
    /// Reference tab, inside the tabs container.
    pub tab_template: String,
    /// Reference section, inside the sections container.
    pub section_template: String,
    /// Slider-like control, inside the reference section.
    pub slider: String,
    /// Dropdown-like control, inside the reference section.
    pub dropdown: String,
    /// Toggle-like control, inside the reference section.
    pub toggle: String,
    /// Button-like control, relative to the top-most root.
    pub button: String,
    /// Label, inside the slider reference.
    pub label: String,
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            content: "Window/Content".into(),
            tabs: "Tabs".into(),
            sections: "SettingsSection".into(),
            tab_template: "Tab_General".into(),
            section_template: "Sec_Audio".into(),
            slider: "MasterVolume".into(),
            dropdown: "Microphone".into(),
            toggle: "PushToTalk".into(),
            button: "UISettings/Window/Content/ButtonContainer/Close".into(),
            label: "Title".into(),
        }
    }
}

/// Fallback grid metrics and packing limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDefaults {
    /// Cell size used when the reference section has no grid.
    pub cell_size: Vec2,
    /// Spacing used when the reference section has no grid.
    pub spacing: Vec2,
    /// Column count used when the reference section has no grid.
    pub column_count: i32,
    /// Lower bound for both content insets.
    pub min_content_inset: i32,
    /// How far past the used rows stale rows are searched.
    pub stale_row_lookahead: usize,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            spacing: DEFAULT_SPACING,
            column_count: DEFAULT_COLUMN_COUNT,
            min_content_inset: MIN_CONTENT_INSET,
            stale_row_lookahead: STALE_ROW_LOOKAHEAD,
        }
    }
}

/// Attach polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachConfig {
    /// Frames an attach attempt polls for its controller.
    pub max_attempts: u32,
    /// Frames between language polls.
    pub language_poll_interval: u32,
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            max_attempts: ATTACH_MAX_ATTEMPTS,
            language_poll_interval: LANGUAGE_POLL_INTERVAL,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Template locations.
    pub paths: TemplatePaths,
    /// Layout fallbacks.
    pub layout: LayoutDefaults,
    /// Attach polling.
    pub attach: AttachConfig,
    /// Language assumed when the host reports none.
    pub fallback_language: Language,
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GraftError::Config`] if the document is not valid TOML or
    /// has fields of the wrong type.
    pub fn from_toml_str(raw: &str) -> GraftResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GraftError::ConfigIo`] if the file cannot be read, or
    /// [`GraftError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> GraftResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| GraftError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Fast polling for tests and tools: attach gives up after a handful
    /// of frames and the language is checked every frame.
    #[must_use]
    pub fn eager() -> Self {
        Self {
            attach: AttachConfig {
                max_attempts: 5,
                language_poll_interval: 0,
            },
            ..Self::default()
        }
    }
}
