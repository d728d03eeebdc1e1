//! # Graft Engine
//!
//! Injects declarative settings controls into a host settings panel the
//! engine does not own. Nothing about the host layout is hard-coded: cell
//! sizes, spacing and insets are read off the panel's own templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       INJECTION PASS                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Templates::resolve ──> ensure_tab / ensure_section          │
//! │          │                        │                          │
//! │          ▼                        ▼                          │
//! │   PackMetrics ──> RowPacker ──> TreeSink ──> build_control   │
//! │                                                  │           │
//! │                  ensure_section_binding <────────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Paths
//!
//! - **Fast path**: no control declares a preferred size. Controls are
//!   children of the section and the host's own layout group arranges them.
//! - **General path**: at least one preferred size. Layout groups on the
//!   section are switched off and controls are packed into two-column rows.
//!
//! ## Usage
//!
//! ```ignore
//! let settings = NativeSettings::init(tree, store, EngineConfig::default(), Language::English);
//! let tab = settings.register_tab("my_mod", LocalText::new("tab", "我的模组", "My Mod"), true);
//! tab.create_toggle(ToggleSpec::new("fx", "MyMod_Fx", title, true))?;
//! settings.inject(settings_root, false)?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod builders;
pub mod config;
pub mod context;
pub mod error;
pub mod handles;
pub mod localization;
pub mod packing;
pub mod registry;
pub mod request;
pub mod rows;
pub mod section;
pub mod templates;

pub use bridge::BridgeOutcome;
pub use config::{AttachConfig, EngineConfig, LayoutDefaults, TemplatePaths};
pub use context::{Context, ContextRegistry};
pub use error::{GraftError, GraftResult};
pub use handles::{
    ButtonHandle, DropdownHandle, InputHandle, LabelHandle, SliderHandle, ToggleHandle,
};
pub use packing::{PackMetrics, PackSummary, RowLayout, RowPacker, RowSink};
pub use registry::{InjectOutcome, NativeSettings, SettingsTab};
pub use request::{
    ButtonSpec, ControlKind, ControlSpec, DropdownSpec, InputSpec, LabelSpec, SliderSpec,
    ToggleSpec, UiRef,
};
pub use rows::PassReport;
pub use templates::Templates;
