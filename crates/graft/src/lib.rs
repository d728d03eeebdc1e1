//! # Graft
//!
//! Adds declarative settings tabs to a host game's own settings panel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           GRAFT                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  host frame ──> Runtime ──> AttachAttempt ──> HostProbe     │
//! │                    │                                        │
//! │                    ▼                                        │
//! │             NativeSettings ──> graft_engine passes          │
//! │                    │                                        │
//! │                    ▼                                        │
//! │   graft_tree (host nodes)      graft_prefs (stored values)  │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `attach`: bounded polling for host controllers
//! - `probe`: host lookups
//! - `runtime`: per-frame driver
//! - `demo`: a tab with one control of every kind

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod attach;
pub mod demo;
pub mod probe;
pub mod runtime;

pub use graft_engine as engine;
pub use graft_prefs as prefs;
pub use graft_shared as shared;
pub use graft_tree as tree;

pub use attach::{AttachAttempt, AttachPoll, SceneId};
pub use graft_engine::{
    ButtonSpec, ControlSpec, DropdownSpec, EngineConfig, GraftError, GraftResult, InjectOutcome,
    InputSpec, LabelSpec, NativeSettings, SettingsTab, SliderSpec, ToggleSpec, UiRef,
};
pub use graft_shared::{Language, LocalText};
pub use probe::{HostProbe, TreeProbe};
pub use runtime::{Injection, Runtime, RuntimeStats, TickReport};
