//! # Graft Host Tree
//!
//! Arena model of a foreign, retained UI tree:
//! - Nodes are addressed by [`NodeId`]s that are never reused, so a stale id
//!   simply stops resolving once its node is destroyed
//! - Every node owns a [`RectTransform`] and a list of typed [`Component`]s
//! - Templates are deep-cloned with [`UiTree::instantiate`]
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       HOST TREE                           │
//! ├───────────────────────────────────────────────────────────┤
//! │  UiTree ──> Node ──> RectTransform   (geometry)           │
//! │                 └──> Components      (layout, widgets,    │
//! │                                       text, bookkeeping)  │
//! │  SettingsPanel ──> SectionRegistrar  (host tab switching) │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The tree is single-threaded. [`SharedTree`] wraps it in a
//! `parking_lot::Mutex` so several owners can hold a handle to the same
//! scene.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod component;
pub mod fixture;
pub mod geometry;
pub mod node;
pub mod panel;
pub mod tree;
pub mod widgets;

pub use component::{
    Alignment, Component, ComponentType, ContentSizeFitter, ControlTag, Controller, ControllerKind,
    Direction,
    Fader, FitMode, GridConstraint, GridLayout, HostLocalization, LayoutElement, LinearLayout,
    LocalisationManager, Padding, Text,
};
pub use fixture::{FixtureOptions, HostFixture};
pub use geometry::{Rect, RectTransform};
pub use node::{Node, NodeFlags, NodeId};
pub use panel::{SectionList, SectionRecord, SectionRegistrar, SettingsPanel};
pub use tree::{SharedTree, UiTree};
pub use widgets::{
    Button, Event, InputField, Listener, SettingDropdown, SettingSlider, SettingToggle,
};
