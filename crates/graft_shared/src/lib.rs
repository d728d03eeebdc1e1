//! # Graft Shared
//!
//! Common value types used by the host tree model, the preference store and
//! the injection engine.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on another graft crate. Everything in here is
//! plain data that can be copied across the tree/engine boundary.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod text;

pub use constants::{
    DEFAULT_CELL_SIZE, DEFAULT_SPACING, MIN_CONTENT_INSET, PLACEHOLDER_NAME, SECTION_PREFIX,
    TAB_PREFIX,
};
pub use math::Vec2;
pub use text::{Language, LocalText};
