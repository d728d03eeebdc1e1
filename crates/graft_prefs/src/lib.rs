//! # Graft Prefs
//!
//! Durable storage for the values of persisted settings controls.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────────────────┐
//! │  Control change  │────>│  SharedStore (Mutex<dyn ..>) │
//! └──────────────────┘     └──────────────┬───────────────┘
//!                                         │
//!                        ┌────────────────┴────────────────┐
//!                        │                                 │
//!                 ┌──────▼──────┐                  ┌───────▼───────┐
//!                 │ MemoryStore │                  │ TomlFileStore │
//!                 └─────────────┘                  └───────┬───────┘
//!                                                          │ flush
//!                                                  ┌───────▼───────┐
//!                                                  │  prefs.toml   │
//!                                                  └───────────────┘
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
pub mod store;
pub mod value;

pub use error::{PrefsError, PrefsResult};
pub use file::{FileStoreConfig, TomlFileStore};
pub use store::{shared, MemoryStore, SettingsStore, SharedStore};
pub use value::SettingValue;
