//! Configuration for trailmark.
//!
//! Holds the persisted [`Settings`] object and its default-filling load path,
//! runtime [`Timings`], color helpers, the configuration-to-style mapping and a
//! declarative model of the settings screen.

pub mod color;
pub mod error;
pub mod form;
pub mod settings;
pub mod store;
pub mod style;
pub mod timings;

pub use color::{Rgb, Rgba};
pub use error::{ConfigError, Result};
pub use settings::{ColorKey, Settings, ThemeVariant};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
pub use style::{MarkKind, StyleDeclaration, declarations, render_root_rule};
pub use timings::Timings;
