//! Runtime timing knobs. Not part of the persisted settings.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Delays used by the scheduler and the sync pass, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timings {
	/// Trailing debounce for change notifications.
	pub debounce_ms: u64,
	/// How long after a manual tree interaction automation stays suppressed.
	pub interaction_window_ms: u64,
	/// Pause after collapsing and after scrolling, letting the tree re-render.
	pub grace_ms: u64,
	/// Wait before locating the active item for scrolling.
	pub scroll_settle_ms: u64,
	/// Delay of the first pass once the host layout is ready.
	pub layout_ready_delay_ms: u64,
}

impl Default for Timings {
	fn default() -> Self {
		Self {
			debounce_ms: 150,
			interaction_window_ms: 300,
			grace_ms: 50,
			scroll_settle_ms: 100,
			layout_ready_delay_ms: 1000,
		}
	}
}

impl Timings {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	pub fn interaction_window(&self) -> Duration {
		Duration::from_millis(self.interaction_window_ms)
	}

	pub fn grace(&self) -> Duration {
		Duration::from_millis(self.grace_ms)
	}

	pub fn scroll_settle(&self) -> Duration {
		Duration::from_millis(self.scroll_settle_ms)
	}

	pub fn layout_ready_delay(&self) -> Duration {
		Duration::from_millis(self.layout_ready_delay_ms)
	}

	/// Parses a TOML document; absent keys keep their defaults.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}
}
