//! Persistence of the flat settings object.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::settings::{Settings, ThemeVariant};

/// Load/save of the stored settings object. No schema knowledge lives here.
pub trait SettingsStore: Send + Sync {
	/// Returns the stored object, or `None` when nothing was saved yet.
	fn load(&self) -> Result<Option<Map<String, Value>>>;

	/// Replaces the stored object.
	fn save(&self, data: &Map<String, Value>) -> Result<()>;

	/// Loads and merges over defaults.
	fn load_settings(&self, current: ThemeVariant) -> Result<Settings> {
		let stored = self.load()?.unwrap_or_default();
		Settings::from_stored(stored, current)
	}

	/// Serializes and saves.
	fn save_settings(&self, settings: &Settings) -> Result<()> {
		self.save(&settings.to_stored()?)
	}
}

/// Settings kept in a JSON file. A missing file reads as "nothing stored".
#[derive(Debug, Clone)]
pub struct JsonFileStore {
	path: PathBuf,
}

impl JsonFileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_error(&self, error: std::io::Error) -> ConfigError {
		ConfigError::Io {
			path: self.path.clone(),
			error,
		}
	}
}

impl SettingsStore for JsonFileStore {
	fn load(&self) -> Result<Option<Map<String, Value>>> {
		let text = match std::fs::read_to_string(&self.path) {
			Ok(text) => text,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(self.io_error(err)),
		};
		if text.trim().is_empty() {
			return Ok(None);
		}
		match serde_json::from_str::<Value>(&text)? {
			Value::Object(map) => Ok(Some(map)),
			Value::Null => Ok(None),
			_ => Err(ConfigError::NotAnObject(self.path.clone())),
		}
	}

	fn save(&self, data: &Map<String, Value>) -> Result<()> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
		}
		let text = serde_json::to_string_pretty(data)?;
		std::fs::write(&self.path, text).map_err(|e| self.io_error(e))?;
		tracing::debug!(path = %self.path.display(), keys = data.len(), "config.store.saved");
		Ok(())
	}
}

/// In-memory store for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
	data: Mutex<Option<Map<String, Value>>>,
	saves: Mutex<usize>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store pre-populated with `data`.
	pub fn with_data(data: Map<String, Value>) -> Self {
		Self {
			data: Mutex::new(Some(data)),
			saves: Mutex::new(0),
		}
	}

	/// Number of successful saves.
	pub fn saves(&self) -> usize {
		*self.saves.lock()
	}

	/// Snapshot of the stored object.
	pub fn snapshot(&self) -> Option<Map<String, Value>> {
		self.data.lock().clone()
	}
}

impl SettingsStore for MemoryStore {
	fn load(&self) -> Result<Option<Map<String, Value>>> {
		Ok(self.data.lock().clone())
	}

	fn save(&self, data: &Map<String, Value>) -> Result<()> {
		*self.data.lock() = Some(data.clone());
		*self.saves.lock() += 1;
		Ok(())
	}
}
