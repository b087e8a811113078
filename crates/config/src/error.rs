//! Error types for settings and timings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading or writing a settings file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Stored settings are not valid JSON, or do not fit the schema.
	#[error("settings JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Stored settings parsed, but the top level is not an object.
	#[error("stored settings are not a JSON object: {0}")]
	NotAnObject(PathBuf),

	/// Error parsing a timings TOML document.
	#[error("timings TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A color value could not be parsed.
	#[error("invalid color format: {0}")]
	InvalidColor(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
