//! The persisted settings object.
//!
//! Keys are camelCase on disk and match the plugin's historical data layout.
//! Loading merges whatever was stored over the defaults, one key at a time, so
//! a single malformed value never discards the rest of the user's settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Light or dark theme variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeVariant {
	/// Light theme.
	#[default]
	Light,
	/// Dark theme.
	Dark,
}

impl ThemeVariant {
	/// Lowercase name, also the prefix of per-variant setting keys.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}

	/// The other variant.
	pub const fn toggled(self) -> Self {
		match self {
			Self::Light => Self::Dark,
			Self::Dark => Self::Light,
		}
	}
}

/// Per-variant color settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
	/// Background of the branch containing the active item.
	FolderBackground,
	/// Background of that branch's title row.
	FolderTitle,
	/// Text color of that branch.
	FolderText,
	/// Background of the root branch.
	RootBackground,
	/// Text color of the root branch.
	RootText,
}

impl ColorKey {
	/// Every color key, in form order.
	pub const ALL: [ColorKey; 5] = [Self::FolderTitle, Self::FolderBackground, Self::FolderText, Self::RootBackground, Self::RootText];

	/// Key suffix shared by the light and dark variants.
	pub const fn base_key(self) -> &'static str {
		match self {
			Self::FolderBackground => "HighlightedFolderColor",
			Self::FolderTitle => "HighlightedFolderTitleColor",
			Self::FolderText => "HighlightedFolderTextColor",
			Self::RootBackground => "HighlightedParentFolderColor",
			Self::RootText => "HighlightedParentFolderTextColor",
		}
	}

	/// Full stored key for `variant`, e.g. `darkHighlightedFolderColor`.
	pub fn stored_key(self, variant: ThemeVariant) -> String {
		format!("{}{}", variant.as_str(), self.base_key())
	}
}

/// Color used when the title background is switched off.
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// Recognized options, persisted as a flat key-value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
	pub auto_scroll: bool,
	pub use_important_tags: bool,
	pub auto_collapse_other_folders: bool,

	pub light_highlighted_folder_color: String,
	pub light_highlight_folder_title_color: bool,
	pub light_highlighted_folder_title_color: String,
	pub light_highlighted_folder_text_color: String,
	pub light_highlighted_parent_folder_color: String,
	pub light_highlighted_parent_folder_text_color: String,
	pub previous_light_highlighted_folder_title_color: String,

	pub dark_highlighted_folder_color: String,
	pub dark_highlight_folder_title_color: bool,
	pub dark_highlighted_folder_title_color: String,
	pub dark_highlighted_folder_text_color: String,
	pub dark_highlighted_parent_folder_color: String,
	pub dark_highlighted_parent_folder_text_color: String,
	pub previous_dark_highlighted_folder_title_color: String,

	/// Enables the root-branch mark.
	pub highlight_parent_folder: bool,
	pub highlighted_folder_border_radius: String,
	pub highlighted_parent_folder_border_radius: String,
	pub highlighted_folder_font_weight: String,
	pub highlighted_parent_folder_font_weight: String,

	/// Which variant the settings screen is editing.
	pub editing_dark_theme: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self::defaults_for(ThemeVariant::Light)
	}
}

impl Settings {
	/// Defaults, with the settings screen opened on the host's current variant.
	pub fn defaults_for(current: ThemeVariant) -> Self {
		Self {
			auto_scroll: true,
			use_important_tags: false,
			auto_collapse_other_folders: false,

			light_highlighted_folder_color: "rgba(238, 238, 238, 1)".into(),
			light_highlight_folder_title_color: false,
			light_highlighted_folder_title_color: "rgba(255, 255, 255, 0)".into(),
			light_highlighted_folder_text_color: "rgba(0, 0, 0, 1)".into(),
			light_highlighted_parent_folder_color: "rgba(221, 221, 221, 1)".into(),
			light_highlighted_parent_folder_text_color: "rgba(0, 0, 0, 1)".into(),
			previous_light_highlighted_folder_title_color: "rgba(255, 255, 255, 0.8)".into(),

			dark_highlighted_folder_color: "rgba(51, 51, 51, 1)".into(),
			dark_highlight_folder_title_color: false,
			dark_highlighted_folder_title_color: "rgba(51, 51, 51, 1)".into(),
			dark_highlighted_folder_text_color: "rgba(255, 255, 255, 1)".into(),
			dark_highlighted_parent_folder_color: "rgba(68, 68, 68, 1)".into(),
			dark_highlighted_parent_folder_text_color: "rgba(255, 255, 255, 1)".into(),
			previous_dark_highlighted_folder_title_color: "rgba(51, 51, 51, 1)".into(),

			highlight_parent_folder: false,
			highlighted_folder_border_radius: "5px".into(),
			highlighted_parent_folder_border_radius: "5px".into(),
			highlighted_folder_font_weight: "bold".into(),
			highlighted_parent_folder_font_weight: "bold".into(),

			editing_dark_theme: current == ThemeVariant::Dark,
		}
	}

	/// Merges a stored object over the defaults.
	///
	/// Unknown keys are ignored. A key whose value has the wrong type keeps
	/// its default and is reported with a warning.
	pub fn from_stored(stored: Map<String, Value>, current: ThemeVariant) -> Result<Self> {
		let defaults = Self::defaults_for(current);
		let Value::Object(mut merged) = serde_json::to_value(&defaults)? else {
			return Ok(defaults);
		};

		for (key, value) in stored {
			if !merged.contains_key(&key) {
				tracing::trace!(key = %key, "config.settings.unknown_key");
				continue;
			}
			let previous = merged.insert(key.clone(), value);
			if serde_json::from_value::<Settings>(Value::Object(merged.clone())).is_err() {
				tracing::warn!(key = %key, "config.settings.invalid_value");
				if let Some(previous) = previous {
					merged.insert(key, previous);
				}
			}
		}

		Ok(serde_json::from_value(Value::Object(merged))?)
	}

	/// Serializes into the flat stored layout.
	pub fn to_stored(&self) -> Result<Map<String, Value>> {
		match serde_json::to_value(self)? {
			Value::Object(map) => Ok(map),
			_ => Ok(Map::new()),
		}
	}

	/// Variant currently shown in the settings screen.
	pub fn editing_variant(&self) -> ThemeVariant {
		if self.editing_dark_theme { ThemeVariant::Dark } else { ThemeVariant::Light }
	}

	/// Reads a per-variant color.
	pub fn color(&self, variant: ThemeVariant, key: ColorKey) -> &str {
		match (variant, key) {
			(ThemeVariant::Light, ColorKey::FolderBackground) => &self.light_highlighted_folder_color,
			(ThemeVariant::Light, ColorKey::FolderTitle) => &self.light_highlighted_folder_title_color,
			(ThemeVariant::Light, ColorKey::FolderText) => &self.light_highlighted_folder_text_color,
			(ThemeVariant::Light, ColorKey::RootBackground) => &self.light_highlighted_parent_folder_color,
			(ThemeVariant::Light, ColorKey::RootText) => &self.light_highlighted_parent_folder_text_color,
			(ThemeVariant::Dark, ColorKey::FolderBackground) => &self.dark_highlighted_folder_color,
			(ThemeVariant::Dark, ColorKey::FolderTitle) => &self.dark_highlighted_folder_title_color,
			(ThemeVariant::Dark, ColorKey::FolderText) => &self.dark_highlighted_folder_text_color,
			(ThemeVariant::Dark, ColorKey::RootBackground) => &self.dark_highlighted_parent_folder_color,
			(ThemeVariant::Dark, ColorKey::RootText) => &self.dark_highlighted_parent_folder_text_color,
		}
	}

	/// Mutable access to a per-variant color.
	pub fn color_mut(&mut self, variant: ThemeVariant, key: ColorKey) -> &mut String {
		match (variant, key) {
			(ThemeVariant::Light, ColorKey::FolderBackground) => &mut self.light_highlighted_folder_color,
			(ThemeVariant::Light, ColorKey::FolderTitle) => &mut self.light_highlighted_folder_title_color,
			(ThemeVariant::Light, ColorKey::FolderText) => &mut self.light_highlighted_folder_text_color,
			(ThemeVariant::Light, ColorKey::RootBackground) => &mut self.light_highlighted_parent_folder_color,
			(ThemeVariant::Light, ColorKey::RootText) => &mut self.light_highlighted_parent_folder_text_color,
			(ThemeVariant::Dark, ColorKey::FolderBackground) => &mut self.dark_highlighted_folder_color,
			(ThemeVariant::Dark, ColorKey::FolderTitle) => &mut self.dark_highlighted_folder_title_color,
			(ThemeVariant::Dark, ColorKey::FolderText) => &mut self.dark_highlighted_folder_text_color,
			(ThemeVariant::Dark, ColorKey::RootBackground) => &mut self.dark_highlighted_parent_folder_color,
			(ThemeVariant::Dark, ColorKey::RootText) => &mut self.dark_highlighted_parent_folder_text_color,
		}
	}

	/// Whether the title background is enabled for `variant`.
	pub fn title_background(&self, variant: ThemeVariant) -> bool {
		match variant {
			ThemeVariant::Light => self.light_highlight_folder_title_color,
			ThemeVariant::Dark => self.dark_highlight_folder_title_color,
		}
	}

	/// Remembered title color for `variant`, restored when the title background is re-enabled.
	pub fn previous_title_color_mut(&mut self, variant: ThemeVariant) -> &mut String {
		match variant {
			ThemeVariant::Light => &mut self.previous_light_highlighted_folder_title_color,
			ThemeVariant::Dark => &mut self.previous_dark_highlighted_folder_title_color,
		}
	}
}
