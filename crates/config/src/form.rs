//! Declarative model of the settings screen.
//!
//! [`build`] describes which controls to show for the variant being edited;
//! [`apply`] folds one user edit into the settings. Rendering the controls is
//! the host's job.

use crate::color::{Rgb, Rgba};
use crate::settings::{ColorKey, Settings, TRANSPARENT, ThemeVariant};

/// Font weight choices offered by both weight dropdowns.
pub const FONT_WEIGHTS: [(&str, &str); 3] = [("200", "Thin"), ("400", "Normal"), ("700", "Bold")];

/// Border radius slider bounds, in pixels.
pub const RADIUS_RANGE: (u32, u32, u32) = (0, 50, 1);

const THEME_NOTE: &str = "Note: This might be overridden by your current theme.";

/// Boolean settings exposed as toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKey {
	OverrideThemeStyles,
	AutoScroll,
	AutoCollapse,
	/// Title background of the active branch. Written to both variants.
	TitleBackground,
	HighlightRoot,
}

/// Which mark a shape control styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeTarget {
	ActiveFolder,
	RootFolder,
}

/// One control on the settings screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
	Heading(&'static str),
	Toggle {
		key: ToggleKey,
		name: &'static str,
		desc: &'static str,
		value: bool,
	},
	/// Color picker plus its transparency slider.
	Color {
		key: ColorKey,
		name: &'static str,
		hex: String,
		transparency: u8,
	},
	/// Dropdown over `options`, each a `(value, label)` pair.
	FontWeight {
		target: ShapeTarget,
		name: &'static str,
		desc: &'static str,
		options: &'static [(&'static str, &'static str)],
		value: String,
	},
	BorderRadius {
		target: ShapeTarget,
		name: &'static str,
		desc: &'static str,
		value: u32,
	},
}

/// The settings screen for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
	pub variant: ThemeVariant,
	pub title: &'static str,
	pub controls: Vec<Control>,
}

impl SettingsForm {
	/// Color controls currently shown.
	pub fn color_keys(&self) -> Vec<ColorKey> {
		self.controls
			.iter()
			.filter_map(|c| match c {
				Control::Color { key, .. } => Some(*key),
				_ => None,
			})
			.collect()
	}
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEdit {
	Toggle(ToggleKey, bool),
	/// Hex color from the picker; alpha is kept.
	PickColor(ColorKey, String),
	/// Transparency percentage; RGB is kept.
	Transparency(ColorKey, u8),
	/// Restores the default for the variant being edited.
	ResetColor(ColorKey),
	FontWeight(ShapeTarget, String),
	BorderRadius(ShapeTarget, u32),
	/// Flips the variant being edited.
	SwitchTheme,
}

/// What the host should do after an edit was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditEffect {
	/// Save settings (always true for applied edits).
	pub save: bool,
	/// Controls shown may have changed; rebuild the form.
	pub rebuild: bool,
}

impl EditEffect {
	const SAVE: Self = Self { save: true, rebuild: false };
	const SAVE_AND_REBUILD: Self = Self { save: true, rebuild: true };
}

/// Leading integer of a length such as `"5px"`; `0` when absent.
pub fn leading_number(value: &str) -> u32 {
	let digits: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
	digits.parse().unwrap_or(0)
}

fn color_control(settings: &Settings, variant: ThemeVariant, key: ColorKey, name: &'static str) -> Control {
	let rgba = Rgba::parse_lossy(settings.color(variant, key));
	Control::Color {
		key,
		name,
		hex: rgba.rgb().to_hex(),
		transparency: rgba.transparency(),
	}
}

/// Describes the settings screen for the variant currently being edited.
pub fn build(settings: &Settings) -> SettingsForm {
	let variant = settings.editing_variant();
	let mut controls = vec![
		Control::Toggle {
			key: ToggleKey::OverrideThemeStyles,
			name: "Override theme styles",
			desc: "Use !important for style definitions",
			value: settings.use_important_tags,
		},
		Control::Toggle {
			key: ToggleKey::AutoScroll,
			name: "Center active file on scroll",
			desc: "Additionally scrolls the active file to the center of the explorer.",
			value: settings.auto_scroll,
		},
		Control::Toggle {
			key: ToggleKey::AutoCollapse,
			name: "Auto-collapse other folders",
			desc: "Collapse all folders not in the path to the active file.",
			value: settings.auto_collapse_other_folders,
		},
		Control::Heading("Active Folder"),
		Control::Toggle {
			key: ToggleKey::TitleBackground,
			name: "Enable title background",
			desc: "",
			value: settings.title_background(variant),
		},
	];

	if settings.title_background(variant) {
		controls.push(color_control(settings, variant, ColorKey::FolderTitle, "Title background color"));
	}
	controls.push(color_control(settings, variant, ColorKey::FolderBackground, "Folder background"));
	controls.push(color_control(settings, variant, ColorKey::FolderText, "Text color"));
	controls.push(Control::FontWeight {
		target: ShapeTarget::ActiveFolder,
		name: "Font weight",
		desc: THEME_NOTE,
		options: &FONT_WEIGHTS,
		value: settings.highlighted_folder_font_weight.clone(),
	});
	controls.push(Control::BorderRadius {
		target: ShapeTarget::ActiveFolder,
		name: "Border radius",
		desc: THEME_NOTE,
		value: leading_number(&settings.highlighted_folder_border_radius),
	});

	controls.push(Control::Heading("Root Folder"));
	controls.push(Control::Toggle {
		key: ToggleKey::HighlightRoot,
		name: "Highlight root folders",
		desc: "",
		value: settings.highlight_parent_folder,
	});
	if settings.highlight_parent_folder {
		controls.push(color_control(settings, variant, ColorKey::RootBackground, "Root background"));
		controls.push(color_control(settings, variant, ColorKey::RootText, "Root text color"));
		controls.push(Control::FontWeight {
			target: ShapeTarget::RootFolder,
			name: "Root font weight",
			desc: THEME_NOTE,
			options: &FONT_WEIGHTS,
			value: settings.highlighted_parent_folder_font_weight.clone(),
		});
		controls.push(Control::BorderRadius {
			target: ShapeTarget::RootFolder,
			name: "Root border radius",
			desc: "",
			value: leading_number(&settings.highlighted_parent_folder_border_radius),
		});
	}

	SettingsForm {
		variant,
		title: match variant {
			ThemeVariant::Light => "Light Theme",
			ThemeVariant::Dark => "Dark Theme",
		},
		controls,
	}
}

/// Applies one edit to `settings`.
pub fn apply(settings: &mut Settings, edit: FormEdit) -> EditEffect {
	let variant = settings.editing_variant();
	match edit {
		FormEdit::Toggle(ToggleKey::OverrideThemeStyles, on) => settings.use_important_tags = on,
		FormEdit::Toggle(ToggleKey::AutoScroll, on) => settings.auto_scroll = on,
		FormEdit::Toggle(ToggleKey::AutoCollapse, on) => settings.auto_collapse_other_folders = on,
		FormEdit::Toggle(ToggleKey::TitleBackground, on) => {
			set_title_background(settings, on);
			return EditEffect::SAVE_AND_REBUILD;
		}
		FormEdit::Toggle(ToggleKey::HighlightRoot, on) => {
			settings.highlight_parent_folder = on;
			return EditEffect::SAVE_AND_REBUILD;
		}
		FormEdit::PickColor(key, hex) => {
			let rgb = Rgb::from_hex(&hex).unwrap_or_default();
			let slot = settings.color_mut(variant, key);
			let current = Rgba::parse_lossy(slot);
			*slot = current.with_rgb(rgb).to_string();
		}
		FormEdit::Transparency(key, percent) => {
			let slot = settings.color_mut(variant, key);
			let current = Rgba::parse_lossy(slot);
			*slot = current.with_transparency(percent).to_string();
		}
		FormEdit::ResetColor(key) => {
			let default = Settings::default().color(variant, key).to_string();
			*settings.color_mut(variant, key) = default;
			return EditEffect::SAVE_AND_REBUILD;
		}
		FormEdit::FontWeight(ShapeTarget::ActiveFolder, weight) => settings.highlighted_folder_font_weight = weight,
		FormEdit::FontWeight(ShapeTarget::RootFolder, weight) => settings.highlighted_parent_folder_font_weight = weight,
		FormEdit::BorderRadius(target, px) => {
			let px = px.clamp(RADIUS_RANGE.0, RADIUS_RANGE.1);
			let value = format!("{px}px");
			match target {
				ShapeTarget::ActiveFolder => settings.highlighted_folder_border_radius = value,
				ShapeTarget::RootFolder => settings.highlighted_parent_folder_border_radius = value,
			}
		}
		FormEdit::SwitchTheme => {
			settings.editing_dark_theme = settings.editing_variant().toggled() == ThemeVariant::Dark;
			return EditEffect::SAVE_AND_REBUILD;
		}
	}
	EditEffect::SAVE
}

/// Turning the title background off parks both variants' title colors in
/// their `previous*` slots; turning it on restores them unless they are
/// fully transparent.
fn set_title_background(settings: &mut Settings, on: bool) {
	settings.light_highlight_folder_title_color = on;
	settings.dark_highlight_folder_title_color = on;

	for variant in [ThemeVariant::Light, ThemeVariant::Dark] {
		if on {
			let previous = settings.previous_title_color_mut(variant).clone();
			let restored = if previous == TRANSPARENT {
				Settings::default().color(variant, ColorKey::FolderTitle).to_string()
			} else {
				previous
			};
			*settings.color_mut(variant, ColorKey::FolderTitle) = restored;
		} else {
			let current = settings.color(variant, ColorKey::FolderTitle).to_string();
			*settings.previous_title_color_mut(variant) = current;
			*settings.color_mut(variant, ColorKey::FolderTitle) = TRANSPARENT.to_string();
		}
	}
}
