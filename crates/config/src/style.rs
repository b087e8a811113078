//! Mapping from settings to style declarations.
//!
//! Stateless: callers re-run [`declarations`] whenever the active settings
//! change and hand the result to whatever renders styles.

use crate::settings::{ColorKey, Settings, ThemeVariant};

/// Classification tag applied to a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkKind {
	/// The nearest materialized branch containing the active item.
	Active,
	/// The top-level ancestor branch, when distinct from the active one.
	Root,
	/// Any other materialized ancestor branch.
	Intermediate,
}

impl MarkKind {
	/// Every mark kind.
	pub const ALL: [MarkKind; 3] = [Self::Active, Self::Root, Self::Intermediate];

	/// Class name styled by the declarations below.
	pub const fn class_name(self) -> &'static str {
		match self {
			Self::Active => "highlighted-folder",
			Self::Root => "highlighted-parent-folder",
			Self::Intermediate => "highlighted-intermediate-folder",
		}
	}
}

/// One custom-property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
	pub property: &'static str,
	pub value: String,
}

impl StyleDeclaration {
	fn new(property: &'static str, value: impl Into<String>) -> Self {
		Self { property, value: value.into() }
	}
}

const COLOR_PROPERTIES: [(ThemeVariant, ColorKey, &str); 10] = [
	(ThemeVariant::Light, ColorKey::FolderBackground, "--light-highlighted-folder-color"),
	(ThemeVariant::Light, ColorKey::FolderTitle, "--light-highlighted-folder-title-color"),
	(ThemeVariant::Light, ColorKey::FolderText, "--light-highlighted-folder-text-color"),
	(ThemeVariant::Light, ColorKey::RootBackground, "--light-highlighted-parent-folder-color"),
	(ThemeVariant::Light, ColorKey::RootText, "--light-highlighted-parent-folder-text-color"),
	(ThemeVariant::Dark, ColorKey::FolderBackground, "--dark-highlighted-folder-color"),
	(ThemeVariant::Dark, ColorKey::FolderTitle, "--dark-highlighted-folder-title-color"),
	(ThemeVariant::Dark, ColorKey::FolderText, "--dark-highlighted-folder-text-color"),
	(ThemeVariant::Dark, ColorKey::RootBackground, "--dark-highlighted-parent-folder-color"),
	(ThemeVariant::Dark, ColorKey::RootText, "--dark-highlighted-parent-folder-text-color"),
];

/// Custom properties for the given settings.
///
/// Shape properties carry ` !important` when `use_important_tags` is set.
pub fn declarations(settings: &Settings) -> Vec<StyleDeclaration> {
	let important = if settings.use_important_tags { " !important" } else { "" };

	let mut out: Vec<StyleDeclaration> = COLOR_PROPERTIES
		.iter()
		.map(|&(variant, key, property)| StyleDeclaration::new(property, settings.color(variant, key)))
		.collect();

	out.extend([
		StyleDeclaration::new("--fh-folder-border-radius", format!("{}{important}", settings.highlighted_folder_border_radius)),
		StyleDeclaration::new("--fh-folder-font-weight", format!("{}{important}", settings.highlighted_folder_font_weight)),
		StyleDeclaration::new(
			"--fh-parent-folder-border-radius",
			format!("{}{important}", settings.highlighted_parent_folder_border_radius),
		),
		StyleDeclaration::new(
			"--fh-parent-folder-font-weight",
			format!("{}{important}", settings.highlighted_parent_folder_font_weight),
		),
	]);
	out
}

/// Renders declarations as a single `:root { ... }` rule.
pub fn render_root_rule(declarations: &[StyleDeclaration]) -> String {
	let mut rule = String::from(":root {\n");
	for decl in declarations {
		rule.push_str("  ");
		rule.push_str(decl.property);
		rule.push_str(": ");
		rule.push_str(&decl.value);
		rule.push_str(";\n");
	}
	rule.push('}');
	rule
}
