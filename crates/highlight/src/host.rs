//! Capabilities the engine needs from its host.
//!
//! The tree view is owned by the host and may re-render at any time, so branch
//! and leaf handles are resolved fresh on every pass and never cached.

use std::fmt;
use std::sync::Arc;

use trailmark_config::{MarkKind, StyleDeclaration, ThemeVariant};

use crate::error::HostError;
use crate::path::ItemPath;

/// Callback invoked on any pointer event inside the tree view container.
pub type PointerHandler = Arc<dyn Fn() + Send + Sync>;

/// Live navigation tree.
pub trait TreeView: Send + Sync + 'static {
	/// Ephemeral handle to a rendered branch.
	type Branch: Clone + PartialEq + fmt::Debug + Send + Sync;
	/// Ephemeral handle to a rendered leaf.
	type Leaf: Clone + fmt::Debug + Send + Sync;

	/// Rendered branch whose path attribute equals `path`.
	fn branch(&self, path: &str) -> Option<Self::Branch>;

	/// Rendered leaf whose path attribute equals `path`.
	fn leaf(&self, path: &str) -> Option<Self::Leaf>;

	/// Every branch currently rendered.
	fn branches(&self) -> Vec<Self::Branch>;

	/// Path attribute of a branch; `None` when the branch carries none.
	fn branch_path(&self, branch: &Self::Branch) -> Option<String>;

	fn is_collapsed(&self, branch: &Self::Branch) -> bool;

	/// Flips collapsed state through the branch's own affordance, so lazy
	/// loading and other tree behavior still run.
	fn toggle(&self, branch: &Self::Branch) -> Result<(), HostError>;

	fn add_mark(&self, branch: &Self::Branch, mark: MarkKind);

	fn remove_mark(&self, branch: &Self::Branch, mark: MarkKind);

	/// Removes every mark from every rendered branch.
	fn remove_all_marks(&self) {
		for branch in self.branches() {
			for mark in MarkKind::ALL {
				self.remove_mark(&branch, mark);
			}
		}
	}

	/// Scrolls the leaf's container so the leaf is vertically centered.
	fn scroll_into_view(&self, leaf: &Self::Leaf) -> Result<(), HostError>;

	/// Routes pointer events in the tree container to `handler`, replacing
	/// any previous subscription.
	fn subscribe_pointer(&self, handler: PointerHandler);

	fn unsubscribe_pointer(&self);
}

/// What currently holds keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
	/// Nothing is focused.
	Nothing,
	/// The document body or root element.
	Document,
	Element {
		/// Tag name, any case.
		tag: String,
		/// Editable region (e.g. `contenteditable`).
		editable: bool,
	},
}

impl FocusTarget {
	pub fn element(tag: impl Into<String>) -> Self {
		Self::Element {
			tag: tag.into(),
			editable: false,
		}
	}

	pub fn editable(tag: impl Into<String>) -> Self {
		Self::Element {
			tag: tag.into(),
			editable: true,
		}
	}
}

/// Decides whether the editor may take focus back after a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusPolicy {
	container_tags: Vec<String>,
}

impl Default for FocusPolicy {
	fn default() -> Self {
		Self::with_container_tags(["div", "span", "section", "nav", "main", "aside", "header", "footer", "ul", "li"])
	}
}

impl FocusPolicy {
	/// Policy treating exactly `tags` as passive containers.
	pub fn with_container_tags<I, S>(tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			container_tags: tags.into_iter().map(|t| t.as_ref().to_ascii_lowercase()).collect(),
		}
	}

	/// True when `target` is nothing, the document, or a non-editable passive container.
	pub fn should_restore(&self, target: &FocusTarget) -> bool {
		match target {
			FocusTarget::Nothing | FocusTarget::Document => true,
			FocusTarget::Element { editable: true, .. } => false,
			FocusTarget::Element { tag, editable: false } => {
				let tag = tag.to_ascii_lowercase();
				self.container_tags.iter().any(|t| *t == tag)
			}
		}
	}
}

/// The host's workspace: the active item and keyboard focus.
pub trait Workspace: Send + Sync + 'static {
	/// Leaf selected in the primary view.
	fn active_item(&self) -> Option<ItemPath>;

	fn focus_target(&self) -> FocusTarget;

	/// Focuses the active view's primary editor. Returns false when there is none.
	fn focus_editor(&self) -> bool;

	/// Theme variant the host currently shows.
	fn theme_variant(&self) -> ThemeVariant {
		ThemeVariant::Light
	}
}

/// Receives style declarations whenever settings change.
pub trait StyleSink: Send + Sync + 'static {
	fn apply_styles(&self, declarations: &[StyleDeclaration]);

	/// Removes previously applied styles.
	fn clear_styles(&self) {}
}
