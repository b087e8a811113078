//! In-memory host implementations.
//!
//! [`MemoryTree`] models a lazily rendered tree: a branch or leaf is rendered
//! only while every ancestor branch is expanded and none is hidden. Used by
//! the replay tool and by tests.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use trailmark_config::{MarkKind, StyleDeclaration, ThemeVariant};

use crate::error::HostError;
use crate::host::{FocusTarget, PointerHandler, StyleSink, TreeView, Workspace};
use crate::path::ItemPath;

#[derive(Debug, Default)]
struct BranchState {
	collapsed: bool,
	hidden: bool,
	marks: BTreeSet<MarkKind>,
}

#[derive(Default)]
struct TreeState {
	branches: BTreeMap<String, BranchState>,
	leaves: BTreeSet<String>,
	scrolled: Vec<String>,
	toggles: Vec<String>,
	pointer: Option<PointerHandler>,
	subscriptions: usize,
}

impl TreeState {
	fn ancestors_open(&self, path: &str) -> bool {
		ItemPath::new(path).ancestors().iter().all(|ancestor| {
			self.branches
				.get(ancestor)
				.is_some_and(|b| !b.collapsed && !b.hidden)
		})
	}

	fn branch_rendered(&self, path: &str) -> bool {
		self.branches.get(path).is_some_and(|b| !b.hidden) && self.ancestors_open(path)
	}

	fn leaf_rendered(&self, path: &str) -> bool {
		self.leaves.contains(path) && self.ancestors_open(path)
	}

	fn insert_item(&mut self, path: &str) {
		let item = ItemPath::new(path);
		for ancestor in item.ancestors() {
			self.branches.entry(ancestor).or_default();
		}
		self.leaves.insert(item.normalized());
	}
}

/// Tree view kept in memory. Branch and leaf handles are their paths.
#[derive(Default)]
pub struct MemoryTree {
	state: Mutex<TreeState>,
}

impl std::fmt::Debug for MemoryTree {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("MemoryTree")
			.field("branches", &state.branches)
			.field("leaves", &state.leaves)
			.finish_non_exhaustive()
	}
}

impl MemoryTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Tree holding `items` as leaves, with every ancestor branch expanded.
	pub fn from_items<I, S>(items: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let tree = Self::new();
		for item in items {
			tree.insert_item(item.as_ref());
		}
		tree
	}

	/// Adds a leaf and any missing ancestor branches.
	pub fn insert_item(&self, path: &str) {
		self.state.lock().insert_item(path);
	}

	/// Adds an empty branch and any missing ancestors.
	pub fn insert_branch(&self, path: &str) {
		let mut state = self.state.lock();
		for ancestor in ItemPath::new(path).ancestors() {
			state.branches.entry(ancestor).or_default();
		}
		state.branches.entry(path.to_string()).or_default();
	}

	/// Sets collapsed state directly, bypassing the toggle log.
	pub fn set_collapsed(&self, path: &str, collapsed: bool) {
		if let Some(branch) = self.state.lock().branches.get_mut(path) {
			branch.collapsed = collapsed;
		}
	}

	/// Hides or shows a branch, as a virtualized view would when it scrolls
	/// out of range. A hidden branch and its subtree are not rendered.
	pub fn set_hidden(&self, path: &str, hidden: bool) {
		if let Some(branch) = self.state.lock().branches.get_mut(path) {
			branch.hidden = hidden;
		}
	}

	/// Simulates a user click on a branch: the pointer handler fires, then
	/// the branch toggles if rendered.
	pub fn click(&self, path: &str) {
		self.pointer();
		let mut state = self.state.lock();
		if state.branch_rendered(path) {
			if let Some(branch) = state.branches.get_mut(path) {
				branch.collapsed = !branch.collapsed;
			}
		}
	}

	/// Fires the pointer handler, if subscribed.
	pub fn pointer(&self) {
		let handler = self.state.lock().pointer.clone();
		if let Some(handler) = handler {
			handler();
		}
	}

	/// Collapsed state of a known branch.
	pub fn collapsed(&self, path: &str) -> Option<bool> {
		self.state.lock().branches.get(path).map(|b| b.collapsed)
	}

	pub fn marks(&self, path: &str) -> Vec<MarkKind> {
		self.state
			.lock()
			.branches
			.get(path)
			.map(|b| b.marks.iter().copied().collect())
			.unwrap_or_default()
	}

	/// Every branch carrying at least one mark.
	pub fn marked(&self) -> BTreeMap<String, Vec<MarkKind>> {
		self.state
			.lock()
			.branches
			.iter()
			.filter(|(_, b)| !b.marks.is_empty())
			.map(|(path, b)| (path.clone(), b.marks.iter().copied().collect()))
			.collect()
	}

	/// Every known branch path with its collapsed state, rendered or not.
	pub fn all_branches(&self) -> Vec<(String, bool)> {
		self.state.lock().branches.iter().map(|(path, b)| (path.clone(), b.collapsed)).collect()
	}

	/// Leaves scrolled into view, oldest first.
	pub fn scrolled(&self) -> Vec<String> {
		self.state.lock().scrolled.clone()
	}

	/// Branches toggled through [`TreeView::toggle`], oldest first.
	pub fn toggles(&self) -> Vec<String> {
		self.state.lock().toggles.clone()
	}

	pub fn has_pointer_subscription(&self) -> bool {
		self.state.lock().pointer.is_some()
	}

	/// Number of [`TreeView::subscribe_pointer`] calls so far.
	pub fn subscriptions(&self) -> usize {
		self.state.lock().subscriptions
	}
}

impl TreeView for MemoryTree {
	type Branch = String;
	type Leaf = String;

	fn branch(&self, path: &str) -> Option<String> {
		self.state.lock().branch_rendered(path).then(|| path.to_string())
	}

	fn leaf(&self, path: &str) -> Option<String> {
		self.state.lock().leaf_rendered(path).then(|| path.to_string())
	}

	fn branches(&self) -> Vec<String> {
		let state = self.state.lock();
		state.branches.keys().filter(|path| state.branch_rendered(path)).cloned().collect()
	}

	fn branch_path(&self, branch: &String) -> Option<String> {
		Some(branch.clone())
	}

	fn is_collapsed(&self, branch: &String) -> bool {
		self.state.lock().branches.get(branch).is_some_and(|b| b.collapsed)
	}

	fn toggle(&self, branch: &String) -> Result<(), HostError> {
		let mut state = self.state.lock();
		if !state.branch_rendered(branch) {
			return Err(HostError::Detached(branch.clone()));
		}
		if let Some(b) = state.branches.get_mut(branch) {
			b.collapsed = !b.collapsed;
		}
		state.toggles.push(branch.clone());
		Ok(())
	}

	fn add_mark(&self, branch: &String, mark: MarkKind) {
		if let Some(b) = self.state.lock().branches.get_mut(branch) {
			b.marks.insert(mark);
		}
	}

	fn remove_mark(&self, branch: &String, mark: MarkKind) {
		if let Some(b) = self.state.lock().branches.get_mut(branch) {
			b.marks.remove(&mark);
		}
	}

	fn remove_all_marks(&self) {
		for b in self.state.lock().branches.values_mut() {
			b.marks.clear();
		}
	}

	fn scroll_into_view(&self, leaf: &String) -> Result<(), HostError> {
		let mut state = self.state.lock();
		if !state.leaf_rendered(leaf) {
			return Err(HostError::Detached(leaf.clone()));
		}
		state.scrolled.push(leaf.clone());
		Ok(())
	}

	fn subscribe_pointer(&self, handler: PointerHandler) {
		let mut state = self.state.lock();
		state.pointer = Some(handler);
		state.subscriptions += 1;
	}

	fn unsubscribe_pointer(&self) {
		self.state.lock().pointer = None;
	}
}

#[derive(Debug)]
struct WorkspaceState {
	active: Option<ItemPath>,
	focus: FocusTarget,
	has_editor: bool,
	editor_focuses: usize,
	variant: ThemeVariant,
}

/// Workspace kept in memory.
#[derive(Debug)]
pub struct MemoryWorkspace {
	state: Mutex<WorkspaceState>,
}

impl Default for MemoryWorkspace {
	fn default() -> Self {
		Self {
			state: Mutex::new(WorkspaceState {
				active: None,
				focus: FocusTarget::Nothing,
				has_editor: true,
				editor_focuses: 0,
				variant: ThemeVariant::Light,
			}),
		}
	}
}

impl MemoryWorkspace {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes `path` the active item.
	pub fn open(&self, path: impl Into<ItemPath>) {
		self.state.lock().active = Some(path.into());
	}

	/// Clears the active item.
	pub fn close(&self) {
		self.state.lock().active = None;
	}

	pub fn set_focus(&self, focus: FocusTarget) {
		self.state.lock().focus = focus;
	}

	/// Whether the active view has an editor that can take focus.
	pub fn set_has_editor(&self, has_editor: bool) {
		self.state.lock().has_editor = has_editor;
	}

	pub fn set_theme_variant(&self, variant: ThemeVariant) {
		self.state.lock().variant = variant;
	}

	/// Times the editor was given focus.
	pub fn editor_focuses(&self) -> usize {
		self.state.lock().editor_focuses
	}
}

impl Workspace for MemoryWorkspace {
	fn active_item(&self) -> Option<ItemPath> {
		self.state.lock().active.clone()
	}

	fn focus_target(&self) -> FocusTarget {
		self.state.lock().focus.clone()
	}

	fn focus_editor(&self) -> bool {
		let mut state = self.state.lock();
		if !state.has_editor {
			return false;
		}
		state.focus = FocusTarget::editable("div");
		state.editor_focuses += 1;
		true
	}

	fn theme_variant(&self) -> ThemeVariant {
		self.state.lock().variant
	}
}

/// Style sink that records every batch it receives.
#[derive(Debug, Default)]
pub struct RecordingStyles {
	batches: Mutex<Vec<Vec<StyleDeclaration>>>,
	cleared: Mutex<bool>,
}

impl RecordingStyles {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of times styles were applied.
	pub fn applied(&self) -> usize {
		self.batches.lock().len()
	}

	/// Most recent batch.
	pub fn last(&self) -> Option<Vec<StyleDeclaration>> {
		self.batches.lock().last().cloned()
	}

	/// True once styles were cleared and not re-applied since.
	pub fn is_cleared(&self) -> bool {
		*self.cleared.lock()
	}
}

impl StyleSink for RecordingStyles {
	fn apply_styles(&self, declarations: &[StyleDeclaration]) {
		self.batches.lock().push(declarations.to_vec());
		*self.cleared.lock() = false;
	}

	fn clear_styles(&self) {
		*self.cleared.lock() = true;
	}
}
