//! One synchronization pass over the tree view.
//!
//! A pass resolves the active item, optionally collapses branches off its
//! path and scrolls it into view, then rebuilds every mark from scratch and
//! hands focus back to the editor when nothing interactive holds it. Every
//! wait goes through the pass scope so teardown aborts the pass before it
//! touches the tree again.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use trailmark_config::{Settings, Timings};
use trailmark_worker::{GenerationToken, PassRunner};

use crate::error::{HostError, PassError, Result};
use crate::host::{FocusPolicy, TreeView, Workspace};
use crate::interaction::InteractionTracker;
use crate::path::ItemPath;
use crate::resolver::classify;

/// What a pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
	/// Active item the marks were computed for.
	pub active: Option<ItemPath>,
	/// Collapse and scroll were skipped because of a recent manual interaction.
	pub suppressed: bool,
	/// Branches toggled by auto-collapse.
	pub toggled: usize,
	/// The active leaf was scrolled into view.
	pub scrolled: bool,
	/// Marks applied.
	pub marks: usize,
	/// Focus was handed back to the editor.
	pub focus_restored: bool,
}

/// Runs synchronization passes against a host tree and workspace.
pub struct SyncEngine<T, W> {
	tree: Arc<T>,
	workspace: Arc<W>,
	settings: Arc<ArcSwap<Settings>>,
	interactions: Arc<InteractionTracker>,
	timings: Timings,
	focus: FocusPolicy,
}

impl<T, W> std::fmt::Debug for SyncEngine<T, W> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SyncEngine")
			.field("timings", &self.timings)
			.field("focus", &self.focus)
			.finish_non_exhaustive()
	}
}

impl<T: TreeView, W: Workspace> SyncEngine<T, W> {
	/// Engine with the default [`FocusPolicy`].
	pub fn new(
		tree: Arc<T>,
		workspace: Arc<W>,
		settings: Arc<ArcSwap<Settings>>,
		interactions: Arc<InteractionTracker>,
		timings: Timings,
	) -> Self {
		Self {
			tree,
			workspace,
			settings,
			interactions,
			timings,
			focus: FocusPolicy::default(),
		}
	}

	/// Replaces the focus restoration policy.
	pub fn with_focus_policy(mut self, focus: FocusPolicy) -> Self {
		self.focus = focus;
		self
	}

	/// Host tree the engine marks.
	pub fn tree(&self) -> &Arc<T> {
		&self.tree
	}

	/// Host workspace the active item is read from.
	pub fn workspace(&self) -> &Arc<W> {
		&self.workspace
	}

	/// Manual interaction stamp consulted for suppression.
	pub fn interactions(&self) -> &Arc<InteractionTracker> {
		&self.interactions
	}

	/// Waits applied during a pass.
	pub fn timings(&self) -> &Timings {
		&self.timings
	}

	/// Runs a full pass. Returns early with [`PassError::Cancelled`] when
	/// `scope` is cancelled during one of the waits.
	pub async fn run_pass(&self, scope: &GenerationToken) -> Result<PassReport> {
		let Some(mut active) = self.workspace.active_item() else {
			self.tree.remove_all_marks();
			tracing::debug!(generation = scope.generation(), "sync.pass.cleared");
			return Ok(PassReport::default());
		};

		let settings = self.settings.load_full();
		let suppressed = self.interactions.is_recent_interaction(self.timings.interaction_window());
		let mut report = PassReport {
			suppressed,
			..PassReport::default()
		};

		if settings.auto_collapse_other_folders && !suppressed {
			report.toggled = self.collapse_outside(&active)?;
			scope.pause(self.timings.grace()).await?;
			match self.workspace.active_item() {
				Some(current) => active = current,
				None => return Ok(self.clear(report)),
			}
		}

		if settings.auto_scroll && !suppressed {
			scope.pause(self.timings.scroll_settle()).await?;
			let Some(current) = self.workspace.active_item() else {
				return Ok(self.clear(report));
			};
			active = current;
			report.scrolled = self.scroll_to(&active)?;
			scope.pause(self.timings.grace()).await?;
			match self.workspace.active_item() {
				Some(current) => active = current,
				None => return Ok(self.clear(report)),
			}
		}

		scope.check()?;
		report.marks = self.apply_marks(&active, settings.highlight_parent_folder);
		report.focus_restored = self.restore_focus();
		report.active = Some(active);

		tracing::debug!(
			generation = scope.generation(),
			active = %report.active.as_ref().map(ItemPath::as_str).unwrap_or_default(),
			suppressed = report.suppressed,
			toggled = report.toggled,
			scrolled = report.scrolled,
			marks = report.marks,
			"sync.pass.applied"
		);
		Ok(report)
	}

	/// Rebuilds marks for the current active item without collapsing or scrolling.
	pub fn refresh_marks(&self) -> usize {
		match self.workspace.active_item() {
			Some(active) => self.apply_marks(&active, self.settings.load().highlight_parent_folder),
			None => {
				self.tree.remove_all_marks();
				0
			}
		}
	}

	fn clear(&self, report: PassReport) -> PassReport {
		self.tree.remove_all_marks();
		tracing::debug!("sync.pass.cleared");
		report
	}

	/// Expands branches on the active path and collapses every other rendered
	/// branch. Returns how many branches were toggled.
	fn collapse_outside(&self, active: &ItemPath) -> Result<usize> {
		let keep: HashSet<String> = active.ancestors().into_iter().collect();
		let mut toggled = 0;

		for branch in self.tree.branches() {
			let Some(path) = self.tree.branch_path(&branch) else {
				continue;
			};
			let on_path = keep.contains(path.as_str());
			if on_path != self.tree.is_collapsed(&branch) {
				continue;
			}
			match self.tree.toggle(&branch) {
				Ok(()) => toggled += 1,
				Err(HostError::Detached(path)) => tracing::trace!(%path, "sync.collapse.detached"),
				Err(err) => return Err(PassError::Host(err)),
			}
		}

		Ok(toggled)
	}

	fn scroll_to(&self, active: &ItemPath) -> Result<bool> {
		let Some(leaf) = self.tree.leaf(&active.normalized()) else {
			tracing::trace!(active = %active, "sync.scroll.unrendered");
			return Ok(false);
		};
		match self.tree.scroll_into_view(&leaf) {
			Ok(()) => Ok(true),
			Err(HostError::Detached(_)) => Ok(false),
			Err(err) => Err(PassError::Host(err)),
		}
	}

	fn apply_marks(&self, active: &ItemPath, highlight_root: bool) -> usize {
		self.tree.remove_all_marks();
		let marks = classify(active, |path| self.tree.branch(path)).into_marks(highlight_root);
		for (branch, mark) in &marks {
			self.tree.add_mark(branch, *mark);
		}
		marks.len()
	}

	fn restore_focus(&self) -> bool {
		let target = self.workspace.focus_target();
		if !self.focus.should_restore(&target) {
			tracing::trace!(?target, "sync.focus.kept");
			return false;
		}
		self.workspace.focus_editor()
	}
}

#[async_trait]
impl<T: TreeView, W: Workspace> PassRunner for SyncEngine<T, W> {
	type Error = PassError;

	async fn run(&self, scope: &GenerationToken) -> Result<()> {
		self.run_pass(scope).await.map(drop)
	}
}
