//! Host lifecycle glue.
//!
//! [`Highlighter`] owns the scheduler and the single active [`Settings`]
//! value, and translates host notifications into scheduler calls.

use std::sync::Arc;

use arc_swap::ArcSwap;
use trailmark_config::form::{self, EditEffect, FormEdit, SettingsForm};
use trailmark_config::{Settings, SettingsStore, Timings, declarations};
use trailmark_worker::{SchedulerStats, UpdateScheduler};

use crate::engine::SyncEngine;
use crate::host::{FocusPolicy, StyleSink, TreeView, Workspace};
use crate::interaction::InteractionTracker;

/// Host collaborators handed to [`Highlighter::load`].
pub struct Host<T, W> {
	pub tree: Arc<T>,
	pub workspace: Arc<W>,
	pub store: Arc<dyn SettingsStore>,
	pub styles: Arc<dyn StyleSink>,
}

/// Loaded highlighter: one per tree view.
pub struct Highlighter<T: TreeView, W: Workspace> {
	engine: Arc<SyncEngine<T, W>>,
	scheduler: UpdateScheduler<SyncEngine<T, W>>,
	settings: Arc<ArcSwap<Settings>>,
	store: Arc<dyn SettingsStore>,
	styles: Arc<dyn StyleSink>,
}

impl<T: TreeView, W: Workspace> std::fmt::Debug for Highlighter<T, W> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Highlighter")
			.field("engine", &self.engine)
			.field("scheduler", &self.scheduler)
			.finish_non_exhaustive()
	}
}

impl<T: TreeView, W: Workspace> Highlighter<T, W> {
	/// Loads settings and applies styles. Nothing is scheduled until
	/// [`Self::on_layout_ready`].
	///
	/// A store that fails to load is logged and the defaults are used.
	pub fn load(host: Host<T, W>, timings: Timings, focus: FocusPolicy) -> Self {
		let Host {
			tree,
			workspace,
			store,
			styles,
		} = host;

		let variant = workspace.theme_variant();
		let loaded = store.load_settings(variant).unwrap_or_else(|err| {
			tracing::warn!(error = %err, "highlighter.settings.load_failed");
			Settings::defaults_for(variant)
		});
		let settings = Arc::new(ArcSwap::from_pointee(loaded));

		let engine = Arc::new(
			SyncEngine::new(tree, workspace, settings.clone(), Arc::new(InteractionTracker::new()), timings).with_focus_policy(focus),
		);
		let scheduler = UpdateScheduler::new(engine.clone(), timings.debounce());

		let highlighter = Self {
			engine,
			scheduler,
			settings,
			store,
			styles,
		};
		highlighter.render_styles();
		tracing::debug!(?timings, "highlighter.loaded");
		highlighter
	}

	/// Host layout is ready: start listening for manual interactions and
	/// schedule the initial pass.
	pub fn on_layout_ready(&self) {
		self.subscribe_pointer();
		if self.engine.workspace().active_item().is_some() {
			self.scheduler.trigger_after(self.engine.timings().layout_ready_delay());
		}
	}

	pub fn on_active_item_changed(&self) {
		self.scheduler.trigger();
	}

	/// The tree container may have been recreated, so the pointer
	/// subscription is renewed before triggering.
	pub fn on_view_layout_changed(&self) {
		self.subscribe_pointer();
		self.scheduler.trigger();
	}

	/// Manual pointer event inside the tree view.
	pub fn on_tree_pointer(&self) {
		self.engine.interactions().record_interaction();
	}

	fn subscribe_pointer(&self) {
		let interactions = self.engine.interactions().clone();
		self.engine.tree().subscribe_pointer(Arc::new(move || interactions.record_interaction()));
	}

	/// Current settings snapshot.
	pub fn settings(&self) -> Arc<Settings> {
		self.settings.load_full()
	}

	/// Settings screen for the current settings.
	pub fn form(&self) -> SettingsForm {
		form::build(&self.settings.load())
	}

	/// Applies a settings screen edit and saves the result.
	pub fn apply_form_edit(&self, edit: FormEdit) -> trailmark_config::Result<EditEffect> {
		let mut next = Settings::clone(&self.settings.load());
		let effect = form::apply(&mut next, edit);
		self.save_settings(next)?;
		Ok(effect)
	}

	/// Replaces the active settings, re-renders styles, re-applies marks and
	/// persists. The new settings stay active when persisting fails.
	pub fn save_settings(&self, settings: Settings) -> trailmark_config::Result<()> {
		self.settings.store(Arc::new(settings));
		self.render_styles();
		let marks = self.engine.refresh_marks();
		tracing::debug!(marks, "highlighter.settings.applied");

		self.store.save_settings(&self.settings.load()).inspect_err(|err| {
			tracing::warn!(error = %err, "highlighter.settings.save_failed");
		})
	}

	fn render_styles(&self) {
		self.styles.apply_styles(&declarations(&self.settings.load()));
	}

	/// Stops scheduling, drops listeners, and removes marks and styles.
	pub fn unload(&self) {
		self.scheduler.teardown();
		let tree = self.engine.tree();
		tree.unsubscribe_pointer();
		tree.remove_all_marks();
		self.styles.clear_styles();
		tracing::debug!("highlighter.unloaded");
	}

	pub fn engine(&self) -> &Arc<SyncEngine<T, W>> {
		&self.engine
	}

	pub fn scheduler(&self) -> &UpdateScheduler<SyncEngine<T, W>> {
		&self.scheduler
	}

	pub fn stats(&self) -> SchedulerStats {
		self.scheduler.stats()
	}

	/// Resolves once no pass is pending or running.
	pub async fn wait_idle(&self) {
		self.scheduler.wait_idle().await;
	}
}
