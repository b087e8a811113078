use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value};
use tokio::time::sleep;
use trailmark_config::form::{FormEdit, ToggleKey};
use trailmark_config::{ConfigError, MarkKind, Settings, SettingsStore, Timings};
use trailmark_highlight::{FocusPolicy, Highlighter, Host, RecordingStyles};

use crate::common::{Harness, expected, marks_only};

struct BrokenStore;

impl SettingsStore for BrokenStore {
	fn load(&self) -> trailmark_config::Result<Option<Map<String, Value>>> {
		Err(ConfigError::NotAnObject(PathBuf::from("data.json")))
	}

	fn save(&self, _data: &Map<String, Value>) -> trailmark_config::Result<()> {
		Err(ConfigError::NotAnObject(PathBuf::from("data.json")))
	}
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn load_merges_stored_settings_and_renders_styles() {
	let h = Harness::with_settings(&Settings {
		highlight_parent_folder: true,
		..Settings::default()
	});
	let hl = h.highlighter();

	assert!(hl.settings().highlight_parent_folder);
	assert_eq!(h.styles.applied(), 1);
	assert_eq!(h.styles.last().map(|d| d.len()), Some(14));
	assert_eq!(hl.stats().triggers, 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failing_store_falls_back_to_defaults() {
	let h = Harness::new();
	let styles = Arc::new(RecordingStyles::new());
	let hl = Highlighter::load(
		Host {
			tree: h.tree.clone(),
			workspace: h.workspace.clone(),
			store: Arc::new(BrokenStore),
			styles: styles.clone(),
		},
		Timings::default(),
		FocusPolicy::default(),
	);
	assert_eq!(*hl.settings(), Settings::default());

	let result = hl.apply_form_edit(FormEdit::Toggle(ToggleKey::AutoCollapse, true));
	assert!(result.is_err());
	assert!(hl.settings().auto_collapse_other_folders);
	assert_eq!(styles.applied(), 2);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn layout_ready_schedules_the_initial_pass_after_a_delay() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let hl = h.highlighter();

	hl.on_layout_ready();
	assert!(h.tree.has_pointer_subscription());

	sleep(Duration::from_millis(999)).await;
	assert_eq!(hl.stats().passes, 0);

	hl.wait_idle().await;
	assert_eq!(hl.stats().passes, 1);
	assert_eq!(h.tree.marks("A/B/C"), vec![MarkKind::Active]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn layout_ready_without_an_active_item_schedules_nothing() {
	let h = Harness::new();
	let hl = h.highlighter();

	hl.on_layout_ready();
	sleep(Duration::from_secs(2)).await;

	assert_eq!(hl.stats().triggers, 0);
	assert_eq!(hl.stats().passes, 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn burst_of_notifications_runs_one_pass_for_the_latest_item() {
	let h = Harness::with_settings(&marks_only());
	let hl = h.highlighter();
	hl.on_layout_ready();

	for path in ["A/D/x.md", "E/y.md", "A/B/C/note.md"] {
		h.workspace.open(path);
		hl.on_active_item_changed();
		sleep(Duration::from_millis(50)).await;
	}
	hl.wait_idle().await;

	let stats = hl.stats();
	assert_eq!(stats.triggers, 3);
	assert_eq!(stats.passes, 1);
	assert_eq!(
		h.tree.marked(),
		expected(&[("A", MarkKind::Intermediate), ("A/B", MarkKind::Intermediate), ("A/B/C", MarkKind::Active)])
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clicking_the_tree_suppresses_automation_for_the_next_pass() {
	let h = Harness::with_settings(&Settings {
		auto_collapse_other_folders: true,
		auto_scroll: false,
		..Settings::default()
	});
	let hl = h.highlighter();

	h.tree.click("A/D");
	assert_eq!(hl.engine().interactions().last_interaction(), None);
	h.tree.set_collapsed("A/D", false);

	hl.on_layout_ready();
	h.tree.click("E");
	h.workspace.open("A/B/C/note.md");
	hl.on_active_item_changed();
	hl.wait_idle().await;

	assert!(h.tree.toggles().is_empty());
	assert_eq!(h.tree.marks("A/B/C"), vec![MarkKind::Active]);

	sleep(Duration::from_millis(400)).await;
	hl.on_active_item_changed();
	hl.wait_idle().await;

	assert_eq!(h.tree.toggles(), vec!["A/D".to_string()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn view_layout_change_resubscribes_and_triggers() {
	let h = Harness::with_settings(&marks_only());
	h.workspace.open("E/y.md");
	let hl = h.highlighter();

	hl.on_layout_ready();
	hl.on_view_layout_changed();
	assert_eq!(h.tree.subscriptions(), 2);

	hl.wait_idle().await;
	assert_eq!(hl.stats().passes, 1);
	assert_eq!(h.tree.marked(), expected(&[("E", MarkKind::Active)]));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn saving_settings_refreshes_marks_without_a_pass() {
	let h = Harness::with_settings(&Settings {
		auto_collapse_other_folders: true,
		..Settings::default()
	});
	h.workspace.open("A/B/C/note.md");
	let hl = h.highlighter();
	hl.on_active_item_changed();
	hl.wait_idle().await;
	let toggles = h.tree.toggles();
	assert_eq!(h.tree.marks("A"), vec![MarkKind::Intermediate]);

	h.tree.set_collapsed("A/D", false);
	let effect = hl.apply_form_edit(FormEdit::Toggle(ToggleKey::HighlightRoot, true)).unwrap();

	assert!(effect.rebuild);
	assert_eq!(h.tree.marks("A"), vec![MarkKind::Root]);
	assert_eq!(h.tree.toggles(), toggles);
	assert_eq!(h.tree.collapsed("A/D"), Some(false));
	assert_eq!(hl.stats().passes, 1);
	assert_eq!(h.store.saves(), 1);
	assert_eq!(h.styles.applied(), 2);
	assert_eq!(h.store.snapshot().unwrap().get("highlightParentFolder"), Some(&Value::Bool(true)));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn unload_before_the_debounce_runs_nothing() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let hl = h.highlighter();
	hl.on_layout_ready();
	hl.on_active_item_changed();

	hl.unload();
	hl.on_active_item_changed();
	sleep(Duration::from_secs(2)).await;

	assert_eq!(hl.stats().passes, 0);
	assert!(hl.scheduler().is_closed());
	assert!(h.tree.marked().is_empty());
	assert!(!h.tree.has_pointer_subscription());
	assert!(h.styles.is_cleared());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn unload_mid_pass_stops_before_marking() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let hl = h.highlighter();
	hl.on_active_item_changed();

	sleep(Duration::from_millis(160)).await;
	assert_eq!(hl.stats().passes, 1);
	hl.unload();
	sleep(Duration::from_secs(1)).await;

	assert!(h.tree.marked().is_empty());
	assert!(h.tree.scrolled().is_empty());
	assert_eq!(hl.stats().failures, 0);
}
