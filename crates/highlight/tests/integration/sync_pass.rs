use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use pretty_assertions::assert_eq;
use tokio::time::sleep;
use trailmark_config::{MarkKind, Settings, Timings};
use trailmark_highlight::{
	FocusTarget, HostError, InteractionTracker, MemoryTree, MemoryWorkspace, PassError, PointerHandler, SyncEngine, TreeView, Workspace,
};
use trailmark_worker::{GenerationToken, UpdateScheduler};

use crate::common::{Harness, expected, marks_only};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn marks_follow_the_active_path_with_root_highlighting() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		highlight_parent_folder: true,
		..marks_only()
	});

	let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert_eq!(report.marks, 3);
	assert_eq!(
		h.tree.marked(),
		expected(&[("A", MarkKind::Root), ("A/B", MarkKind::Intermediate), ("A/B/C", MarkKind::Active)])
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn root_is_an_intermediate_when_root_highlighting_is_off() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(marks_only());

	engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert_eq!(
		h.tree.marked(),
		expected(&[("A", MarkKind::Intermediate), ("A/B", MarkKind::Intermediate), ("A/B/C", MarkKind::Active)])
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn moving_to_a_shallow_item_leaves_no_stale_marks() {
	let h = Harness::new();
	let engine = h.engine(marks_only());

	h.workspace.open("A/B/C/note.md");
	engine.run_pass(&GenerationToken::detached()).await.unwrap();
	h.workspace.open("E/y.md");
	engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert_eq!(h.tree.marked(), expected(&[("E", MarkKind::Active)]));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn no_active_item_clears_every_mark_and_skips_automation() {
	let h = Harness::new();
	let engine = h.engine(Settings {
		auto_collapse_other_folders: true,
		..Settings::default()
	});
	h.workspace.open("A/B/C/note.md");
	engine.run_pass(&GenerationToken::detached()).await.unwrap();
	let toggles = h.tree.toggles().len();

	h.workspace.close();
	let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert_eq!(report.active, None);
	assert!(h.tree.marked().is_empty());
	assert_eq!(h.tree.toggles().len(), toggles);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn repeated_passes_are_idempotent() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		auto_collapse_other_folders: true,
		highlight_parent_folder: true,
		..Settings::default()
	});

	engine.run_pass(&GenerationToken::detached()).await.unwrap();
	let first = h.tree.marked();
	let second_report = engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert_eq!(h.tree.marked(), first);
	assert_eq!(second_report.toggled, 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn auto_collapse_expands_the_path_and_collapses_the_rest() {
	let h = Harness::new();
	h.tree.set_collapsed("A/B/C", true);
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		auto_collapse_other_folders: true,
		auto_scroll: false,
		..Settings::default()
	});

	let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert_eq!(report.toggled, 3);
	assert_eq!(h.tree.toggles(), vec!["A/B/C".to_string(), "A/D".into(), "E".into()]);
	assert_eq!(h.tree.collapsed("A/B/C"), Some(false));
	assert_eq!(h.tree.collapsed("A/D"), Some(true));
	assert_eq!(h.tree.collapsed("E"), Some(true));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn expanding_an_ancestor_renders_deeper_branches_before_marking() {
	let h = Harness::new();
	h.tree.set_collapsed("A/B", true);
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		auto_collapse_other_folders: true,
		auto_scroll: false,
		..Settings::default()
	});

	engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert!(h.tree.branch("A/B/C").is_some());
	assert_eq!(h.tree.marks("A/B/C"), vec![MarkKind::Active]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn scroll_targets_the_leaf_once_rendered() {
	let h = Harness::new();
	h.tree.set_collapsed("A/B/C", true);
	h.workspace.open("A/B/C/note.md");

	let scroll_only = h.engine(Settings {
		auto_scroll: true,
		auto_collapse_other_folders: false,
		..Settings::default()
	});
	let report = scroll_only.run_pass(&GenerationToken::detached()).await.unwrap();
	assert!(!report.scrolled);
	assert!(h.tree.scrolled().is_empty());

	let both = h.engine(Settings {
		auto_scroll: true,
		auto_collapse_other_folders: true,
		..Settings::default()
	});
	let report = both.run_pass(&GenerationToken::detached()).await.unwrap();
	assert!(report.scrolled);
	assert_eq!(h.tree.scrolled(), vec!["A/B/C/note.md".to_string()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn recent_interaction_suppresses_collapse_and_scroll_but_not_marks() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		auto_collapse_other_folders: true,
		auto_scroll: true,
		..Settings::default()
	});

	engine.interactions().record_interaction();
	sleep(Duration::from_millis(100)).await;
	let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();
	assert!(report.suppressed);
	assert!(h.tree.toggles().is_empty());
	assert!(h.tree.scrolled().is_empty());
	assert_eq!(h.tree.marks("A/B/C"), vec![MarkKind::Active]);

	sleep(Duration::from_millis(300)).await;
	let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();
	assert!(!report.suppressed);
	assert_eq!(h.tree.toggles(), vec!["A/D".to_string(), "E".into()]);
	assert_eq!(h.tree.scrolled(), vec!["A/B/C/note.md".to_string()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn active_item_is_re_read_after_waits() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		auto_scroll: true,
		..marks_only()
	});

	let scope = GenerationToken::detached();
	let (report, ()) = tokio::join!(engine.run_pass(&scope), async {
		sleep(Duration::from_millis(20)).await;
		h.workspace.open("E/y.md");
	});

	let report = report.unwrap();
	assert_eq!(report.active.as_ref().map(|p| p.as_str()), Some("E/y.md"));
	assert_eq!(h.tree.scrolled(), vec!["E/y.md".to_string()]);
	assert_eq!(h.tree.marked(), expected(&[("E", MarkKind::Active)]));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancelled_pass_leaves_the_tree_alone() {
	let h = Harness::new();
	h.workspace.open("A/B/C/note.md");
	let engine = h.engine(Settings {
		auto_scroll: true,
		..marks_only()
	});

	let scope = GenerationToken::detached();
	let (result, ()) = tokio::join!(engine.run_pass(&scope), async {
		sleep(Duration::from_millis(20)).await;
		scope.cancel();
	});

	assert!(matches!(result, Err(PassError::Cancelled(_))));
	assert!(h.tree.marked().is_empty());
	assert!(h.tree.scrolled().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn focus_returns_to_the_editor_only_from_passive_targets() {
	let cases = [
		(FocusTarget::Nothing, true),
		(FocusTarget::Document, true),
		(FocusTarget::element("div"), true),
		(FocusTarget::element("UL"), true),
		(FocusTarget::element("button"), false),
		(FocusTarget::element("input"), false),
		(FocusTarget::element("textarea"), false),
		(FocusTarget::editable("div"), false),
	];

	for (target, restored) in cases {
		let h = Harness::new();
		h.workspace.open("E/y.md");
		h.workspace.set_focus(target.clone());
		let engine = h.engine(marks_only());

		let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();

		assert_eq!(report.focus_restored, restored, "focus target {target:?}");
		assert_eq!(h.workspace.editor_focuses(), usize::from(restored), "focus target {target:?}");
	}
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn focus_is_not_restored_without_an_editor() {
	let h = Harness::new();
	h.workspace.open("E/y.md");
	h.workspace.set_has_editor(false);

	let report = h.engine(marks_only()).run_pass(&GenerationToken::detached()).await.unwrap();

	assert!(!report.focus_restored);
	assert_eq!(h.workspace.focus_target(), FocusTarget::Nothing);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn leaf_with_empty_segments_is_scrolled_by_its_normalized_path() {
	let h = Harness::new();
	h.workspace.open("/E//y.md");
	let engine = h.engine(Settings {
		auto_scroll: true,
		..marks_only()
	});

	let report = engine.run_pass(&GenerationToken::detached()).await.unwrap();

	assert!(report.scrolled);
	assert_eq!(h.tree.scrolled(), vec!["E/y.md".to_string()]);
	assert_eq!(h.tree.marked(), expected(&[("E", MarkKind::Active)]));
}

/// Memory tree whose toggles are refused while `refusing` is set.
struct RefusingTree {
	inner: MemoryTree,
	refusing: AtomicBool,
}

impl TreeView for RefusingTree {
	type Branch = String;
	type Leaf = String;

	fn branch(&self, path: &str) -> Option<String> {
		self.inner.branch(path)
	}

	fn leaf(&self, path: &str) -> Option<String> {
		self.inner.leaf(path)
	}

	fn branches(&self) -> Vec<String> {
		self.inner.branches()
	}

	fn branch_path(&self, branch: &String) -> Option<String> {
		self.inner.branch_path(branch)
	}

	fn is_collapsed(&self, branch: &String) -> bool {
		self.inner.is_collapsed(branch)
	}

	fn toggle(&self, branch: &String) -> Result<(), HostError> {
		if self.refusing.load(Ordering::SeqCst) {
			return Err(HostError::Failed(format!("toggle of {branch} refused")));
		}
		self.inner.toggle(branch)
	}

	fn add_mark(&self, branch: &String, mark: MarkKind) {
		self.inner.add_mark(branch, mark);
	}

	fn remove_mark(&self, branch: &String, mark: MarkKind) {
		self.inner.remove_mark(branch, mark);
	}

	fn remove_all_marks(&self) {
		self.inner.remove_all_marks();
	}

	fn scroll_into_view(&self, leaf: &String) -> Result<(), HostError> {
		self.inner.scroll_into_view(leaf)
	}

	fn subscribe_pointer(&self, handler: PointerHandler) {
		self.inner.subscribe_pointer(handler);
	}

	fn unsubscribe_pointer(&self) {
		self.inner.unsubscribe_pointer();
	}
}

fn refusing_engine() -> (Arc<RefusingTree>, SyncEngine<RefusingTree, MemoryWorkspace>) {
	let tree = Arc::new(RefusingTree {
		inner: MemoryTree::from_items(crate::common::ITEMS),
		refusing: AtomicBool::new(true),
	});
	let workspace = Arc::new(MemoryWorkspace::new());
	workspace.open("A/B/C/note.md");
	let settings = Settings {
		auto_collapse_other_folders: true,
		auto_scroll: false,
		..Settings::default()
	};
	let engine = SyncEngine::new(
		tree.clone(),
		workspace,
		Arc::new(ArcSwap::from_pointee(settings)),
		Arc::new(InteractionTracker::new()),
		Timings::default(),
	);
	(tree, engine)
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn refused_toggle_aborts_the_pass_before_marking() {
	let (tree, engine) = refusing_engine();

	let result = engine.run_pass(&GenerationToken::detached()).await;

	assert!(matches!(result, Err(PassError::Host(HostError::Failed(_)))));
	assert!(tree.inner.marked().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failed_pass_is_counted_and_the_next_trigger_still_runs() {
	let (tree, engine) = refusing_engine();
	let scheduler = UpdateScheduler::new(Arc::new(engine), Timings::default().debounce());

	scheduler.trigger();
	scheduler.wait_idle().await;
	let stats = scheduler.stats();
	assert_eq!((stats.passes, stats.failures), (1, 1));
	assert!(tree.inner.marked().is_empty());

	tree.refusing.store(false, Ordering::SeqCst);
	scheduler.trigger();
	scheduler.wait_idle().await;
	let stats = scheduler.stats();
	assert_eq!((stats.passes, stats.failures), (2, 1));
	assert_eq!(tree.inner.toggles(), vec!["A/D".to_string(), "E".into()]);
	assert_eq!(tree.inner.marks("A/B/C"), vec![MarkKind::Active]);
}
