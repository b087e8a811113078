//! Shared fixtures for highlight integration tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use trailmark_config::{MarkKind, MemoryStore, Settings, Timings};
use trailmark_highlight::{FocusPolicy, Highlighter, Host, InteractionTracker, MemoryTree, MemoryWorkspace, RecordingStyles, SyncEngine};

/// Branches: `A`, `A/B`, `A/B/C`, `A/D`, `E`.
pub const ITEMS: [&str; 4] = ["A/B/C/note.md", "A/B/other.md", "A/D/x.md", "E/y.md"];

pub type Engine = SyncEngine<MemoryTree, MemoryWorkspace>;

pub struct Harness {
	pub tree: Arc<MemoryTree>,
	pub workspace: Arc<MemoryWorkspace>,
	pub store: Arc<MemoryStore>,
	pub styles: Arc<RecordingStyles>,
}

impl Harness {
	pub fn new() -> Self {
		Self::with_settings(&Settings::default())
	}

	/// Harness whose store already holds `settings`.
	pub fn with_settings(settings: &Settings) -> Self {
		let _ = tracing_subscriber::fmt::try_init();
		Self {
			tree: Arc::new(MemoryTree::from_items(ITEMS)),
			workspace: Arc::new(MemoryWorkspace::new()),
			store: Arc::new(MemoryStore::with_data(settings.to_stored().expect("serialize settings"))),
			styles: Arc::new(RecordingStyles::new()),
		}
	}

	/// Bare engine over this harness's tree and workspace.
	pub fn engine(&self, settings: Settings) -> Engine {
		SyncEngine::new(
			self.tree.clone(),
			self.workspace.clone(),
			Arc::new(ArcSwap::from_pointee(settings)),
			Arc::new(InteractionTracker::new()),
			Timings::default(),
		)
	}

	pub fn highlighter(&self) -> Highlighter<MemoryTree, MemoryWorkspace> {
		Highlighter::load(
			Host {
				tree: self.tree.clone(),
				workspace: self.workspace.clone(),
				store: self.store.clone(),
				styles: self.styles.clone(),
			},
			Timings::default(),
			FocusPolicy::default(),
		)
	}
}

/// Settings with automation switched off, so passes only mark.
pub fn marks_only() -> Settings {
	Settings {
		auto_scroll: false,
		auto_collapse_other_folders: false,
		..Settings::default()
	}
}

pub fn expected(marks: &[(&str, MarkKind)]) -> BTreeMap<String, Vec<MarkKind>> {
	marks.iter().map(|(path, mark)| (path.to_string(), vec![*mark])).collect()
}
