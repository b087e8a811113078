//! Trailmark replay tool.
//!
//! Replays a scripted session against an in-memory tree view and prints the
//! resulting branches with their collapsed state and marks.

mod script;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trailmark_config::{JsonFileStore, MemoryStore, SettingsStore, StyleDeclaration, Timings};
use trailmark_highlight::{FocusPolicy, FocusTarget, Highlighter, Host, ItemPath, MemoryTree, MemoryWorkspace, StyleSink, Workspace};

use crate::script::{Action, Script};

#[derive(Parser, Debug)]
#[command(name = "trailmark-replay")]
#[command(about = "Replay tree view events and print the highlighted path")]
struct Args {
	/// Script to replay (TOML)
	#[arg(short, long, value_name = "PATH")]
	script: PathBuf,

	/// Stored settings object (JSON); defaults when absent
	#[arg(long, value_name = "PATH")]
	settings: Option<PathBuf>,

	/// Timing overrides (TOML)
	#[arg(long, value_name = "PATH")]
	timings: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

/// Logs declarations instead of rendering them.
struct LogStyles;

impl StyleSink for LogStyles {
	fn apply_styles(&self, declarations: &[StyleDeclaration]) {
		for decl in declarations {
			tracing::trace!(property = decl.property, value = %decl.value, "replay.style");
		}
		tracing::debug!(count = declarations.len(), "replay.styles.applied");
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let default_level = if args.verbose { "debug" } else { "info" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let script = Script::load(&args.script)?;
	let timings = match &args.timings {
		Some(path) => Timings::load(path).with_context(|| format!("loading timings {}", path.display()))?,
		None => Timings::default(),
	};
	let store: Arc<dyn SettingsStore> = match &args.settings {
		Some(path) => Arc::new(JsonFileStore::new(path)),
		None => Arc::new(MemoryStore::new()),
	};

	let tree = Arc::new(MemoryTree::from_items(&script.tree));
	let workspace = Arc::new(MemoryWorkspace::new());
	let highlighter = Highlighter::load(
		Host {
			tree: tree.clone(),
			workspace: workspace.clone(),
			store,
			styles: Arc::new(LogStyles),
		},
		timings,
		FocusPolicy::default(),
	);

	tracing::info!(script = %args.script.display(), steps = script.steps.len(), "replay.start");
	highlighter.on_layout_ready();

	for (index, step) in script.steps.iter().enumerate() {
		tokio::time::sleep(Duration::from_millis(step.after_ms)).await;
		tracing::debug!(index, action = ?step.action, "replay.step");
		apply(&highlighter, &tree, &workspace, &step.action);
	}

	highlighter.wait_idle().await;
	let stats = highlighter.stats();
	tracing::info!(
		triggers = stats.triggers,
		passes = stats.passes,
		failures = stats.failures,
		superseded = stats.superseded,
		"replay.done"
	);
	print!("{}", render_tree(&tree, &workspace));
	highlighter.unload();
	Ok(())
}

fn apply(highlighter: &Highlighter<MemoryTree, MemoryWorkspace>, tree: &MemoryTree, workspace: &MemoryWorkspace, action: &Action) {
	match action {
		Action::Open(path) => {
			workspace.open(path.as_str());
			highlighter.on_active_item_changed();
		}
		Action::Close => {
			workspace.close();
			highlighter.on_active_item_changed();
		}
		Action::Click(Some(branch)) => tree.click(branch),
		Action::Click(None) => tree.pointer(),
		Action::Layout => highlighter.on_view_layout_changed(),
		Action::Focus(tag) => workspace.set_focus(FocusTarget::element(tag.as_str())),
		Action::FocusEditable => workspace.set_focus(FocusTarget::editable("div")),
		Action::Blur => workspace.set_focus(FocusTarget::Nothing),
		Action::Hide(branch) => tree.set_hidden(branch, true),
		Action::Show(branch) => tree.set_hidden(branch, false),
	}
}

/// One line per known branch, indented by depth, then the focus target.
fn render_tree(tree: &MemoryTree, workspace: &MemoryWorkspace) -> String {
	let mut out = String::new();
	for (path, collapsed) in tree.all_branches() {
		let depth = ItemPath::new(path.as_str()).depth();
		let name = Path::new(&path).file_name().and_then(|n| n.to_str()).unwrap_or(&path);
		let state = if collapsed { "collapsed" } else { "expanded" };
		let marks: Vec<&str> = tree.marks(&path).into_iter().map(|m| m.class_name()).collect();
		out.push_str(&format!(
			"{:indent$}{name}/ [{state}] {}\n",
			"",
			marks.join(" "),
			indent = depth.saturating_sub(1) * 2
		));
	}
	out.push_str(&format!("focus: {:?}\n", workspace.focus_target()));
	out
}
