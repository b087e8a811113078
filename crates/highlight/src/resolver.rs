//! Classification of the active item's ancestor chain.
//!
//! Pure: the caller supplies a lookup into the live tree and gets back which
//! materialized branches are the containing, root and intermediate ones.
//! Missing branches (not rendered yet) are skipped.

use trailmark_config::MarkKind;

use crate::path::ItemPath;

/// Branches on the active item's path, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClassification<B> {
	/// Nearest materialized ancestor.
	pub containing: Option<B>,
	/// Top-level ancestor, when materialized and distinct from `containing`.
	pub root: Option<B>,
	/// Every other materialized ancestor, nearest first.
	pub intermediates: Vec<B>,
}

impl<B> Default for PathClassification<B> {
	fn default() -> Self {
		Self {
			containing: None,
			root: None,
			intermediates: Vec::new(),
		}
	}
}

impl<B> PathClassification<B> {
	/// Flattens into `(branch, mark)` pairs.
	///
	/// With root highlighting disabled the root branch is marked as an
	/// intermediate, after the other intermediates.
	pub fn into_marks(self, highlight_root: bool) -> Vec<(B, MarkKind)> {
		let Self { containing, root, intermediates } = self;
		let mut marks = Vec::with_capacity(intermediates.len() + 2);
		marks.extend(containing.map(|b| (b, MarkKind::Active)));
		if highlight_root {
			marks.extend(root.map(|b| (b, MarkKind::Root)));
			marks.extend(intermediates.into_iter().map(|b| (b, MarkKind::Intermediate)));
		} else {
			marks.extend(intermediates.into_iter().chain(root).map(|b| (b, MarkKind::Intermediate)));
		}
		marks
	}
}

/// Classifies the ancestors of `active`, resolving each ancestor path once.
///
/// Deterministic for a given tree snapshot. Branches the lookup returns more
/// than once (hosts that resolve a path to its closest rendered container)
/// are classified only once, with the nearest role winning.
pub fn classify<B, F>(active: &ItemPath, mut lookup: F) -> PathClassification<B>
where
	B: PartialEq,
	F: FnMut(&str) -> Option<B>,
{
	let mut resolved: Vec<Option<B>> = active.ancestors().iter().map(|path| lookup(path.as_str())).collect();
	let Some(nearest) = resolved.iter().position(Option::is_some) else {
		return PathClassification::default();
	};

	let root_index = resolved.len() - 1;
	let containing = resolved[nearest].take();
	let root = if root_index > nearest {
		resolved[root_index].take().filter(|root| containing.as_ref() != Some(root))
	} else {
		None
	};

	let mut intermediates: Vec<B> = Vec::new();
	for branch in resolved.into_iter().skip(nearest + 1).flatten() {
		let duplicate = containing.as_ref() == Some(&branch) || root.as_ref() == Some(&branch) || intermediates.contains(&branch);
		if !duplicate {
			intermediates.push(branch);
		}
	}

	PathClassification { containing, root, intermediates }
}
