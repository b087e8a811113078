use std::fmt;

/// Slash-delimited path of a leaf item, segment order = ancestor order.
///
/// Empty segments (leading, trailing or doubled slashes) are ignored when
/// walking ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemPath(String);

impl ItemPath {
	pub fn new(path: impl Into<String>) -> Self {
		Self(path.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Non-empty segments.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('/').filter(|s| !s.is_empty())
	}

	/// The path with empty segments dropped, as hosts key their nodes.
	pub fn normalized(&self) -> String {
		self.segments().collect::<Vec<_>>().join("/")
	}

	/// Number of non-empty segments.
	pub fn depth(&self) -> usize {
		self.segments().count()
	}

	/// Ancestor branch paths, nearest first.
	///
	/// `"A/B/C/note.md"` yields `["A/B/C", "A/B", "A"]`; an item at the tree
	/// root has no ancestors.
	pub fn ancestors(&self) -> Vec<String> {
		let segments: Vec<&str> = self.segments().collect();
		(1..segments.len()).rev().map(|n| segments[..n].join("/")).collect()
	}

	/// Immediate parent branch path.
	pub fn parent(&self) -> Option<String> {
		self.ancestors().into_iter().next()
	}

	/// Top-level ancestor branch path.
	pub fn root(&self) -> Option<String> {
		self.ancestors().pop()
	}
}

impl fmt::Display for ItemPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ItemPath {
	fn from(path: &str) -> Self {
		Self::new(path)
	}
}

impl From<String> for ItemPath {
	fn from(path: String) -> Self {
		Self(path)
	}
}
