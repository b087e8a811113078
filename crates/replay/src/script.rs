//! Replay scripts.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

/// A recorded session: the tree's items and the events to replay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
	/// Leaf item paths. Every ancestor branch is created expanded.
	pub tree: Vec<String>,
	#[serde(default, rename = "step")]
	pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
	/// Wait before the action, in milliseconds.
	#[serde(default)]
	pub after_ms: u64,
	pub action: Action,
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Action {
	/// `open <path>`: the item becomes active.
	Open(String),
	/// `close`: no item is active.
	Close,
	/// `click [<branch>]`: pointer event in the tree, toggling `branch` if given.
	Click(Option<String>),
	/// `layout`: the view layout changed.
	Layout,
	/// `focus <tag>`: a non-editable element takes focus.
	Focus(String),
	/// `focus-editable`: an editable region takes focus.
	FocusEditable,
	/// `blur`: nothing is focused.
	Blur,
	/// `hide <branch>`: the branch stops being rendered.
	Hide(String),
	/// `show <branch>`: the branch is rendered again.
	Show(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseActionError {
	#[error("unknown action `{0}`")]
	Unknown(String),
	#[error("action `{0}` needs an argument")]
	MissingArgument(&'static str),
	#[error("action `{0}` takes no argument")]
	UnexpectedArgument(&'static str),
}

impl FromStr for Action {
	type Err = ParseActionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let (verb, arg) = match s.split_once(char::is_whitespace) {
			Some((verb, arg)) => (verb, Some(arg.trim().to_string()).filter(|a| !a.is_empty())),
			None => (s, None),
		};

		let required = |name: &'static str| arg.clone().ok_or(ParseActionError::MissingArgument(name));
		let bare = |name: &'static str, action: Action| {
			if arg.is_some() {
				Err(ParseActionError::UnexpectedArgument(name))
			} else {
				Ok(action)
			}
		};

		match verb {
			"open" => required("open").map(Action::Open),
			"close" => bare("close", Action::Close),
			"click" => Ok(Action::Click(arg.clone())),
			"layout" => bare("layout", Action::Layout),
			"focus" => required("focus").map(Action::Focus),
			"focus-editable" => bare("focus-editable", Action::FocusEditable),
			"blur" => bare("blur", Action::Blur),
			"hide" => required("hide").map(Action::Hide),
			"show" => required("show").map(Action::Show),
			other => Err(ParseActionError::Unknown(other.to_string())),
		}
	}
}

impl TryFrom<String> for Action {
	type Error = ParseActionError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl Script {
	pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
		Self::from_toml_str(&text).with_context(|| format!("parsing script {}", path.display()))
	}
}
