use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Suppression window applied after a manual interaction with the tree.
pub const DEFAULT_INTERACTION_WINDOW: Duration = Duration::from_millis(300);

/// Timestamp of the most recent manual interaction with the tree view.
///
/// Last write wins; readers only care about recency.
#[derive(Debug, Default)]
pub struct InteractionTracker {
	last: Mutex<Option<Instant>>,
}

impl InteractionTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stamps the current time.
	pub fn record_interaction(&self) {
		self.record_interaction_at(Instant::now());
	}

	pub fn record_interaction_at(&self, at: Instant) {
		*self.last.lock() = Some(at);
		tracing::trace!("interaction.recorded");
	}

	/// True when an interaction was recorded less than `window` ago.
	pub fn is_recent_interaction(&self, window: Duration) -> bool {
		match *self.last.lock() {
			Some(at) => Instant::now().saturating_duration_since(at) < window,
			None => false,
		}
	}

	pub fn last_interaction(&self) -> Option<Instant> {
		*self.last.lock()
	}
}
