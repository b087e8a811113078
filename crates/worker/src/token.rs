use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Returned by cancellable waits when their scope was cancelled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("cancelled")
	}
}

impl std::error::Error for Cancelled {}

/// Monotonic generation clock. Each debounce window and each pass gets a fresh generation.
#[derive(Debug, Default, Clone)]
pub(crate) struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Generation-scoped cancellation handle.
///
/// Every timer and pass owned by a scheduler holds a child of the scheduler's
/// root token, so teardown cancels all of them as a unit.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub(crate) fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	/// Creates a standalone token that is never cancelled by a scheduler.
	///
	/// Useful for running a pass body directly, outside any scheduler.
	pub fn detached() -> Self {
		Self::new(0, CancellationToken::new())
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// Sleeps for `duration` unless the token is cancelled first.
	///
	/// A token that is already cancelled returns immediately without sleeping.
	pub async fn pause(&self, duration: Duration) -> Result<(), Cancelled> {
		if self.is_cancelled() {
			return Err(Cancelled);
		}
		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => Err(Cancelled),
			_ = tokio::time::sleep(duration) => Ok(()),
		}
	}

	/// Returns `Err(Cancelled)` if cancellation was requested.
	pub fn check(&self) -> Result<(), Cancelled> {
		if self.is_cancelled() { Err(Cancelled) } else { Ok(()) }
	}

	/// Creates a child token in the same generation.
	pub fn child(&self) -> Self {
		Self {
			generation: self.generation,
			cancel: self.cancel.child_token(),
		}
	}
}
