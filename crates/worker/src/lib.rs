//! Worker primitives for trailmark: classified task spawning, generation-scoped
//! cancellation, a latest-wins pending slot, and the coalescing [`UpdateScheduler`].

mod class;
pub mod scheduler;
pub mod slot;
mod spawn;
pub mod token;

pub use class::TaskClass;
pub use scheduler::{DEFAULT_DEBOUNCE, PassRunner, SchedulerPhase, SchedulerStats, UpdateScheduler};
pub use slot::{PendingSlot, SlotOutcome};
pub use spawn::spawn;
pub use token::{Cancelled, GenerationToken};

/// Extracts the panic payload message from a join error, if the task panicked.
pub fn join_error_panic_message(err: tokio::task::JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	let payload = err.into_panic();
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		Some((*msg).to_string())
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		Some(msg.clone())
	} else {
		Some("non-string panic payload".to_string())
	}
}
