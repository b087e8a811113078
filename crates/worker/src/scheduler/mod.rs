//! Coalescing update scheduler.
//!
//! Bursts of [`UpdateScheduler::trigger`] calls collapse into a single pass:
//! every trigger restarts a trailing debounce timer, and only a timer that runs
//! to completion offers a request to the capacity-one [`PendingSlot`]. A driver
//! task drains the slot one pass at a time, so requests arriving while a pass
//! runs collapse into exactly one follow-up pass.
//!
//! ```text
//! Idle ──trigger──▶ Debouncing ──timer──▶ Running ──done──▶ Idle
//!                                          │   ▲
//!                                    timer │   │ done, slot taken
//!                                          ▼   │
//!                                    RunningNextQueued
//! ```
//!
//! Teardown closes the slot and cancels the root token; every armed timer and
//! the in-flight pass scope are children of that token.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::slot::{PendingSlot, SlotOutcome};
use crate::token::{GenerationClock, GenerationToken};
use crate::{TaskClass, join_error_panic_message, spawn};

/// Trailing debounce applied by [`UpdateScheduler::trigger`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Work executed by an [`UpdateScheduler`], one pass at a time.
#[async_trait]
pub trait PassRunner: Send + Sync + 'static {
	/// Failure type; logged by the scheduler, never propagated.
	type Error: std::fmt::Display + Send + 'static;

	/// Runs one pass. Long waits inside the pass should go through
	/// [`GenerationToken::pause`] so teardown can abort them.
	async fn run(&self, scope: &GenerationToken) -> Result<(), Self::Error>;
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
	/// No timer armed, no pass running.
	Idle,
	/// A debounce timer is armed and no pass is running.
	Debouncing,
	/// A pass is running and the slot is empty.
	Running,
	/// A pass is running and a follow-up request waits in the slot.
	RunningNextQueued,
	/// Torn down; triggers are ignored.
	Closed,
}

/// Counters describing scheduler activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
	/// Calls to [`UpdateScheduler::trigger`] and [`UpdateScheduler::trigger_after`].
	pub triggers: u64,
	/// Passes that started executing.
	pub passes: u64,
	/// Passes that returned an error or panicked.
	pub failures: u64,
	/// Requests dropped from the slot in favour of a newer one.
	pub superseded: u64,
}

/// Request produced by a debounce timer that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PassRequest {
	timer: u64,
}

struct Core {
	phase: SchedulerPhase,
	timer: Option<GenerationToken>,
	running: bool,
	pending: PendingSlot<PassRequest>,
}

impl Core {
	fn settle(&mut self) -> SchedulerPhase {
		self.phase = if self.pending.is_closed() {
			SchedulerPhase::Closed
		} else if self.running && self.pending.is_pending() {
			SchedulerPhase::RunningNextQueued
		} else if self.running {
			SchedulerPhase::Running
		} else if self.timer.is_some() {
			SchedulerPhase::Debouncing
		} else {
			SchedulerPhase::Idle
		};
		self.phase
	}
}

#[derive(Default)]
struct Counters {
	triggers: AtomicU64,
	passes: AtomicU64,
	failures: AtomicU64,
	superseded: AtomicU64,
}

struct Shared<R> {
	runner: Arc<R>,
	debounce: Duration,
	root: CancellationToken,
	clock: GenerationClock,
	core: Mutex<Core>,
	phase_tx: watch::Sender<SchedulerPhase>,
	counters: Counters,
}

/// Debounced, single-flight pass scheduler.
pub struct UpdateScheduler<R> {
	shared: Arc<Shared<R>>,
}

impl<R> Clone for UpdateScheduler<R> {
	fn clone(&self) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
		}
	}
}

impl<R> std::fmt::Debug for UpdateScheduler<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UpdateScheduler")
			.field("debounce", &self.shared.debounce)
			.field("phase", &self.shared.core.lock().phase)
			.finish()
	}
}

impl<R: PassRunner> UpdateScheduler<R> {
	/// Creates an idle scheduler around `runner`.
	pub fn new(runner: Arc<R>, debounce: Duration) -> Self {
		let (phase_tx, _) = watch::channel(SchedulerPhase::Idle);
		Self {
			shared: Arc::new(Shared {
				runner,
				debounce,
				root: CancellationToken::new(),
				clock: GenerationClock::new(),
				core: Mutex::new(Core {
					phase: SchedulerPhase::Idle,
					timer: None,
					running: false,
					pending: PendingSlot::new(),
				}),
				phase_tx,
				counters: Counters::default(),
			}),
		}
	}

	/// Requests a pass once the debounce window passes without another trigger.
	pub fn trigger(&self) {
		self.trigger_after(self.shared.debounce);
	}

	/// Like [`Self::trigger`] with an explicit quiet period.
	///
	/// Any armed timer is cancelled and replaced, whatever its delay.
	pub fn trigger_after(&self, delay: Duration) {
		let token = {
			let mut core = self.shared.core.lock();
			if core.pending.is_closed() {
				tracing::trace!("scheduler.trigger.closed");
				return;
			}
			if let Some(previous) = core.timer.take() {
				previous.cancel();
			}
			let token = GenerationToken::new(self.shared.clock.next(), self.shared.root.child_token());
			core.timer = Some(token.clone());
			self.shared.publish(&mut core);
			token
		};
		self.shared.counters.triggers.fetch_add(1, Ordering::Relaxed);
		tracing::trace!(timer = token.generation(), delay_ms = delay.as_millis() as u64, "scheduler.trigger");

		let shared = Arc::clone(&self.shared);
		spawn(TaskClass::Timer, async move {
			if token.pause(delay).await.is_ok() {
				shared.enqueue(token.generation());
			}
		});
	}

	/// Cancels the armed timer, drops any queued request and refuses further triggers.
	///
	/// A pass already executing keeps running, but its scope is cancelled so
	/// its remaining pauses return early.
	pub fn teardown(&self) {
		let mut core = self.shared.core.lock();
		if let Some(timer) = core.timer.take() {
			timer.cancel();
		}
		core.pending.close();
		self.shared.root.cancel();
		self.shared.publish(&mut core);
		tracing::debug!(running = core.running, "scheduler.teardown");
	}

	/// Current phase.
	pub fn phase(&self) -> SchedulerPhase {
		self.shared.core.lock().phase
	}

	/// Returns true once [`Self::teardown`] has run.
	pub fn is_closed(&self) -> bool {
		self.phase() == SchedulerPhase::Closed
	}

	/// Watches phase transitions.
	pub fn subscribe(&self) -> watch::Receiver<SchedulerPhase> {
		self.shared.phase_tx.subscribe()
	}

	/// Resolves once the scheduler is idle, or closed with no pass running.
	pub async fn wait_idle(&self) {
		let mut rx = self.subscribe();
		loop {
			if self.is_settled() {
				return;
			}
			if rx.changed().await.is_err() {
				return;
			}
		}
	}

	fn is_settled(&self) -> bool {
		let core = self.shared.core.lock();
		match core.phase {
			SchedulerPhase::Idle => true,
			SchedulerPhase::Closed => !core.running,
			_ => false,
		}
	}

	/// Activity counters.
	pub fn stats(&self) -> SchedulerStats {
		let c = &self.shared.counters;
		SchedulerStats {
			triggers: c.triggers.load(Ordering::Relaxed),
			passes: c.passes.load(Ordering::Relaxed),
			failures: c.failures.load(Ordering::Relaxed),
			superseded: c.superseded.load(Ordering::Relaxed),
		}
	}

	/// The runner passes are executed on.
	pub fn runner(&self) -> &Arc<R> {
		&self.shared.runner
	}
}

impl<R: PassRunner> Shared<R> {
	fn publish(&self, core: &mut Core) {
		// Always notify: `wait_idle` also cares about the running flag behind `Closed`.
		self.phase_tx.send_replace(core.settle());
	}

	/// Called by a timer that slept its full delay.
	fn enqueue(self: &Arc<Self>, timer: u64) {
		let first = {
			let mut core = self.core.lock();
			match &core.timer {
				Some(armed) if armed.generation() == timer && !armed.is_cancelled() => {}
				// Superseded by a newer trigger or torn down while waking.
				_ => return,
			}
			core.timer = None;
			match core.pending.offer(PassRequest { timer }) {
				SlotOutcome::Closed => return,
				SlotOutcome::Superseded => {
					self.counters.superseded.fetch_add(1, Ordering::Relaxed);
					tracing::debug!(timer, "scheduler.request.superseded");
				}
				SlotOutcome::Filled => {}
			}
			let first = if core.running {
				None
			} else {
				core.running = true;
				core.pending.take()
			};
			self.publish(&mut core);
			first
		};

		if let Some(request) = first {
			spawn(TaskClass::Driver, Arc::clone(self).drive(request));
		}
	}

	/// Runs `first`, then queued requests back to back until the slot is empty.
	async fn drive(self: Arc<Self>, first: PassRequest) {
		let mut request = first;
		loop {
			let scope = GenerationToken::new(self.clock.next(), self.root.child_token());
			self.execute(request, scope).await;

			let next = {
				let mut core = self.core.lock();
				let next = core.pending.take();
				if next.is_none() {
					core.running = false;
				}
				self.publish(&mut core);
				next
			};
			match next {
				Some(queued) => request = queued,
				None => return,
			}
		}
	}

	async fn execute(&self, request: PassRequest, scope: GenerationToken) {
		if scope.is_cancelled() {
			return;
		}
		self.counters.passes.fetch_add(1, Ordering::Relaxed);
		let started = tokio::time::Instant::now();
		let pass = scope.generation();

		let runner = Arc::clone(&self.runner);
		let pass_scope = scope.clone();
		let handle = spawn(TaskClass::Pass, async move { runner.run(&pass_scope).await });

		match handle.await {
			Ok(Ok(())) => {
				tracing::debug!(pass, timer = request.timer, elapsed_ms = started.elapsed().as_millis() as u64, "scheduler.pass.done");
			}
			Ok(Err(err)) if scope.is_cancelled() => {
				tracing::debug!(pass, error = %err, "scheduler.pass.cancelled");
			}
			Ok(Err(err)) => {
				self.counters.failures.fetch_add(1, Ordering::Relaxed);
				tracing::warn!(pass, error = %err, "scheduler.pass.failed");
			}
			Err(err) if err.is_panic() => {
				self.counters.failures.fetch_add(1, Ordering::Relaxed);
				let message = join_error_panic_message(err).unwrap_or_default();
				tracing::error!(pass, panic = %message, "scheduler.pass.panicked");
			}
			Err(err) => {
				self.counters.failures.fetch_add(1, Ordering::Relaxed);
				tracing::warn!(pass, error = %err, "scheduler.pass.join_failed");
			}
		}
	}
}
