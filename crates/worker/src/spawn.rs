use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::TaskClass;

/// Single-worker runtime for triggers that arrive from outside any runtime.
fn fallback_runtime() -> &'static Runtime {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK.get_or_init(|| {
		Builder::new_multi_thread()
			.worker_threads(1)
			.enable_time()
			.thread_name("trailmark-fallback")
			.build()
			.expect("failed to build trailmark fallback runtime")
	})
}

/// Spawns `fut` on the ambient runtime, or on the fallback runtime when the
/// caller is not inside one. The task runs in a `worker.task` span tagged
/// with its class.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	let span = tracing::trace_span!("worker.task", class = class.as_str());
	tracing::trace!(parent: &span, "worker.spawn");
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut.instrument(span)),
		Err(_) => fallback_runtime().spawn(fut.instrument(span)),
	}
}
