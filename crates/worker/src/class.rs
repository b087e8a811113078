/// Execution classes for scheduler-owned tasks, recorded on every spawn for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// One-shot timers (debounce windows, delayed triggers).
	Timer,
	/// The loop that drains the pending slot and runs passes back to back.
	Driver,
	/// The body of a single pass.
	Pass,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Timer => "timer",
			Self::Driver => "driver",
			Self::Pass => "pass",
		}
	}
}
