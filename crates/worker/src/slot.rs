/// Outcome from offering a value to a [`PendingSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
	/// Slot was empty and now holds the value.
	Filled,
	/// A previously pending value was dropped in favour of the new one.
	Superseded,
	/// Slot is closed; the value was dropped.
	Closed,
}

/// Capacity-one "latest wins" queue.
///
/// Offering a value while one is already pending replaces it; nothing is ever
/// appended. Once closed the slot stays empty for good.
#[derive(Debug)]
pub struct PendingSlot<T> {
	value: Option<T>,
	closed: bool,
}

impl<T> Default for PendingSlot<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> PendingSlot<T> {
	/// Creates an empty, open slot.
	pub const fn new() -> Self {
		Self { value: None, closed: false }
	}

	/// Stores `value`, replacing any pending value.
	pub fn offer(&mut self, value: T) -> SlotOutcome {
		if self.closed {
			return SlotOutcome::Closed;
		}
		match self.value.replace(value) {
			Some(_) => SlotOutcome::Superseded,
			None => SlotOutcome::Filled,
		}
	}

	/// Removes and returns the pending value.
	pub fn take(&mut self) -> Option<T> {
		self.value.take()
	}

	/// Returns true when a value is pending.
	pub fn is_pending(&self) -> bool {
		self.value.is_some()
	}

	/// Drops the pending value and refuses all future offers.
	pub fn close(&mut self) {
		self.closed = true;
		self.value = None;
	}

	/// Returns true once [`Self::close`] has been called.
	pub fn is_closed(&self) -> bool {
		self.closed
	}
}
