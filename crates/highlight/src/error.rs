//! Error types for host calls and sync passes.

use thiserror::Error;
use trailmark_worker::Cancelled;

/// Failure reported by a host tree operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The handle no longer refers to a rendered node. Treated as a
	/// resolution miss, not a failure.
	#[error("node {0} is no longer rendered")]
	Detached(String),

	/// The host refused or failed the operation.
	#[error("host operation failed: {0}")]
	Failed(String),
}

/// Why a sync pass stopped early.
#[derive(Debug, Error)]
pub enum PassError {
	/// The scheduler was torn down during a pause.
	#[error("pass cancelled")]
	Cancelled(#[from] Cancelled),

	/// A host tree operation failed.
	#[error(transparent)]
	Host(#[from] HostError),
}

/// Result type for sync passes.
pub type Result<T> = std::result::Result<T, PassError>;
