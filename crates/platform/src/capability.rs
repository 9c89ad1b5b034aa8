//! Opaque transaction capabilities supplied by the hosting environment.
//!
//! The platform never inspects these handles; it stores and forwards them.
//! Ownership of the underlying resource stays with the host, so dropping a
//! handle never closes anything.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Status of the transaction associated with the calling context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
	Active,
	MarkedRollback,
	Prepared,
	Committed,
	RolledBack,
	Unknown,
	NoTransaction,
	Preparing,
	Committing,
	RollingBack,
}

/// Failure reported by a host transaction primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
	#[error("operation not supported: {0}")]
	NotSupported(String),
	#[error("illegal transaction state: {0}")]
	IllegalState(String),
	#[error("system failure: {0}")]
	System(String),
}

/// Transaction-boundary operations exposed by a host transaction manager.
pub trait TransactionManager: Send + Sync + fmt::Debug {
	fn begin(&self) -> Result<(), TransactionError>;
	fn commit(&self) -> Result<(), TransactionError>;
	fn rollback(&self) -> Result<(), TransactionError>;
	fn status(&self) -> Result<TransactionStatus, TransactionError>;
}

/// Application-facing transaction demarcation exposed by the host.
pub trait UserTransaction: Send + Sync + fmt::Debug {
	fn begin(&self) -> Result<(), TransactionError>;
	fn commit(&self) -> Result<(), TransactionError>;
	fn rollback(&self) -> Result<(), TransactionError>;
	fn set_rollback_only(&self) -> Result<(), TransactionError>;
	fn status(&self) -> Result<TransactionStatus, TransactionError>;
}

macro_rules! capability_handle {
	($(#[$doc:meta])* $name:ident, $trait:ident) => {
		$(#[$doc])*
		#[derive(Clone)]
		pub struct $name(Arc<dyn $trait>);

		impl $name {
			/// Wraps a host implementation.
			pub fn new(inner: impl $trait + 'static) -> Self {
				Self(Arc::new(inner))
			}

			/// Wraps an already shared host implementation.
			pub fn from_arc(inner: Arc<dyn $trait>) -> Self {
				Self(inner)
			}

			/// Returns true if both handles refer to the same host object.
			pub fn ptr_eq(&self, other: &Self) -> bool {
				std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
			}
		}

		impl Deref for $name {
			type Target = dyn $trait;

			fn deref(&self) -> &Self::Target {
				&*self.0
			}
		}

		impl fmt::Debug for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.debug_tuple(stringify!($name)).field(&self.0).finish()
			}
		}
	};
}

capability_handle!(
	/// Shared reference to the host's transaction manager.
	TransactionManagerHandle,
	TransactionManager
);

capability_handle!(
	/// Shared reference to the host's user transaction.
	UserTransactionHandle,
	UserTransaction
);

/// Which of the two capability handles is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
	TransactionManager,
	UserTransaction,
}

impl fmt::Display for HandleKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TransactionManager => write!(f, "transaction manager"),
			Self::UserTransaction => write!(f, "user transaction"),
		}
	}
}

/// A handle as returned by a host collaborator, tagged with its kind.
#[derive(Debug, Clone)]
pub enum Capability {
	TransactionManager(TransactionManagerHandle),
	UserTransaction(UserTransactionHandle),
}

impl Capability {
	/// Returns the kind of handle carried.
	pub fn kind(&self) -> HandleKind {
		match self {
			Self::TransactionManager(_) => HandleKind::TransactionManager,
			Self::UserTransaction(_) => HandleKind::UserTransaction,
		}
	}
}

impl From<TransactionManagerHandle> for Capability {
	fn from(handle: TransactionManagerHandle) -> Self {
		Self::TransactionManager(handle)
	}
}

impl From<UserTransactionHandle> for Capability {
	fn from(handle: UserTransactionHandle) -> Self {
		Self::UserTransaction(handle)
	}
}
