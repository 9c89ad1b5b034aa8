//! Transaction environment detection and capability binding.
//!
//! A [`TransactionPlatform`] probes an ordered [`CandidateRegistry`] for the
//! first environment that is present, then binds that environment's
//! transaction manager and user transaction through the host collaborators
//! ([`DirectoryService`], [`StaticAccessor`]).
//!
//! ```rust,ignore
//! let platform = TransactionPlatform::websphere(directory, accessor)?;
//! let tm = platform.transaction_manager()?;
//! let ut = platform.user_transaction()?;
//! ```
//!
//! Absent environments are skipped quietly; everything else (malformed
//! descriptors, denied probes, failed bindings) surfaces as a single
//! [`PlatformError`] carrying the descriptor id and the attempted strategy.

mod binder;
pub mod builtins;
mod capability;
pub mod config;
mod error;
mod host;
mod memory;
mod platform;
mod probe;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use binder::ResourceBinder;
pub use capability::{
	Capability, HandleKind, TransactionError, TransactionManager, TransactionManagerHandle,
	TransactionStatus, UserTransaction, UserTransactionHandle,
};
pub use config::{ConfigError, PlatformConfig};
pub use error::{BindingCause, BindingError, PlatformError, PlatformNotFound};
pub use host::{DirectoryService, LookupError, StaticAccessor};
pub use memory::{AccessorTable, MemoryDirectory};
pub use platform::{PlatformState, TransactionPlatform};
pub use probe::{AccessorProbe, DirectoryProbe, EnvironmentProbe, ProbeFaultPolicy};
pub use txplat_registry::{
	BindingStrategy, CandidateRegistry, ConfigurationError, DescriptorSource, EnvironmentDescriptor,
};
