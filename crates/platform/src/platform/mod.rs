//! The transaction platform facade.
//!
//! # State Machine
//!
//! ```text
//! Unresolved --(first positive probe)--> Resolved   (terminal)
//! Unresolved --(candidates exhausted)--> Failed     (terminal)
//! ```
//!
//! Selection happens on first use of either handle. Each handle is then bound
//! lazily, once, and the outcome (handle or error) is memoized. A fresh facade
//! is required to probe again.
//!
//! # Concurrency
//!
//! Selection and both handles sit behind [`OnceLock`]s: at most one probing
//! pass and at most one binding per handle run, and concurrent callers block
//! until that run completes, then observe its result.

use std::sync::{Arc, OnceLock};

use txplat_registry::{CandidateRegistry, EnvironmentDescriptor};

use crate::{
	AccessorProbe, DirectoryService, EnvironmentProbe, PlatformError, PlatformNotFound,
	ProbeFaultPolicy, ResourceBinder, StaticAccessor, TransactionManagerHandle,
	UserTransactionHandle, builtins,
};


/// Observable resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformState {
	Unresolved,
	Resolved,
	Failed,
}

struct Resolver {
	registry: Arc<CandidateRegistry>,
	probe: Arc<dyn EnvironmentProbe>,
}

/// Stable surface exposing the host's transaction manager and user transaction.
pub struct TransactionPlatform {
	resolver: Option<Resolver>,
	binder: ResourceBinder,
	selection: OnceLock<Result<Arc<EnvironmentDescriptor>, PlatformError>>,
	transaction_manager: OnceLock<Result<TransactionManagerHandle, PlatformError>>,
	user_transaction: OnceLock<Result<UserTransactionHandle, PlatformError>>,
}

impl TransactionPlatform {
	/// Creates an unresolved platform that probes `registry` on first use.
	pub fn new(
		registry: Arc<CandidateRegistry>,
		probe: Arc<dyn EnvironmentProbe>,
		binder: ResourceBinder,
	) -> Self {
		Self {
			resolver: Some(Resolver { registry, probe }),
			binder,
			selection: OnceLock::new(),
			transaction_manager: OnceLock::new(),
			user_transaction: OnceLock::new(),
		}
	}

	/// Creates a platform already resolved to `descriptor`; nothing is probed.
	pub fn with_selection(descriptor: Arc<EnvironmentDescriptor>, binder: ResourceBinder) -> Self {
		Self {
			resolver: None,
			binder,
			selection: OnceLock::from(Ok(descriptor)),
			transaction_manager: OnceLock::new(),
			user_transaction: OnceLock::new(),
		}
	}

	/// Platform over the built-in WebSphere table, probing by type resolution.
	///
	/// Uses the default [`ProbeFaultPolicy::DeniedIsFatal`]: a candidate whose
	/// probe type is denied aborts selection even if a later version is present.
	/// Use [`websphere_with_policy`](Self::websphere_with_policy) with
	/// [`ProbeFaultPolicy::DeniedIsAbsent`] to skip denied candidates instead.
	pub fn websphere(
		directory: Arc<dyn DirectoryService>,
		accessor: Arc<dyn StaticAccessor>,
	) -> Result<Self, PlatformError> {
		Self::websphere_with_policy(directory, accessor, ProbeFaultPolicy::default())
	}

	/// Platform over the built-in WebSphere table with an explicit denied-probe policy.
	pub fn websphere_with_policy(
		directory: Arc<dyn DirectoryService>,
		accessor: Arc<dyn StaticAccessor>,
		policy: ProbeFaultPolicy,
	) -> Result<Self, PlatformError> {
		let registry = Arc::new(builtins::websphere_registry()?);
		let probe = Arc::new(AccessorProbe::new(Arc::clone(&accessor)).with_policy(policy));
		Ok(Self::new(registry, probe, ResourceBinder::new(directory, accessor)))
	}

	/// Returns the host transaction manager, binding it on first call.
	pub fn transaction_manager(&self) -> Result<TransactionManagerHandle, PlatformError> {
		self.transaction_manager
			.get_or_init(|| {
				let descriptor = self.selection()?;
				Ok(self.binder.bind_transaction_manager(&descriptor)?)
			})
			.clone()
	}

	/// Returns the host user transaction, binding it on first call.
	pub fn user_transaction(&self) -> Result<UserTransactionHandle, PlatformError> {
		self.user_transaction
			.get_or_init(|| {
				let descriptor = self.selection()?;
				Ok(self.binder.bind_user_transaction(&descriptor)?)
			})
			.clone()
	}

	/// Returns the selected descriptor, probing on first call.
	pub fn selection(&self) -> Result<Arc<EnvironmentDescriptor>, PlatformError> {
		self.selection.get_or_init(|| self.select()).clone()
	}

	/// Returns the resolution state without triggering probing.
	pub fn state(&self) -> PlatformState {
		match self.selection.get() {
			None => PlatformState::Unresolved,
			Some(Ok(_)) => PlatformState::Resolved,
			Some(Err(_)) => PlatformState::Failed,
		}
	}

	fn select(&self) -> Result<Arc<EnvironmentDescriptor>, PlatformError> {
		let mut attempted = Vec::new();
		let Some(resolver) = &self.resolver else {
			return Err(PlatformNotFound { attempted }.into());
		};

		for descriptor in resolver.registry.ordered() {
			attempted.push(descriptor.id.clone());
			match resolver.probe.probe(&descriptor) {
				Ok(true) => {
					tracing::debug!(
						registry = resolver.registry.label(),
						descriptor = %descriptor.id,
						label = %descriptor.label,
						probes = attempted.len(),
						"selected transaction environment"
					);
					return Ok(descriptor);
				}
				Ok(false) => {
					tracing::trace!(descriptor = %descriptor.id, "environment absent");
				}
				Err(e) => {
					tracing::warn!(descriptor = %descriptor.id, error = %e, "probe failed");
					return Err(e.into());
				}
			}
		}

		let err = PlatformNotFound { attempted };
		tracing::warn!(registry = resolver.registry.label(), error = %err, "no environment selected");
		Err(err.into())
	}
}

impl std::fmt::Debug for TransactionPlatform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransactionPlatform")
			.field("state", &self.state())
			.field(
				"selection",
				&self
					.selection
					.get()
					.and_then(|s| s.as_ref().ok())
					.map(|d| d.id.as_str()),
			)
			.finish_non_exhaustive()
	}
}
