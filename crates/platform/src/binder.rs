//! Converts a selected environment into capability handles.

use std::sync::Arc;

use txplat_registry::{BindingStrategy, EnvironmentDescriptor};

use crate::{
	BindingCause, BindingError, Capability, DirectoryService, HandleKind, StaticAccessor,
	TransactionManagerHandle, UserTransactionHandle,
};

/// Binds handles using each descriptor's per-handle [`BindingStrategy`].
///
/// A failing strategy is a hard failure for that handle; there is no fallback
/// to another strategy or descriptor.
#[derive(Clone)]
pub struct ResourceBinder {
	directory: Arc<dyn DirectoryService>,
	accessor: Arc<dyn StaticAccessor>,
}

impl ResourceBinder {
	pub fn new(directory: Arc<dyn DirectoryService>, accessor: Arc<dyn StaticAccessor>) -> Self {
		Self {
			directory,
			accessor,
		}
	}

	pub fn bind_transaction_manager(
		&self,
		descriptor: &EnvironmentDescriptor,
	) -> Result<TransactionManagerHandle, BindingError> {
		let strategy = &descriptor.transaction_manager;
		match self.resolve(descriptor, HandleKind::TransactionManager, strategy)? {
			Capability::TransactionManager(handle) => Ok(handle),
			other => Err(mismatch(descriptor, HandleKind::TransactionManager, strategy, &other)),
		}
	}

	pub fn bind_user_transaction(
		&self,
		descriptor: &EnvironmentDescriptor,
	) -> Result<UserTransactionHandle, BindingError> {
		let strategy = &descriptor.user_transaction;
		match self.resolve(descriptor, HandleKind::UserTransaction, strategy)? {
			Capability::UserTransaction(handle) => Ok(handle),
			other => Err(mismatch(descriptor, HandleKind::UserTransaction, strategy, &other)),
		}
	}

	fn resolve(
		&self,
		descriptor: &EnvironmentDescriptor,
		handle: HandleKind,
		strategy: &BindingStrategy,
	) -> Result<Capability, BindingError> {
		let outcome = match strategy {
			BindingStrategy::DirectAccessor { method } => self
				.accessor
				.invoke_static_accessor(&descriptor.probe_key, method),
			BindingStrategy::DirectoryLookup => self.directory.locate(&descriptor.lookup_name),
		};

		outcome.map_err(|cause| {
			tracing::warn!(
				descriptor = %descriptor.id,
				%handle,
				%strategy,
				error = %cause,
				"binding failed"
			);
			BindingError {
				descriptor_id: descriptor.id.clone(),
				handle,
				strategy: strategy.clone(),
				cause: cause.into(),
			}
		})
	}
}

fn mismatch(
	descriptor: &EnvironmentDescriptor,
	expected: HandleKind,
	strategy: &BindingStrategy,
	found: &Capability,
) -> BindingError {
	BindingError {
		descriptor_id: descriptor.id.clone(),
		handle: expected,
		strategy: strategy.clone(),
		cause: BindingCause::WrongCapability {
			expected,
			found: found.kind(),
		},
	}
}
