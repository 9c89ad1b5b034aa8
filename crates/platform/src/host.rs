//! Host collaborators consumed by probing and binding.

use std::sync::Arc;

use crate::Capability;

/// Failure reported by a host collaborator.
///
/// Only [`LookupError::NotFound`] means "this environment is absent"; the
/// other variants are defects and are never silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
	/// Nothing is registered under the name.
	#[error("{name:?} not found")]
	NotFound { name: String },
	/// The host refused access (e.g. a security policy).
	#[error("access to {name:?} denied: {reason}")]
	Denied { name: String, reason: String },
	/// The resource exists but producing the handle failed.
	#[error("invoking {target:?} failed: {reason}")]
	Invocation { target: String, reason: String },
}

impl LookupError {
	pub fn not_found(name: impl Into<String>) -> Self {
		Self::NotFound { name: name.into() }
	}
}

/// Directory/naming service.
pub trait DirectoryService: Send + Sync {
	/// Resolves the capability bound under `name`.
	fn locate(&self, name: &str) -> Result<Capability, LookupError>;
}

/// Host able to resolve types and call their static, no-argument accessors.
pub trait StaticAccessor: Send + Sync {
	/// Succeeds if `type_id` can be resolved in the host.
	fn resolve(&self, type_id: &str) -> Result<(), LookupError>;

	/// Invokes `method` on `type_id` and returns the capability it produces.
	fn invoke_static_accessor(&self, type_id: &str, method: &str) -> Result<Capability, LookupError>;
}

impl<T: DirectoryService + ?Sized> DirectoryService for Arc<T> {
	fn locate(&self, name: &str) -> Result<Capability, LookupError> {
		(**self).locate(name)
	}
}

impl<T: StaticAccessor + ?Sized> StaticAccessor for Arc<T> {
	fn resolve(&self, type_id: &str) -> Result<(), LookupError> {
		(**self).resolve(type_id)
	}

	fn invoke_static_accessor(&self, type_id: &str, method: &str) -> Result<Capability, LookupError> {
		(**self).invoke_static_accessor(type_id, method)
	}
}
