use thiserror::Error;
use txplat_registry::{BindingStrategy, ConfigurationError};

use crate::{HandleKind, LookupError};

/// No registered descriptor probed positively.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not locate a transaction environment (probed: [{probed}])", probed = .attempted.join(", "))]
pub struct PlatformNotFound {
	/// Descriptor ids in the order they were probed.
	pub attempted: Vec<String>,
}

/// Why a binding strategy failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingCause {
	#[error(transparent)]
	Lookup(#[from] LookupError),
	#[error("expected a {expected} capability, got a {found}")]
	WrongCapability {
		expected: HandleKind,
		found: HandleKind,
	},
}

/// A selected environment failed to produce one of its handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not bind {handle} for environment {descriptor_id:?} via {strategy}")]
pub struct BindingError {
	pub descriptor_id: String,
	pub handle: HandleKind,
	pub strategy: BindingStrategy,
	#[source]
	pub cause: BindingCause,
}

/// Terminal failure returned by the platform facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
	#[error(transparent)]
	NotFound(#[from] PlatformNotFound),
	#[error(transparent)]
	Binding(#[from] BindingError),
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
}
