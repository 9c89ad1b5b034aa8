use std::fmt;

use crate::ConfigurationError;

/// Accessor invoked on the probe type when no method is configured.
pub const DEFAULT_ACCESSOR_METHOD: &str = "getTransactionManager";

/// Represents where a descriptor was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DescriptorSource {
	/// Compiled-in seed table.
	Builtin,
	/// Loaded from a configuration file.
	Config,
	/// Registered programmatically at runtime.
	Runtime,
}

impl fmt::Display for DescriptorSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Builtin => write!(f, "builtin"),
			Self::Config => write!(f, "config"),
			Self::Runtime => write!(f, "runtime"),
		}
	}
}

/// How a single capability handle is obtained from a selected environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingStrategy {
	/// Invoke a no-argument static accessor on the descriptor's probe type.
	DirectAccessor {
		/// Accessor name, e.g. `getTransactionManager`.
		method: String,
	},
	/// Locate the handle in the directory under the descriptor's lookup name.
	DirectoryLookup,
}

impl BindingStrategy {
	/// Direct accessor strategy calling `method`.
	pub fn accessor(method: impl Into<String>) -> Self {
		Self::DirectAccessor {
			method: method.into(),
		}
	}
}

impl fmt::Display for BindingStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DirectAccessor { method } => write!(f, "accessor:{method}"),
			Self::DirectoryLookup => write!(f, "directory"),
		}
	}
}

/// Immutable record identifying one candidate environment and how to bind it.
///
/// Descriptors are ordered by `priority` (lower is probed first). The
/// registry breaks ties by declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
	/// Unique identifier (e.g. `"websphere-5.1"`).
	pub id: String,
	/// Probe order; ascending.
	pub priority: i32,
	/// Resource whose presence confirms the environment.
	pub probe_key: String,
	/// Directory name used by [`BindingStrategy::DirectoryLookup`].
	pub lookup_name: String,
	/// Human-readable version label for diagnostics.
	pub label: String,
	/// Strategy for the transaction-manager handle.
	pub transaction_manager: BindingStrategy,
	/// Strategy for the user-transaction handle.
	pub user_transaction: BindingStrategy,
}

impl EnvironmentDescriptor {
	/// Creates a descriptor with the conventional strategies: the transaction
	/// manager comes from [`DEFAULT_ACCESSOR_METHOD`] on the probe type and the
	/// user transaction from a directory lookup.
	pub fn new(
		id: impl Into<String>,
		priority: i32,
		probe_key: impl Into<String>,
		lookup_name: impl Into<String>,
	) -> Self {
		let id = id.into();
		Self {
			label: id.clone(),
			id,
			priority,
			probe_key: probe_key.into(),
			lookup_name: lookup_name.into(),
			transaction_manager: BindingStrategy::accessor(DEFAULT_ACCESSOR_METHOD),
			user_transaction: BindingStrategy::DirectoryLookup,
		}
	}

	/// Sets the diagnostic label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// Sets the transaction-manager binding strategy.
	pub fn with_transaction_manager(mut self, strategy: BindingStrategy) -> Self {
		self.transaction_manager = strategy;
		self
	}

	/// Sets the user-transaction binding strategy.
	pub fn with_user_transaction(mut self, strategy: BindingStrategy) -> Self {
		self.user_transaction = strategy;
		self
	}

	/// Checks the structural requirements every registered descriptor must meet.
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		let malformed = |reason| {
			Err(ConfigurationError::Malformed {
				id: self.id.clone(),
				reason,
			})
		};

		if self.id.trim().is_empty() {
			return malformed("id is empty");
		}
		if self.probe_key.trim().is_empty() {
			return malformed("probe key is empty");
		}
		for strategy in [&self.transaction_manager, &self.user_transaction] {
			match strategy {
				BindingStrategy::DirectAccessor { method } if method.trim().is_empty() => {
					return malformed("accessor method is empty");
				}
				BindingStrategy::DirectoryLookup if self.lookup_name.trim().is_empty() => {
					return malformed("directory strategy without lookup name");
				}
				_ => {}
			}
		}
		Ok(())
	}
}
