//! TOML configuration for the platform.
//!
//! ```toml
//! builtins = true
//! probe = "accessor"
//! denied_probe = "fatal"
//!
//! [[environment]]
//! id = "liberty"
//! priority = 5
//! probe_key = "com.ibm.tx.jta.TransactionManagerFactory"
//! lookup_name = "java:comp/UserTransaction"
//! transaction_manager = { accessor = "getTransactionManager" }
//! user_transaction = "directory"
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use txplat_registry::{
	BindingStrategy, CandidateRegistry, ConfigurationError, DEFAULT_ACCESSOR_METHOD,
	DescriptorSource, EnvironmentDescriptor,
};

use crate::{
	AccessorProbe, DirectoryProbe, DirectoryService, EnvironmentProbe, ProbeFaultPolicy,
	ResourceBinder, StaticAccessor, TransactionPlatform, builtins,
};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read platform config: {0}")]
	Read(#[from] std::io::Error),
	#[error("failed to parse platform config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid platform config: {0}")]
	Invalid(#[from] ConfigurationError),
}

/// Which collaborator confirms an environment's presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
	/// Resolve the probe key as a host type.
	#[default]
	Accessor,
	/// Locate the probe key in the directory.
	Directory,
}

/// Binding strategy as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyEntry {
	Accessor(String),
	Directory,
}

impl From<StrategyEntry> for BindingStrategy {
	fn from(entry: StrategyEntry) -> Self {
		match entry {
			StrategyEntry::Accessor(method) => BindingStrategy::DirectAccessor { method },
			StrategyEntry::Directory => BindingStrategy::DirectoryLookup,
		}
	}
}

fn default_transaction_manager() -> StrategyEntry {
	StrategyEntry::Accessor(DEFAULT_ACCESSOR_METHOD.to_owned())
}

fn default_user_transaction() -> StrategyEntry {
	StrategyEntry::Directory
}

/// One `[[environment]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentEntry {
	pub id: String,
	pub priority: i32,
	pub probe_key: String,
	#[serde(default)]
	pub lookup_name: String,
	pub label: Option<String>,
	#[serde(default = "default_transaction_manager")]
	pub transaction_manager: StrategyEntry,
	#[serde(default = "default_user_transaction")]
	pub user_transaction: StrategyEntry,
}

impl From<EnvironmentEntry> for EnvironmentDescriptor {
	fn from(entry: EnvironmentEntry) -> Self {
		let label = entry.label.unwrap_or_else(|| entry.id.clone());
		EnvironmentDescriptor::new(entry.id, entry.priority, entry.probe_key, entry.lookup_name)
			.with_label(label)
			.with_transaction_manager(entry.transaction_manager.into())
			.with_user_transaction(entry.user_transaction.into())
	}
}

fn default_true() -> bool {
	true
}

/// Platform configuration file structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
	/// Seed the registry with the built-in WebSphere table.
	#[serde(default = "default_true")]
	pub builtins: bool,
	#[serde(default)]
	pub probe: ProbeKind,
	#[serde(default)]
	pub denied_probe: ProbeFaultPolicy,
	#[serde(default, rename = "environment")]
	pub environments: Vec<EnvironmentEntry>,
}

impl Default for PlatformConfig {
	fn default() -> Self {
		Self {
			builtins: true,
			probe: ProbeKind::default(),
			denied_probe: ProbeFaultPolicy::default(),
			environments: Vec::new(),
		}
	}
}

impl PlatformConfig {
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(s)?)
	}

	/// Reads and parses the file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(
			path = %path.display(),
			environments = config.environments.len(),
			"loaded platform config"
		);
		Ok(config)
	}

	/// Builds the candidate registry: builtins (if enabled), then configured entries.
	pub fn registry(&self) -> Result<CandidateRegistry, ConfigError> {
		let registry = if self.builtins {
			builtins::websphere_registry()?
		} else {
			CandidateRegistry::new("config")
		};
		registry.extend(
			DescriptorSource::Config,
			self.environments.iter().cloned().map(EnvironmentDescriptor::from),
		)?;
		Ok(registry)
	}

	/// Builds the probe selected by `probe` and `denied_probe`.
	pub fn probe(
		&self,
		directory: &Arc<dyn DirectoryService>,
		accessor: &Arc<dyn StaticAccessor>,
	) -> Arc<dyn EnvironmentProbe> {
		match self.probe {
			ProbeKind::Accessor => {
				Arc::new(AccessorProbe::new(Arc::clone(accessor)).with_policy(self.denied_probe))
			}
			ProbeKind::Directory => {
				Arc::new(DirectoryProbe::new(Arc::clone(directory)).with_policy(self.denied_probe))
			}
		}
	}

	/// Builds an unresolved platform over the given host collaborators.
	pub fn platform(
		&self,
		directory: Arc<dyn DirectoryService>,
		accessor: Arc<dyn StaticAccessor>,
	) -> Result<TransactionPlatform, ConfigError> {
		let registry = Arc::new(self.registry()?);
		let probe = self.probe(&directory, &accessor);
		Ok(TransactionPlatform::new(
			registry,
			probe,
			ResourceBinder::new(directory, accessor),
		))
	}
}
