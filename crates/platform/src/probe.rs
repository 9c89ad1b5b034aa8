//! Environment presence probes.
//!
//! A probe answers "is this environment here?" and nothing else. Absence is
//! an expected outcome and comes back as `Ok(false)` so that N candidates can
//! be tried without N error reports. Anything that is not absence is a defect
//! and surfaces as a [`ConfigurationError`].

use serde::Deserialize;
use txplat_registry::{ConfigurationError, EnvironmentDescriptor};

use crate::{DirectoryService, LookupError, StaticAccessor};

/// Tests whether the environment described by a descriptor is present.
pub trait EnvironmentProbe: Send + Sync {
	fn probe(&self, descriptor: &EnvironmentDescriptor) -> Result<bool, ConfigurationError>;
}

impl<F> EnvironmentProbe for F
where
	F: Fn(&EnvironmentDescriptor) -> Result<bool, ConfigurationError> + Send + Sync,
{
	fn probe(&self, descriptor: &EnvironmentDescriptor) -> Result<bool, ConfigurationError> {
		self(descriptor)
	}
}

/// How a probe treats [`LookupError::Denied`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ProbeFaultPolicy {
	/// Denied access is a defect and aborts selection.
	#[default]
	#[serde(rename = "fatal")]
	DeniedIsFatal,
	/// Denied access counts as absence; probing moves on.
	#[serde(rename = "absent")]
	DeniedIsAbsent,
}

/// Maps a collaborator outcome onto the probe contract.
fn classify<T>(
	descriptor: &EnvironmentDescriptor,
	outcome: Result<T, LookupError>,
	policy: ProbeFaultPolicy,
) -> Result<bool, ConfigurationError> {
	match outcome {
		Ok(_) => Ok(true),
		Err(LookupError::NotFound { .. }) => Ok(false),
		Err(LookupError::Denied { name, reason }) => match policy {
			ProbeFaultPolicy::DeniedIsAbsent => {
				tracing::debug!(
					descriptor = %descriptor.id,
					resource = %name,
					%reason,
					"probe denied, treating as absent"
				);
				Ok(false)
			}
			ProbeFaultPolicy::DeniedIsFatal => Err(ConfigurationError::ProbeDenied {
				id: descriptor.id.clone(),
				target: name,
				reason,
			}),
		},
		Err(LookupError::Invocation { target, reason }) => Err(ConfigurationError::ProbeFault {
			id: descriptor.id.clone(),
			target,
			reason,
		}),
	}
}

fn check_probe_key(descriptor: &EnvironmentDescriptor) -> Result<(), ConfigurationError> {
	if descriptor.probe_key.trim().is_empty() {
		return Err(ConfigurationError::Malformed {
			id: descriptor.id.clone(),
			reason: "probe key is empty",
		});
	}
	Ok(())
}

/// Probes by resolving the descriptor's probe key as a host type.
pub struct AccessorProbe<A> {
	accessor: A,
	policy: ProbeFaultPolicy,
}

impl<A: StaticAccessor> AccessorProbe<A> {
	pub fn new(accessor: A) -> Self {
		Self {
			accessor,
			policy: ProbeFaultPolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: ProbeFaultPolicy) -> Self {
		self.policy = policy;
		self
	}
}

impl<A: StaticAccessor> EnvironmentProbe for AccessorProbe<A> {
	fn probe(&self, descriptor: &EnvironmentDescriptor) -> Result<bool, ConfigurationError> {
		check_probe_key(descriptor)?;
		classify(
			descriptor,
			self.accessor.resolve(&descriptor.probe_key),
			self.policy,
		)
	}
}

/// Probes by locating the descriptor's probe key in the directory.
pub struct DirectoryProbe<D> {
	directory: D,
	policy: ProbeFaultPolicy,
}

impl<D: DirectoryService> DirectoryProbe<D> {
	pub fn new(directory: D) -> Self {
		Self {
			directory,
			policy: ProbeFaultPolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: ProbeFaultPolicy) -> Self {
		self.policy = policy;
		self
	}
}

impl<D: DirectoryService> EnvironmentProbe for DirectoryProbe<D> {
	fn probe(&self, descriptor: &EnvironmentDescriptor) -> Result<bool, ConfigurationError> {
		check_probe_key(descriptor)?;
		classify(
			descriptor,
			self.directory.locate(&descriptor.probe_key),
			self.policy,
		)
	}
}
