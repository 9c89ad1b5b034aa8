use crate::DescriptorSource;

/// Declaration or probe defects that are not explained by an absent environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
	/// Two descriptors share an id.
	#[error("duplicate descriptor id {id:?} (already registered from {existing})")]
	DuplicateId {
		id: String,
		existing: DescriptorSource,
	},
	/// A descriptor is missing a required field.
	#[error("malformed descriptor {id:?}: {reason}")]
	Malformed { id: String, reason: &'static str },
	/// The probe was refused access to the resource it tests.
	#[error("probe of {id:?} was denied access to {target:?}: {reason}")]
	ProbeDenied {
		id: String,
		target: String,
		reason: String,
	},
	/// The probe failed for a reason other than absence.
	#[error("probe of {id:?} failed on {target:?}: {reason}")]
	ProbeFault {
		id: String,
		target: String,
		reason: String,
	},
}
