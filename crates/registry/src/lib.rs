//! Candidate registry for transaction environment detection.
//!
//! This crate provides the data side of environment detection:
//! - [`EnvironmentDescriptor`]: Immutable record naming one candidate environment
//! - [`BindingStrategy`]: How a capability handle is obtained once selected
//! - [`DescriptorSource`]: Where a descriptor was declared
//! - [`CandidateRegistry`]: Priority-ordered, duplicate-checked descriptor set
//! - [`ConfigurationError`]: Malformed or conflicting declarations

mod descriptor;
mod error;
pub mod index;

pub use descriptor::{BindingStrategy, DEFAULT_ACCESSOR_METHOD, DescriptorSource, EnvironmentDescriptor};
pub use error::ConfigurationError;
pub use index::{Candidate, CandidateRegistry, Ordered, Snapshot};
