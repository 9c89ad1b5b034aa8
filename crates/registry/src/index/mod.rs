//! Priority-ordered candidate registry.
//!
//! # Mental Model
//!
//! 1. **Registration:** [`CandidateRegistry::register`] validates a descriptor, rejects
//!    duplicate ids, and publishes a new [`Snapshot`] with the descriptor inserted at its
//!    `(priority, ordinal)` position.
//! 2. **Consumption:** [`CandidateRegistry::ordered`] pins the current snapshot and yields
//!    descriptors lazily in probe order.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of the current snapshot).
//! - **Writes:** Serialized by a writer lock; readers never observe a partial registration.
//!
//! # Invariants
//!
//! - Ids are unique. A rejected registration leaves the published snapshot untouched.
//! - Probe order is `(priority ascending, declaration ordinal ascending)`, a total order.

mod snapshot;

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
pub use snapshot::{Candidate, Ordered, Snapshot};

use crate::{ConfigurationError, DescriptorSource, EnvironmentDescriptor};


/// Ordered set of environment descriptors, open to runtime extension.
pub struct CandidateRegistry {
	label: &'static str,
	snap: ArcSwap<Snapshot>,
	writer: Mutex<()>,
}

impl CandidateRegistry {
	/// Creates an empty registry; `label` names it in diagnostics.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			snap: ArcSwap::from_pointee(Snapshot::default()),
			writer: Mutex::new(()),
		}
	}

	/// Creates a registry from `descriptors`, all recorded with `source`.
	///
	/// Fails on the first invalid or duplicate descriptor.
	pub fn from_descriptors<I>(
		label: &'static str,
		source: DescriptorSource,
		descriptors: I,
	) -> Result<Self, ConfigurationError>
	where
		I: IntoIterator<Item = EnvironmentDescriptor>,
	{
		let registry = Self::new(label);
		registry.extend(source, descriptors)?;
		Ok(registry)
	}

	/// Returns the registry label.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Registers a descriptor at runtime.
	pub fn register(
		&self,
		descriptor: EnvironmentDescriptor,
	) -> Result<Arc<EnvironmentDescriptor>, ConfigurationError> {
		self.register_from(descriptor, DescriptorSource::Runtime)
	}

	/// Registers a descriptor, recording where it was declared.
	pub fn register_from(
		&self,
		descriptor: EnvironmentDescriptor,
		source: DescriptorSource,
	) -> Result<Arc<EnvironmentDescriptor>, ConfigurationError> {
		descriptor.validate()?;

		let _guard = self.writer.lock();
		let current = self.snap.load_full();

		if let Some(existing) = current.get(&descriptor.id) {
			tracing::debug!(
				registry = self.label,
				id = %descriptor.id,
				existing = %existing.source,
				"rejected duplicate descriptor"
			);
			return Err(ConfigurationError::DuplicateId {
				id: descriptor.id,
				existing: existing.source,
			});
		}

		let (next, registered) = current.with(descriptor, source);
		self.snap.store(Arc::new(next));

		tracing::trace!(
			registry = self.label,
			id = %registered.id,
			priority = registered.priority,
			%source,
			"registered descriptor"
		);
		Ok(registered)
	}

	/// Registers each descriptor in turn, stopping at the first error.
	///
	/// Descriptors accepted before the failing one stay registered.
	pub fn extend<I>(&self, source: DescriptorSource, descriptors: I) -> Result<(), ConfigurationError>
	where
		I: IntoIterator<Item = EnvironmentDescriptor>,
	{
		for descriptor in descriptors {
			self.register_from(descriptor, source)?;
		}
		Ok(())
	}

	/// Returns a lazy, restartable sequence of descriptors in probe order.
	pub fn ordered(&self) -> Ordered {
		Ordered::new(self.snap.load_full())
	}

	/// Looks up a descriptor by id.
	pub fn get(&self, id: &str) -> Option<Arc<EnvironmentDescriptor>> {
		self.snap.load().get(id).map(|c| Arc::clone(&c.descriptor))
	}

	/// Returns the current snapshot.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	/// Returns the number of registered descriptors.
	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	/// Returns true if nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.snap.load().is_empty()
	}
}

impl std::fmt::Debug for CandidateRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("CandidateRegistry")
			.field("label", &self.label)
			.field(
				"ids",
				&snap
					.candidates()
					.iter()
					.map(|c| c.descriptor.id.as_str())
					.collect::<Vec<_>>(),
			)
			.finish()
	}
}
