//! Immutable registry snapshots and ordered iteration.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{DescriptorSource, EnvironmentDescriptor};

/// A registered descriptor together with its registration metadata.
#[derive(Debug, Clone)]
pub struct Candidate {
	/// The shared, immutable descriptor.
	pub descriptor: Arc<EnvironmentDescriptor>,
	/// Where the descriptor came from.
	pub source: DescriptorSource,
	/// Declaration index; breaks priority ties.
	pub ordinal: u32,
}

impl Candidate {
	#[inline]
	fn sort_key(&self) -> (i32, u32) {
		(self.descriptor.priority, self.ordinal)
	}
}

/// Point-in-time view of a [`CandidateRegistry`](super::CandidateRegistry).
///
/// Entries are kept sorted by `(priority, ordinal)`.
#[derive(Debug, Default)]
pub struct Snapshot {
	pub(super) entries: Vec<Candidate>,
	pub(super) by_id: FxHashMap<String, usize>,
	pub(super) next_ordinal: u32,
}

impl Snapshot {
	/// Returns a copy of this snapshot with `descriptor` inserted at its ordered position.
	pub(super) fn with(
		&self,
		descriptor: EnvironmentDescriptor,
		source: DescriptorSource,
	) -> (Self, Arc<EnvironmentDescriptor>) {
		let descriptor = Arc::new(descriptor);
		let candidate = Candidate {
			descriptor: Arc::clone(&descriptor),
			source,
			ordinal: self.next_ordinal,
		};
		let key = candidate.sort_key();

		let mut entries = self.entries.clone();
		let at = entries.partition_point(|c| c.sort_key() <= key);
		entries.insert(at, candidate);

		let by_id = entries
			.iter()
			.enumerate()
			.map(|(i, c)| (c.descriptor.id.clone(), i))
			.collect();

		let next = Self {
			entries,
			by_id,
			next_ordinal: self.next_ordinal + 1,
		};
		(next, descriptor)
	}

	/// Looks up a candidate by descriptor id.
	#[inline]
	pub fn get(&self, id: &str) -> Option<&Candidate> {
		self.by_id.get(id).map(|&i| &self.entries[i])
	}

	/// Returns the candidates in probe order.
	#[inline]
	pub fn candidates(&self) -> &[Candidate] {
		&self.entries
	}

	/// Returns the number of candidates.
	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the snapshot holds no candidates.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Lazy iterator over descriptors in probe order.
///
/// Pins the snapshot it was created from, so registrations that happen while
/// iterating are not observed. Cloning or calling [`rewind`](Self::rewind)
/// restarts the sequence.
#[derive(Debug, Clone)]
pub struct Ordered {
	snap: Arc<Snapshot>,
	pos: usize,
}

impl Ordered {
	pub(super) fn new(snap: Arc<Snapshot>) -> Self {
		Self { snap, pos: 0 }
	}

	/// Restarts iteration from the highest-precedence descriptor.
	pub fn rewind(&mut self) {
		self.pos = 0;
	}
}

impl Iterator for Ordered {
	type Item = Arc<EnvironmentDescriptor>;

	fn next(&mut self) -> Option<Self::Item> {
		let candidate = self.snap.entries.get(self.pos)?;
		self.pos += 1;
		Some(Arc::clone(&candidate.descriptor))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let rest = self.snap.entries.len() - self.pos;
		(rest, Some(rest))
	}
}

impl ExactSizeIterator for Ordered {}
