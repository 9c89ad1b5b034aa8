use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest as _;
use txplat_registry::EnvironmentDescriptor;

use crate::{
	AccessorTable, Capability, LookupError, MemoryDirectory, StaticAccessor, TransactionError,
	TransactionManager, TransactionManagerHandle, TransactionStatus, UserTransaction,
	UserTransactionHandle,
};

#[derive(Debug, Default)]
pub(crate) struct FakeTm;

impl TransactionManager for FakeTm {
	fn begin(&self) -> Result<(), TransactionError> {
		Ok(())
	}
	fn commit(&self) -> Result<(), TransactionError> {
		Ok(())
	}
	fn rollback(&self) -> Result<(), TransactionError> {
		Ok(())
	}
	fn status(&self) -> Result<TransactionStatus, TransactionError> {
		Ok(TransactionStatus::NoTransaction)
	}
}

#[derive(Debug, Default)]
pub(crate) struct FakeUt;

impl UserTransaction for FakeUt {
	fn begin(&self) -> Result<(), TransactionError> {
		Ok(())
	}
	fn commit(&self) -> Result<(), TransactionError> {
		Ok(())
	}
	fn rollback(&self) -> Result<(), TransactionError> {
		Ok(())
	}
	fn set_rollback_only(&self) -> Result<(), TransactionError> {
		Err(TransactionError::IllegalState("no transaction".into()))
	}
	fn status(&self) -> Result<TransactionStatus, TransactionError> {
		Ok(TransactionStatus::NoTransaction)
	}
}

pub(crate) fn fake_tm() -> TransactionManagerHandle {
	TransactionManagerHandle::new(FakeTm)
}

pub(crate) fn fake_ut() -> UserTransactionHandle {
	UserTransactionHandle::new(FakeUt)
}

pub(crate) fn make_def(id: &str, priority: i32) -> EnvironmentDescriptor {
	EnvironmentDescriptor::new(id, priority, format!("probe.{id}"), format!("ut/{id}"))
}

/// Accessor host that counts calls before delegating to an [`AccessorTable`].
#[derive(Default)]
pub(crate) struct CountingAccessor {
	pub table: AccessorTable,
	pub resolves: AtomicUsize,
	pub invocations: AtomicUsize,
}

impl CountingAccessor {
	/// Makes `def` present: its probe type resolves and yields a fresh manager.
	pub fn install(&self, def: &EnvironmentDescriptor) {
		self.table.register(def.probe_key.clone(), "getTransactionManager", || {
			Ok(Capability::from(fake_tm()))
		});
	}

	pub fn resolves(&self) -> usize {
		self.resolves.load(Ordering::SeqCst)
	}

	pub fn invocations(&self) -> usize {
		self.invocations.load(Ordering::SeqCst)
	}
}

impl StaticAccessor for CountingAccessor {
	fn resolve(&self, type_id: &str) -> Result<(), LookupError> {
		self.resolves.fetch_add(1, Ordering::SeqCst);
		self.table.resolve(type_id)
	}

	fn invoke_static_accessor(&self, type_id: &str, method: &str) -> Result<Capability, LookupError> {
		self.invocations.fetch_add(1, Ordering::SeqCst);
		self.table.invoke_static_accessor(type_id, method)
	}
}

/// Directory with a user transaction bound under each descriptor's lookup name.
pub(crate) fn directory_for(defs: &[&EnvironmentDescriptor]) -> Arc<MemoryDirectory> {
	let dir = MemoryDirectory::new();
	for def in defs {
		dir.bind(def.lookup_name.clone(), fake_ut());
	}
	Arc::new(dir)
}
