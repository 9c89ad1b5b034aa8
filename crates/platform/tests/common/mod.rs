#![allow(dead_code)]
#![allow(unused_imports, reason = "links dependencies used by other targets")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// Dependencies of the library and sibling test targets.
use parking_lot as _;
use proptest as _;
use rustc_hash as _;
use serde as _;
use tempfile as _;
use thiserror as _;
use toml as _;
use tracing as _;
use txplat_registry as _;
use txplat_platform::{
	AccessorTable, Capability, DirectoryService, EnvironmentDescriptor, LookupError,
	MemoryDirectory, StaticAccessor, TransactionError, TransactionManager,
	TransactionManagerHandle, TransactionStatus, UserTransaction, UserTransactionHandle,
};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Debug)]
pub struct Tm;

impl TransactionManager for Tm {
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
		Ok(TransactionStatus::Active)
	}
}

#[derive(Debug)]
pub struct Ut;

impl UserTransaction for Ut {
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
		Ok(())
	}
	fn status(&self) -> Result<TransactionStatus, TransactionError> {
		Ok(TransactionStatus::Active)
	}
}

pub fn descriptor(id: &str, priority: i32) -> EnvironmentDescriptor {
	EnvironmentDescriptor::new(
		id,
		priority,
		format!("com.example.{id}.Factory"),
		format!("java:comp/{id}/UT"),
	)
}

/// Host that counts every collaborator call and can slow accessors down to
/// widen race windows.
#[derive(Default)]
pub struct Host {
	pub table: AccessorTable,
	pub directory: MemoryDirectory,
	pub resolves: AtomicUsize,
	pub invocations: AtomicUsize,
	pub lookups: AtomicUsize,
	pub delay: Option<Duration>,
}

impl Host {
	pub fn with_delay(delay: Duration) -> Self {
		Self {
			delay: Some(delay),
			..Self::default()
		}
	}

	/// Makes `def` present with fresh handles produced on every call.
	pub fn install(&self, def: &EnvironmentDescriptor) {
		self.table.register(def.probe_key.clone(), "getTransactionManager", || {
			Ok(Capability::from(TransactionManagerHandle::new(Tm)))
		});
		self.directory.bind(def.lookup_name.clone(), UserTransactionHandle::new(Ut));
	}

	pub fn resolves(&self) -> usize {
		self.resolves.load(Ordering::SeqCst)
	}

	pub fn invocations(&self) -> usize {
		self.invocations.load(Ordering::SeqCst)
	}

	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}

	fn pause(&self) {
		if let Some(delay) = self.delay {
			std::thread::sleep(delay);
		}
	}
}

impl StaticAccessor for Host {
	fn resolve(&self, type_id: &str) -> Result<(), LookupError> {
		self.resolves.fetch_add(1, Ordering::SeqCst);
		self.table.resolve(type_id)
	}

	fn invoke_static_accessor(&self, type_id: &str, method: &str) -> Result<Capability, LookupError> {
		self.invocations.fetch_add(1, Ordering::SeqCst);
		self.pause();
		self.table.invoke_static_accessor(type_id, method)
	}
}

impl DirectoryService for Host {
	fn locate(&self, name: &str) -> Result<Capability, LookupError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		self.pause();
		self.directory.locate(name)
	}
}

pub fn shared(host: Host) -> Arc<Host> {
	Arc::new(host)
}
