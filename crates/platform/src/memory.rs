//! In-memory host collaborators.
//!
//! Useful for embedding the platform where the host exposes its transaction
//! primitives programmatically rather than through a naming service.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Capability, DirectoryService, LookupError, StaticAccessor};

enum Binding<T> {
	Bound(T),
	Denied(String),
}

/// Name-to-capability table implementing [`DirectoryService`].
#[derive(Default)]
pub struct MemoryDirectory {
	entries: RwLock<FxHashMap<String, Binding<Capability>>>,
}

impl MemoryDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `capability` under `name`, replacing any previous binding.
	pub fn bind(&self, name: impl Into<String>, capability: impl Into<Capability>) {
		self.entries
			.write()
			.insert(name.into(), Binding::Bound(capability.into()));
	}

	/// Makes lookups of `name` fail with [`LookupError::Denied`].
	pub fn deny(&self, name: impl Into<String>, reason: impl Into<String>) {
		self.entries
			.write()
			.insert(name.into(), Binding::Denied(reason.into()));
	}

	/// Removes the binding for `name`, returning whether one existed.
	pub fn unbind(&self, name: &str) -> bool {
		self.entries.write().remove(name).is_some()
	}
}

impl DirectoryService for MemoryDirectory {
	fn locate(&self, name: &str) -> Result<Capability, LookupError> {
		match self.entries.read().get(name) {
			Some(Binding::Bound(capability)) => Ok(capability.clone()),
			Some(Binding::Denied(reason)) => Err(LookupError::Denied {
				name: name.to_owned(),
				reason: reason.clone(),
			}),
			None => Err(LookupError::not_found(name)),
		}
	}
}

type AccessorFn = Arc<dyn Fn() -> Result<Capability, LookupError> + Send + Sync>;

/// Table of types and their static accessors implementing [`StaticAccessor`].
#[derive(Default)]
pub struct AccessorTable {
	types: RwLock<AccessorSlots>,
}

impl AccessorTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `type_id` as resolvable, lifting any denial. Existing accessors are kept.
	pub fn declare(&self, type_id: impl Into<String>) {
		bound_slot(&mut self.types.write(), type_id.into());
	}

	/// Registers `accessor` as `type_id::method`, declaring the type if needed.
	pub fn register<F>(&self, type_id: impl Into<String>, method: impl Into<String>, accessor: F)
	where
		F: Fn() -> Result<Capability, LookupError> + Send + Sync + 'static,
	{
		let mut types = self.types.write();
		if let Binding::Bound(methods) = bound_slot(&mut types, type_id.into()) {
			methods.insert(method.into(), Arc::new(accessor));
		}
	}

	/// Registers an accessor that always returns a clone of `capability`.
	pub fn register_value(
		&self,
		type_id: impl Into<String>,
		method: impl Into<String>,
		capability: impl Into<Capability>,
	) {
		let capability = capability.into();
		self.register(type_id, method, move || Ok(capability.clone()));
	}

	/// Makes resolution of `type_id` fail with [`LookupError::Denied`].
	pub fn deny(&self, type_id: impl Into<String>, reason: impl Into<String>) {
		self.types
			.write()
			.insert(type_id.into(), Binding::Denied(reason.into()));
	}
}

type AccessorSlots = FxHashMap<String, Binding<FxHashMap<String, AccessorFn>>>;

/// Returns the slot of `type_id` as bound, replacing a denial with an empty accessor map.
fn bound_slot(
	types: &mut AccessorSlots,
	type_id: String,
) -> &mut Binding<FxHashMap<String, AccessorFn>> {
	let slot = types
		.entry(type_id)
		.or_insert_with(|| Binding::Bound(FxHashMap::default()));
	if let Binding::Denied(_) = slot {
		*slot = Binding::Bound(FxHashMap::default());
	}
	slot
}

impl StaticAccessor for AccessorTable {
	fn resolve(&self, type_id: &str) -> Result<(), LookupError> {
		match self.types.read().get(type_id) {
			Some(Binding::Bound(_)) => Ok(()),
			Some(Binding::Denied(reason)) => Err(LookupError::Denied {
				name: type_id.to_owned(),
				reason: reason.clone(),
			}),
			None => Err(LookupError::not_found(type_id)),
		}
	}

	fn invoke_static_accessor(&self, type_id: &str, method: &str) -> Result<Capability, LookupError> {
		let accessor = match self.types.read().get(type_id) {
			Some(Binding::Bound(methods)) => methods
				.get(method)
				.cloned()
				.ok_or_else(|| LookupError::not_found(format!("{type_id}::{method}")))?,
			Some(Binding::Denied(reason)) => {
				return Err(LookupError::Denied {
					name: type_id.to_owned(),
					reason: reason.clone(),
				});
			}
			None => return Err(LookupError::not_found(type_id)),
		};
		// Lock released before calling into host code.
		accessor()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::HandleKind;
	use crate::test_fixtures::{fake_tm, fake_ut};

	#[test]
	fn test_directory_bind_locate_unbind() {
		let dir = MemoryDirectory::new();
		dir.bind("java:comp/UserTransaction", fake_ut());

		let found = dir.locate("java:comp/UserTransaction").unwrap();
		assert_eq!(found.kind(), HandleKind::UserTransaction);

		assert!(dir.unbind("java:comp/UserTransaction"));
		assert_eq!(
			dir.locate("java:comp/UserTransaction").unwrap_err(),
			LookupError::not_found("java:comp/UserTransaction")
		);
	}

	#[test]
	fn test_directory_denied() {
		let dir = MemoryDirectory::new();
		dir.deny("secret", "policy");
		assert!(matches!(
			dir.locate("secret"),
			Err(LookupError::Denied { ref reason, .. }) if reason == "policy"
		));
	}

	#[test]
	fn test_accessor_table_resolution() {
		let table = AccessorTable::new();
		table.declare("com.example.Bare");
		table.register_value("com.example.Factory", "getTransactionManager", fake_tm());

		assert!(table.resolve("com.example.Bare").is_ok());
		assert!(table.resolve("com.example.Factory").is_ok());
		assert_eq!(
			table.resolve("com.example.Missing"),
			Err(LookupError::not_found("com.example.Missing"))
		);

		let cap = table
			.invoke_static_accessor("com.example.Factory", "getTransactionManager")
			.unwrap();
		assert_eq!(cap.kind(), HandleKind::TransactionManager);

		assert_eq!(
			table
				.invoke_static_accessor("com.example.Bare", "getTransactionManager")
				.unwrap_err(),
			LookupError::not_found("com.example.Bare::getTransactionManager")
		);
	}

	#[test]
	fn test_declare_and_register_lift_denial() {
		let table = AccessorTable::new();
		table.deny("com.example.Locked", "policy");
		table.declare("com.example.Locked");
		assert!(table.resolve("com.example.Locked").is_ok());

		table.deny("com.example.Locked", "policy");
		table.register_value("com.example.Locked", "getTransactionManager", fake_tm());
		assert!(table.resolve("com.example.Locked").is_ok());

		// Declaring again keeps registered accessors.
		table.declare("com.example.Locked");
		assert!(
			table
				.invoke_static_accessor("com.example.Locked", "getTransactionManager")
				.is_ok()
		);
	}

	#[test]
	fn test_accessor_failure_propagates() {
		let table = AccessorTable::new();
		table.register("com.example.Broken", "getTransactionManager", || {
			Err(LookupError::Invocation {
				target: "com.example.Broken::getTransactionManager".into(),
				reason: "boom".into(),
			})
		});
		assert!(matches!(
			table.invoke_static_accessor("com.example.Broken", "getTransactionManager"),
			Err(LookupError::Invocation { .. })
		));
	}
}
