//! Compiled-in environment table.

use txplat_registry::{
	CandidateRegistry, ConfigurationError, DescriptorSource, EnvironmentDescriptor,
};

/// Directory name of the user transaction on WebSphere 5.x.
pub const COMP_USER_TRANSACTION: &str = "java:comp/UserTransaction";

/// WebSphere 4, 5.0 and 5.1, in probe order.
pub fn websphere_descriptors() -> Vec<EnvironmentDescriptor> {
	vec![
		EnvironmentDescriptor::new(
			"websphere-4",
			10,
			"com.ibm.ejs.jts.jta.JTSXA",
			"jta/usertransaction",
		)
		.with_label("4.x"),
		EnvironmentDescriptor::new(
			"websphere-5.0",
			20,
			"com.ibm.ejs.jts.jta.TransactionManagerFactory",
			COMP_USER_TRANSACTION,
		)
		.with_label("5.0"),
		EnvironmentDescriptor::new(
			"websphere-5.1",
			30,
			"com.ibm.ws.Transaction.TransactionManagerFactory",
			COMP_USER_TRANSACTION,
		)
		.with_label("5.1"),
	]
}

/// Registry seeded with [`websphere_descriptors`].
pub fn websphere_registry() -> Result<CandidateRegistry, ConfigurationError> {
	CandidateRegistry::from_descriptors("websphere", DescriptorSource::Builtin, websphere_descriptors())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_websphere_table_order() {
		let registry = websphere_registry().unwrap();
		let labels: Vec<String> = registry.ordered().map(|d| d.label.clone()).collect();
		assert_eq!(labels, ["4.x", "5.0", "5.1"]);

		let ws4 = registry.get("websphere-4").unwrap();
		assert_eq!(ws4.lookup_name, "jta/usertransaction");
		assert_eq!(registry.snapshot().get("websphere-5.1").unwrap().source, DescriptorSource::Builtin);
	}
}
