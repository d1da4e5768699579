use crate::builtins::EntityField;
use crate::core::{KeySet, KeySetReg};
use crate::descriptor::DescriptorFields;
use crate::registry::KeyRegistry;
use crate::validate::ValidatorKind;

/// Every inventory-submitted key set installs, and installation is
/// idempotent across repeated drains.
#[test]
fn builtin_sets_install_and_reinstall() {
	let registry = KeyRegistry::new();

	let installed = registry.register_builtin_sets().unwrap();
	assert!(installed >= 1, "the EntityField set must be collected");
	for reg in inventory::iter::<KeySetReg>.into_iter() {
		assert!(
			registry.is_scanned(reg.0.type_name),
			"{} was collected but not scanned",
			reg.0.type_name
		);
	}

	let before = registry.len();
	registry.register_builtin_sets().unwrap();
	assert_eq!(registry.len(), before);
}

/// Every declared EntityField variant is reachable by identity and by
/// case-insensitive name after installation.
#[test]
fn entity_fields_are_reachable_both_ways() {
	let registry = KeyRegistry::new();
	registry.register_builtin_sets().unwrap();

	for variant in <EntityField as strum::IntoEnumIterator>::iter() {
		let by_ident = registry.lookup(&variant.ident()).unwrap();
		let by_name = registry
			.lookup_by_name(EntityField::TYPE_NAME, &variant.key_name().to_lowercase())
			.unwrap();
		assert!(std::sync::Arc::ptr_eq(&by_ident, &by_name));
		assert!(!by_ident.description().is_empty());
	}
}

/// End to end: a dynamic key registered from persisted fields is looked
/// up, documented, and its validator enforces the declared sample values.
#[test]
fn dynamic_status_scenario() {
	let registry = KeyRegistry::new();
	registry.register_builtin_sets().unwrap();

	let payload = r#"{
		"description": "entity status",
		"sample_values": ["Active", "Closed"]
	}"#;
	let fields: DescriptorFields = serde_json::from_str(payload).unwrap();
	registry.register_dynamic("Order", "Status", fields).unwrap();

	let entry = registry.lookup_by_name("Order", "Status").unwrap();
	assert_eq!(entry.description(), "entity status");
	assert!(matches!(entry.validator().kind(), ValidatorKind::OneOf(_)));
	assert!(entry.validator().validate("Closed").is_ok());

	let err = entry.validator().validate("Bogus").into_result().unwrap_err();
	assert!(err.message.contains("Status"));
}
