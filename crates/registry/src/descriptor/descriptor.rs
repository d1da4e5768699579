use std::sync::Arc;

use crate::core::{AccessLevel, KeyIdent, KeyOrigin, KeyValue, ValueKind};
use crate::error::RegistryFault;
use crate::validate::ValidatorFn;

use super::def::{DescriptorDef, DescriptorFields, InheritRef};

/// Normalized declared-metadata bag for one key, before enrichment.
///
/// Both origins funnel into this one shape; only how the raw input was
/// obtained differs. Construction enforces that the identity's payload
/// agrees with the origin; a declared descriptor cannot carry a dynamic
/// string payload and vice versa.
#[derive(Debug, Clone)]
pub struct Descriptor {
	ident: KeyIdent,
	origin: KeyOrigin,
	pub(crate) description: Option<Arc<str>>,
	pub(crate) long_description: Option<Arc<str>>,
	pub(crate) read_access: Option<AccessLevel>,
	pub(crate) write_access: Option<AccessLevel>,
	pub(crate) sample_values: Vec<Arc<str>>,
	pub(crate) unique: Option<bool>,
	pub(crate) read_only: Option<bool>,
	pub(crate) value_kind: Option<ValueKind>,
	pub(crate) inherit_from: Option<InheritRef>,
	pub(crate) validator: Option<ValidatorFn>,
}

impl Descriptor {
	/// Checks the origin/payload invariant and builds the bag.
	fn checked(ident: KeyIdent, origin: KeyOrigin) -> Result<Self, RegistryFault> {
		let payload_matches = matches!(
			(origin, ident.value()),
			(KeyOrigin::Declared, KeyValue::Declared { .. })
				| (KeyOrigin::Dynamic, KeyValue::Dynamic { .. })
		);
		if !payload_matches {
			return Err(RegistryFault::TypeMismatch {
				ident: ident.canonical(),
				expected: origin.expected_payload(),
				actual: ident.value().type_name(),
			});
		}
		Ok(Self {
			ident,
			origin,
			description: None,
			long_description: None,
			read_access: None,
			write_access: None,
			sample_values: Vec::new(),
			unique: None,
			read_only: None,
			value_kind: None,
			inherit_from: None,
			validator: None,
		})
	}

	/// Descriptor for a declared key from its static declaration.
	pub fn from_def(ident: KeyIdent, def: &DescriptorDef) -> Result<Self, RegistryFault> {
		let mut descriptor = Self::checked(ident, KeyOrigin::Declared)?;
		descriptor.description = def.description.map(Arc::from);
		descriptor.long_description = def.long_description.map(Arc::from);
		descriptor.read_access = def.read_access;
		descriptor.write_access = def.write_access;
		descriptor.sample_values = def.sample_values.iter().map(|v| Arc::from(*v)).collect();
		descriptor.unique = def.unique;
		descriptor.read_only = def.read_only;
		descriptor.value_kind = def.value_kind;
		descriptor.inherit_from = def
			.inherit_from
			.map(|(key_type, name)| InheritRef::new(key_type, name));
		descriptor.validator = def.validator;
		Ok(descriptor)
	}

	/// Descriptor for a dynamic key from runtime-supplied fields.
	pub fn from_fields(ident: KeyIdent, fields: DescriptorFields) -> Result<Self, RegistryFault> {
		let mut descriptor = Self::checked(ident, KeyOrigin::Dynamic)?;
		descriptor.description = fields.description.map(Arc::from);
		descriptor.long_description = fields.long_description.map(Arc::from);
		descriptor.read_access = fields.read_access;
		descriptor.write_access = fields.write_access;
		descriptor.sample_values = fields.sample_values.into_iter().map(Arc::from).collect();
		descriptor.unique = fields.unique;
		descriptor.read_only = fields.read_only;
		descriptor.value_kind = fields.value_kind;
		descriptor.inherit_from = fields.inherit_from;
		Ok(descriptor)
	}

	pub fn ident(&self) -> &KeyIdent {
		&self.ident
	}

	pub fn origin(&self) -> KeyOrigin {
		self.origin
	}

	pub fn inherit_from(&self) -> Option<&InheritRef> {
		self.inherit_from.as_ref()
	}
}
