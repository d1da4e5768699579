use serde::{Deserialize, Serialize};

use crate::core::{AccessLevel, ValueKind};
use crate::validate::ValidatorFn;

/// Reference to another key, by type and name, for inheritance.
///
/// Resolution is case-insensitive and happens during enrichment, against
/// the registry and the registration batch the referencing key arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritRef {
	pub key_type: String,
	pub name: String,
}

impl InheritRef {
	pub fn new(key_type: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			key_type: key_type.into(),
			name: name.into(),
		}
	}
}

impl core::fmt::Display for InheritRef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}::{}", self.key_type, self.name)
	}
}

/// Static declaration for one declared key (compile-time input).
///
/// All fields are optional; unset fields fall through to inherited values
/// during enrichment, then to type-appropriate defaults.
#[derive(Clone, Copy)]
pub struct DescriptorDef {
	pub description: Option<&'static str>,
	pub long_description: Option<&'static str>,
	pub read_access: Option<AccessLevel>,
	pub write_access: Option<AccessLevel>,
	pub sample_values: &'static [&'static str],
	pub unique: Option<bool>,
	pub read_only: Option<bool>,
	pub value_kind: Option<ValueKind>,
	/// `(key type, key name)` of the ancestor to inherit from.
	pub inherit_from: Option<(&'static str, &'static str)>,
	pub validator: Option<ValidatorFn>,
}

impl DescriptorDef {
	/// Declaration with nothing set; enrichment supplies defaults.
	pub const fn empty() -> Self {
		Self {
			description: None,
			long_description: None,
			read_access: None,
			write_access: None,
			sample_values: &[],
			unique: None,
			read_only: None,
			value_kind: None,
			inherit_from: None,
			validator: None,
		}
	}
}

impl Default for DescriptorDef {
	fn default() -> Self {
		Self::empty()
	}
}

impl core::fmt::Debug for DescriptorDef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("DescriptorDef")
			.field("description", &self.description)
			.field("value_kind", &self.value_kind)
			.field("inherit_from", &self.inherit_from)
			.finish()
	}
}

/// Declared metadata for one dynamic key (runtime input).
///
/// Arrives as plain data; whatever backing store supplied it has already
/// been read by the time registration happens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorFields {
	pub description: Option<String>,
	pub long_description: Option<String>,
	pub read_access: Option<AccessLevel>,
	pub write_access: Option<AccessLevel>,
	pub sample_values: Vec<String>,
	pub unique: Option<bool>,
	pub read_only: Option<bool>,
	pub value_kind: Option<ValueKind>,
	pub inherit_from: Option<InheritRef>,
}

impl DescriptorFields {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_sample_values<I, S>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.sample_values = values.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_value_kind(mut self, kind: ValueKind) -> Self {
		self.value_kind = Some(kind);
		self
	}

	pub fn with_inherit_from(mut self, key_type: impl Into<String>, name: impl Into<String>) -> Self {
		self.inherit_from = Some(InheritRef::new(key_type, name));
		self
	}

	pub fn with_access(mut self, read: AccessLevel, write: AccessLevel) -> Self {
		self.read_access = Some(read);
		self.write_access = Some(write);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fields_deserialize_from_persisted_form() {
		let payload = serde_json::json!({
			"description": "entity status",
			"sample_values": ["Active", "Closed"],
			"value_kind": "Text",
			"read_access": "User",
		});

		let fields: DescriptorFields = serde_json::from_value(payload).unwrap();
		assert_eq!(fields.description.as_deref(), Some("entity status"));
		assert_eq!(fields.sample_values, vec!["Active", "Closed"]);
		assert_eq!(fields.value_kind, Some(ValueKind::Text));
		assert_eq!(fields.read_access, Some(AccessLevel::User));
		assert_eq!(fields.inherit_from, None);
	}
}
