use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The kind of values a key's validator handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
	/// Boolean values in their common string spellings.
	Bool,
	/// Signed integer values.
	Int,
	/// Free text; the default validator rejects empty input.
	Text,
	/// Opaque payloads the core places no constraint on.
	Opaque,
}

impl ValueKind {
	/// Returns the kind name used in diagnostics.
	pub fn name(self) -> &'static str {
		match self {
			ValueKind::Bool => "bool",
			ValueKind::Int => "int",
			ValueKind::Text => "text",
			ValueKind::Opaque => "opaque",
		}
	}
}

impl core::fmt::Display for ValueKind {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.name())
	}
}

/// Ordered platform access levels; higher grants more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessLevel {
	Anonymous,
	User,
	Manager,
	Admin,
	System,
}

impl AccessLevel {
	/// Returns true if a caller at `self` satisfies a `required` level.
	pub fn grants(self, required: AccessLevel) -> bool {
		self >= required
	}

	pub fn name(self) -> &'static str {
		match self {
			AccessLevel::Anonymous => "anonymous",
			AccessLevel::User => "user",
			AccessLevel::Manager => "manager",
			AccessLevel::Admin => "admin",
			AccessLevel::System => "system",
		}
	}
}

impl core::fmt::Display for AccessLevel {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.name())
	}
}

/// Raw value payload of an enumerated key.
///
/// Declared keys carry a variant of a compile-time key enum; dynamic keys
/// carry the string they were registered under. The payload variant must
/// agree with the descriptor's origin; the mismatch check happens at
/// descriptor construction and again when a [`Key`](crate::core::Key) is
/// bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
	/// Variant of a declared key enum: dense ordinal plus canonical
	/// variant name.
	Declared { ordinal: u32, name: Arc<str> },
	/// Runtime-registered string key.
	Dynamic { name: Arc<str> },
}

impl KeyValue {
	pub fn declared(ordinal: u32, name: impl Into<Arc<str>>) -> Self {
		KeyValue::Declared {
			ordinal,
			name: name.into(),
		}
	}

	pub fn dynamic(name: impl Into<Arc<str>>) -> Self {
		KeyValue::Dynamic { name: name.into() }
	}

	/// Canonical name of the key value.
	pub fn name(&self) -> &str {
		match self {
			KeyValue::Declared { name, .. } => name,
			KeyValue::Dynamic { name } => name,
		}
	}

	/// Runtime type name of the payload, used in mismatch diagnostics.
	pub fn type_name(&self) -> &'static str {
		match self {
			KeyValue::Declared { .. } => "declared enum variant",
			KeyValue::Dynamic { .. } => "dynamic string key",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn access_levels_are_ordered() {
		assert!(AccessLevel::System.grants(AccessLevel::Anonymous));
		assert!(AccessLevel::Manager.grants(AccessLevel::Manager));
		assert!(!AccessLevel::User.grants(AccessLevel::Admin));
	}

	#[test]
	fn key_value_names() {
		let declared = KeyValue::declared(3, "Status");
		let dynamic = KeyValue::dynamic("status");
		assert_eq!(declared.name(), "Status");
		assert_eq!(dynamic.name(), "status");
		assert_ne!(declared.type_name(), dynamic.type_name());
	}
}
