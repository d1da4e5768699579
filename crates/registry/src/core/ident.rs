use std::sync::Arc;

use super::value::KeyValue;

/// Where a key's descriptor was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyOrigin {
	/// Compile-time declaration on an enumerated key type.
	Declared,
	/// Registered at runtime, typically from persisted configuration.
	Dynamic,
}

impl KeyOrigin {
	/// Expected payload type name for this origin, used in diagnostics.
	pub fn expected_payload(self) -> &'static str {
		match self {
			KeyOrigin::Declared => "declared enum variant",
			KeyOrigin::Dynamic => "dynamic string key",
		}
	}
}

impl core::fmt::Display for KeyOrigin {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			KeyOrigin::Declared => f.write_str("declared"),
			KeyOrigin::Dynamic => f.write_str("dynamic"),
		}
	}
}

/// Process-wide identity of an enumerated key: the key-type name plus the
/// raw key value. Cheap to clone; usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyIdent {
	key_type: Arc<str>,
	value: KeyValue,
}

impl KeyIdent {
	/// Identity of a declared key variant.
	pub fn declared(key_type: impl Into<Arc<str>>, ordinal: u32, name: impl Into<Arc<str>>) -> Self {
		Self {
			key_type: key_type.into(),
			value: KeyValue::declared(ordinal, name),
		}
	}

	/// Identity of a dynamic string key.
	pub fn dynamic(key_type: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
		Self {
			key_type: key_type.into(),
			value: KeyValue::dynamic(name),
		}
	}

	pub fn from_value(key_type: impl Into<Arc<str>>, value: KeyValue) -> Self {
		Self {
			key_type: key_type.into(),
			value,
		}
	}

	pub fn key_type(&self) -> &str {
		&self.key_type
	}

	pub fn value(&self) -> &KeyValue {
		&self.value
	}

	/// Canonical name of the key within its type.
	pub fn name(&self) -> &str {
		self.value.name()
	}

	/// Canonical `Type::Name` rendering of the identity.
	pub fn canonical(&self) -> String {
		format!("{}::{}", self.key_type, self.value.name())
	}
}

impl core::fmt::Display for KeyIdent {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}::{}", self.key_type, self.value.name())
	}
}
