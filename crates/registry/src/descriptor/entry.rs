use std::sync::Arc;

use crate::core::{AccessLevel, KeyIdent, KeyOrigin, ValueKind};
use crate::validate::ValidatorParser;

use super::descriptor::Descriptor;

/// Fully resolved metadata for one key.
///
/// Owns the descriptor it was enriched from and the values left after the
/// inheritance merge, plus the bound validator and the cached canonical
/// identity string. Published entries are immutable for the life of the
/// process; the registry hands out shared `Arc`s and never replaces them.
#[derive(Debug, Clone)]
pub struct EnrichedDescriptor {
	pub(crate) descriptor: Descriptor,
	/// Resolved ancestor chain, nearest first.
	pub(crate) ancestors: Vec<KeyIdent>,
	pub(crate) description: Arc<str>,
	pub(crate) long_description: Arc<str>,
	pub(crate) read_access: AccessLevel,
	pub(crate) write_access: AccessLevel,
	pub(crate) sample_values: Vec<Arc<str>>,
	pub(crate) unique: bool,
	pub(crate) read_only: bool,
	pub(crate) value_kind: ValueKind,
	pub(crate) validator: ValidatorParser,
	pub(crate) canonical: Arc<str>,
}

impl EnrichedDescriptor {
	/// The descriptor this entry was enriched from, as declared.
	pub fn descriptor(&self) -> &Descriptor {
		&self.descriptor
	}

	pub fn ident(&self) -> &KeyIdent {
		self.descriptor.ident()
	}

	pub fn origin(&self) -> KeyOrigin {
		self.descriptor.origin()
	}

	/// Canonical name of the key within its type.
	pub fn name(&self) -> &str {
		self.descriptor.ident().name()
	}

	/// Cached `Type::Name` identity string.
	pub fn canonical(&self) -> &str {
		&self.canonical
	}

	/// Resolved ancestor chain, nearest ancestor first. Empty for keys
	/// without an inherit-from reference.
	pub fn ancestors(&self) -> &[KeyIdent] {
		&self.ancestors
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn long_description(&self) -> &str {
		&self.long_description
	}

	pub fn read_access(&self) -> AccessLevel {
		self.read_access
	}

	pub fn write_access(&self) -> AccessLevel {
		self.write_access
	}

	/// Merged sample values, in declaration order.
	pub fn sample_values(&self) -> &[Arc<str>] {
		&self.sample_values
	}

	pub fn unique(&self) -> bool {
		self.unique
	}

	pub fn read_only(&self) -> bool {
		self.read_only
	}

	pub fn value_kind(&self) -> ValueKind {
		self.value_kind
	}

	pub fn validator(&self) -> &ValidatorParser {
		&self.validator
	}
}

impl core::fmt::Display for EnrichedDescriptor {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(&self.canonical)
	}
}
