//! Declared key sets.
//!
//! A key set is a compile-time enum whose variants are the declared keys of
//! one key type. The registry never inspects language metadata; each set
//! supplies its own variant enumeration (via `strum`) and per-variant
//! declaration, and platform crates contribute their sets through the
//! `inventory` collection so no central list has to know about them.

use strum::IntoEnumIterator;

use crate::core::ident::KeyIdent;
use crate::descriptor::DescriptorDef;
use crate::error::RegistryFault;
use crate::registry::KeyRegistry;

/// A compile-time declared set of enumerated keys.
pub trait KeySet: Copy + Sized + IntoEnumIterator + 'static {
	/// Key-type name the set registers under.
	const TYPE_NAME: &'static str;

	/// Canonical name of one key variant.
	fn key_name(self) -> &'static str;

	/// Dense ordinal of the variant within the set.
	fn ordinal(self) -> u32;

	/// Static declaration for the variant. Sets without per-key metadata
	/// return [`DescriptorDef::empty`]; enrichment fills type-appropriate
	/// defaults.
	fn declaration(self) -> DescriptorDef {
		DescriptorDef::empty()
	}

	/// Registry identity of the variant.
	fn ident(self) -> KeyIdent {
		KeyIdent::declared(Self::TYPE_NAME, self.ordinal(), self.key_name())
	}
}

/// Erased installer for one declared key set.
///
/// Declared in a `static` next to the set and submitted through
/// [`KeySetReg`]; the registry drains the collection in
/// [`KeyRegistry::register_builtin_sets`](crate::registry::KeyRegistry::register_builtin_sets).
pub struct KeySetDef {
	pub type_name: &'static str,
	pub install: fn(&KeyRegistry) -> Result<(), RegistryFault>,
}

impl core::fmt::Debug for KeySetDef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("KeySetDef")
			.field("type_name", &self.type_name)
			.finish()
	}
}

/// Inventory wrapper for distributed key-set submission.
pub struct KeySetReg(pub &'static KeySetDef);

inventory::collect!(KeySetReg);
