use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::ident::KeyIdent;
use crate::core::keyset::KeySet;
use crate::core::value::KeyValue;
use crate::descriptor::EnrichedDescriptor;
use crate::error::RegistryFault;
use crate::registry::KeyRegistry;

/// Typed handle to one key: shared enriched metadata plus the concrete
/// enumerated value it was constructed from.
///
/// The registry is the sole owner of enriched entries; a `Key` pins one via
/// `Arc` and stays valid for the life of the process.
#[derive(Debug, Clone)]
pub struct Key {
	entry: Arc<EnrichedDescriptor>,
	value: KeyValue,
}

impl Key {
	/// Binds a concrete value to its enriched entry.
	///
	/// The value must be the entry's own key value. This re-checks the
	/// pairing at the consumption boundary, independently of the check
	/// enrichment performed when the descriptor was built.
	pub fn bind(entry: Arc<EnrichedDescriptor>, value: KeyValue) -> Result<Self, RegistryFault> {
		if entry.ident().value() != &value {
			return Err(RegistryFault::TypeMismatch {
				ident: entry.ident().canonical(),
				expected: entry.ident().value().type_name(),
				actual: value.type_name(),
			});
		}
		Ok(Self { entry, value })
	}

	pub fn entry(&self) -> &Arc<EnrichedDescriptor> {
		&self.entry
	}

	pub fn value(&self) -> &KeyValue {
		&self.value
	}

	pub fn ident(&self) -> &KeyIdent {
		self.entry.ident()
	}

	/// Canonical name of the key within its type.
	pub fn name(&self) -> &str {
		self.entry.name()
	}
}

impl core::fmt::Display for Key {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.entry.canonical())
	}
}

/// Compile-time typed handle to a declared key variant.
///
/// Carries no registry state; [`TypedKey::resolve`] triggers the
/// scan-on-demand path for the variant's key set and binds a [`Key`].
pub struct TypedKey<T: KeySet> {
	variant: T,
	_marker: PhantomData<fn() -> T>,
}

impl<T: KeySet> Clone for TypedKey<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T: KeySet> Copy for TypedKey<T> {}

impl<T: KeySet> TypedKey<T> {
	pub const fn new(variant: T) -> Self {
		Self {
			variant,
			_marker: PhantomData,
		}
	}

	pub fn variant(&self) -> T {
		self.variant
	}

	pub fn ident(&self) -> KeyIdent {
		self.variant.ident()
	}

	/// Resolves the variant against a registry, scanning the key set on
	/// first use of the type.
	pub fn resolve(&self, registry: &KeyRegistry) -> Result<Key, RegistryFault> {
		registry.register_declared::<T>()?;
		let ident = self.variant.ident();
		let entry = registry
			.get(&ident)
			.expect("declared variant present after scan");
		Key::bind(entry, ident.value().clone())
	}
}

impl<T: KeySet> core::fmt::Debug for TypedKey<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "TypedKey({}::{})", T::TYPE_NAME, self.variant.key_name())
	}
}
