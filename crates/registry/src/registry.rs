//! Process-wide catalog of enumerated keys.
//!
//! # Mental model
//!
//! The registry publishes an immutable snapshot behind an atomic swap.
//! Readers load the current snapshot and perform O(1) lookups; writers
//! clone it, enrich the incoming batch against it, and publish with a
//! compare-and-swap retry loop. A losing writer reloads and, if the winner
//! already covered its keys, adopts the winner's entries instead of
//! recomputing, so every key identity converges on exactly one shared
//! [`EnrichedDescriptor`] for the life of the process.
//!
//! # Population
//!
//! Declared key sets are scanned on first use of their type, not in a
//! global startup pass; unrelated types never pay the scan cost. Dynamic
//! keys are registered explicitly, before their first lookup. Keys are
//! never removed; the registry only grows.
//!
//! # Name precedence
//!
//! Name lookup is ASCII case-insensitive. When one name resolves to
//! several keys, a declared key beats dynamic keys; a collision among
//! multiple declared keys, or among multiple dynamic keys with no declared
//! key present, is an [`RegistryFault::AmbiguousKey`] fault. The winner is
//! chosen by this documented rule, never by map iteration order.

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::{FxHashMap, FxHashSet};
use strum::IntoEnumIterator;

use crate::core::{KeyIdent, KeyOrigin, KeySet, KeySetReg, KeyValue};
use crate::descriptor::enrich::{AncestorSource, Enricher};
use crate::descriptor::{Descriptor, DescriptorFields, EnrichedDescriptor};
use crate::error::{ErrorResponse, LookupError, RegistryFault};

/// Lowercased `(key type, key name)` index key.
type NameKey = (Box<str>, Box<str>);

fn name_key(key_type: &str, name: &str) -> NameKey {
	(
		Box::from(key_type.to_ascii_lowercase()),
		Box::from(name.to_ascii_lowercase()),
	)
}

#[derive(Clone, Default)]
pub(crate) struct RegistrySnapshot {
	pub(crate) by_ident: FxHashMap<KeyIdent, Arc<EnrichedDescriptor>>,
	pub(crate) by_name: FxHashMap<NameKey, Vec<KeyIdent>>,
	/// Declared key-type names already scanned.
	pub(crate) scanned: FxHashSet<Box<str>>,
}

impl RegistrySnapshot {
	fn insert(&mut self, entry: Arc<EnrichedDescriptor>) {
		let ident = entry.ident().clone();
		let bucket = self
			.by_name
			.entry(name_key(ident.key_type(), ident.name()))
			.or_default();
		if !bucket.is_empty() {
			tracing::warn!(
				key = %ident,
				"key name collides with an existing registration; name lookups resolve by declared-wins precedence"
			);
		}
		bucket.push(ident.clone());
		self.by_ident.insert(ident, entry);
	}

	/// Applies the documented precedence rule to a name bucket.
	fn select(
		&self,
		key_type: &str,
		name: &str,
		candidates: &[KeyIdent],
	) -> Result<Option<Arc<EnrichedDescriptor>>, RegistryFault> {
		match candidates {
			[] => Ok(None),
			[only] => Ok(self.by_ident.get(only).cloned()),
			many => {
				let declared: Vec<&KeyIdent> = many
					.iter()
					.filter(|ident| {
						self.by_ident
							.get(ident)
							.is_some_and(|entry| entry.origin() == KeyOrigin::Declared)
					})
					.collect();
				match declared.as_slice() {
					[winner] => Ok(self.by_ident.get(winner).cloned()),
					_ => Err(RegistryFault::AmbiguousKey {
						key_type: key_type.to_string(),
						name: name.to_string(),
						candidates: many.iter().map(KeyIdent::canonical).collect(),
					}),
				}
			}
		}
	}

	/// Nearest registered name of the type, for unknown-key suggestions.
	fn suggest(&self, key_type: &str, name: &str) -> Option<String> {
		let type_lower = key_type.to_ascii_lowercase();
		let name_lower = name.to_ascii_lowercase();
		self.by_name
			.iter()
			.filter(|((bucket_type, _), _)| **bucket_type == *type_lower)
			.flat_map(|(_, idents)| idents.iter())
			.map(|ident| ident.name().to_string())
			.min_by_key(|candidate| strsim::levenshtein(&name_lower, &candidate.to_ascii_lowercase()))
			.filter(|candidate| strsim::levenshtein(&name_lower, &candidate.to_ascii_lowercase()) <= 3)
	}
}

impl AncestorSource for RegistrySnapshot {
	fn resolve_name(
		&self,
		key_type: &str,
		name: &str,
	) -> Result<Option<Arc<EnrichedDescriptor>>, RegistryFault> {
		let candidates = self
			.by_name
			.get(&name_key(key_type, name))
			.map(Vec::as_slice)
			.unwrap_or(&[]);
		self.select(key_type, name, candidates)
	}
}

/// Process-wide key catalog.
///
/// Create one per process (or per test); all operations take the registry
/// handle explicitly, so isolated instances never interfere.
pub struct KeyRegistry {
	snap: ArcSwap<RegistrySnapshot>,
}

impl Default for KeyRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl KeyRegistry {
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(RegistrySnapshot::default()),
		}
	}

	/// Scans and enriches every variant of a declared key set.
	///
	/// The scan happens once per type; re-registration is a no-op that
	/// returns the already-published entries. Concurrent first
	/// registrations of the same type converge on one published set.
	pub fn register_declared<T: KeySet>(&self) -> Result<Vec<Arc<EnrichedDescriptor>>, RegistryFault> {
		loop {
			let cur = self.snap.load_full();
			if cur.scanned.contains(T::TYPE_NAME) {
				return Ok(Self::collect_declared::<T>(&cur));
			}

			let mut batch = Vec::new();
			for variant in T::iter() {
				let def = variant.declaration();
				batch.push(Descriptor::from_def(variant.ident(), &def)?);
			}
			let entries = Enricher::new(&*cur, batch).run()?;

			let mut next = (*cur).clone();
			for entry in &entries {
				next.insert(entry.clone());
			}
			next.scanned.insert(Box::from(T::TYPE_NAME));

			let next = Arc::new(next);
			let prev = self.snap.compare_and_swap(&cur, next);
			if Arc::ptr_eq(&prev, &cur) {
				tracing::debug!(
					key_type = T::TYPE_NAME,
					count = entries.len(),
					"registered declared key set"
				);
				return Ok(entries);
			}
			// Lost the publication race; retry against the new snapshot.
		}
	}

	fn collect_declared<T: KeySet>(snap: &RegistrySnapshot) -> Vec<Arc<EnrichedDescriptor>> {
		T::iter()
			.filter_map(|variant| snap.by_ident.get(&variant.ident()).cloned())
			.collect()
	}

	/// Registers and enriches one dynamic key.
	///
	/// The identity must be new; registering an existing identity is a
	/// [`RegistryFault::DuplicateKey`] fault. Registration must happen
	/// before the key's first lookup.
	pub fn register_dynamic(
		&self,
		key_type: &str,
		name: &str,
		fields: DescriptorFields,
	) -> Result<Arc<EnrichedDescriptor>, RegistryFault> {
		let ident = KeyIdent::dynamic(key_type, name);
		loop {
			let cur = self.snap.load_full();
			if cur.by_ident.contains_key(&ident) {
				return Err(RegistryFault::DuplicateKey {
					ident: ident.canonical(),
				});
			}

			let descriptor = Descriptor::from_fields(ident.clone(), fields.clone())?;
			let mut entries = Enricher::new(&*cur, vec![descriptor]).run()?;
			let entry = entries.pop().expect("single-descriptor batch");

			let mut next = (*cur).clone();
			next.insert(entry.clone());

			let next = Arc::new(next);
			let prev = self.snap.compare_and_swap(&cur, next);
			if Arc::ptr_eq(&prev, &cur) {
				tracing::debug!(key = %entry.ident(), "registered dynamic key");
				return Ok(entry);
			}
		}
	}

	/// Drains the inventory collection of builtin key sets and registers
	/// each. Returns how many sets were installed.
	pub fn register_builtin_sets(&self) -> Result<usize, RegistryFault> {
		let mut installed = 0;
		for reg in inventory::iter::<KeySetReg>.into_iter() {
			(reg.0.install)(self)?;
			installed += 1;
		}
		tracing::debug!(count = installed, "registered builtin key sets");
		Ok(installed)
	}

	/// Direct lookup by identity. `None` when absent.
	pub fn get(&self, ident: &KeyIdent) -> Option<Arc<EnrichedDescriptor>> {
		self.snap.load().by_ident.get(ident).cloned()
	}

	/// Lookup by identity, surfacing absence as a recoverable response.
	///
	/// Once this returns an entry for an identity, every later call on any
	/// thread returns the identical `Arc`.
	pub fn lookup(&self, ident: &KeyIdent) -> Result<Arc<EnrichedDescriptor>, ErrorResponse> {
		let snap = self.snap.load();
		match snap.by_ident.get(ident) {
			Some(entry) => Ok(entry.clone()),
			None => Err(ErrorResponse::unknown_key(
				ident.canonical(),
				snap.suggest(ident.key_type(), ident.name()).as_deref(),
			)),
		}
	}

	/// Case-insensitive lookup by key-type and name.
	///
	/// See the module docs for the collision precedence contract.
	pub fn lookup_by_name(
		&self,
		key_type: &str,
		name: &str,
	) -> Result<Arc<EnrichedDescriptor>, LookupError> {
		let snap = self.snap.load();
		let candidates = snap
			.by_name
			.get(&name_key(key_type, name))
			.map(Vec::as_slice)
			.unwrap_or(&[]);
		match snap.select(key_type, name, candidates)? {
			Some(entry) => Ok(entry),
			None => Err(LookupError::NotFound(ErrorResponse::unknown_key(
				format_args!("{key_type}::{name}"),
				snap.suggest(key_type, name).as_deref(),
			))),
		}
	}

	/// Every entry of one key type, declared ordinals first, then dynamic
	/// keys by name.
	pub fn keys_of(&self, key_type: &str) -> Vec<Arc<EnrichedDescriptor>> {
		let snap = self.snap.load();
		let mut entries: Vec<Arc<EnrichedDescriptor>> = snap
			.by_ident
			.iter()
			.filter(|(ident, _)| ident.key_type().eq_ignore_ascii_case(key_type))
			.map(|(_, entry)| entry.clone())
			.collect();
		entries.sort_by_key(|entry| match entry.ident().value() {
			KeyValue::Declared { ordinal, .. } => (0u8, *ordinal, String::new()),
			KeyValue::Dynamic { name } => (1u8, 0, name.to_string()),
		});
		entries
	}

	pub fn contains(&self, ident: &KeyIdent) -> bool {
		self.snap.load().by_ident.contains_key(ident)
	}

	/// Whether a declared key type has been scanned.
	pub fn is_scanned(&self, key_type: &str) -> bool {
		self.snap.load().scanned.contains(key_type)
	}

	pub fn len(&self) -> usize {
		self.snap.load().by_ident.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl core::fmt::Debug for KeyRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("KeyRegistry")
			.field("keys", &snap.by_ident.len())
			.field("scanned_types", &snap.scanned.len())
			.finish()
	}
}
