//! Descriptor enrichment.
//!
//! Enrichment turns a raw [`Descriptor`] into an [`EnrichedDescriptor`]:
//! the inheritance chain is resolved and merged field by field, and a
//! validator is bound. The merge direction is most-specific wins; an unset
//! field falls through to the nearest ancestor that defines it.
//!
//! Enrichment runs over a batch (a whole declared scan, or a single
//! dynamic registration) so ancestors may live either in the registry or
//! in the batch itself. The output is deterministic: enriching the same
//! descriptor against the same registry state produces identical entries.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::{AccessLevel, ValueKind};
use crate::error::RegistryFault;
use crate::validate::{ValidatorKind, ValidatorParser};

use super::descriptor::Descriptor;
use super::entry::EnrichedDescriptor;

/// Fallback access levels for keys whose chain never sets them.
const DEFAULT_READ_ACCESS: AccessLevel = AccessLevel::User;
const DEFAULT_WRITE_ACCESS: AccessLevel = AccessLevel::Manager;

/// Resolves inherit-from references against already-published entries.
pub(crate) trait AncestorSource {
	/// Case-insensitive resolution of `(key type, name)` to a published
	/// entry. `Ok(None)` means nothing is published under that name.
	fn resolve_name(
		&self,
		key_type: &str,
		name: &str,
	) -> Result<Option<Arc<EnrichedDescriptor>>, RegistryFault>;
}

/// One enrichment pass over a batch of descriptors.
pub(crate) struct Enricher<'a> {
	published: &'a dyn AncestorSource,
	/// Batch index by lowercased `(type, name)`.
	batch_names: FxHashMap<(String, String), usize>,
	batch: Vec<Descriptor>,
	done: Vec<Option<Arc<EnrichedDescriptor>>>,
}

impl<'a> Enricher<'a> {
	pub fn new(published: &'a dyn AncestorSource, batch: Vec<Descriptor>) -> Self {
		let mut batch_names = FxHashMap::default();
		for (index, descriptor) in batch.iter().enumerate() {
			let ident = descriptor.ident();
			batch_names.insert(
				(
					ident.key_type().to_ascii_lowercase(),
					ident.name().to_ascii_lowercase(),
				),
				index,
			);
		}
		let done = vec![None; batch.len()];
		Self {
			published,
			batch_names,
			batch,
			done,
		}
	}

	/// Enriches every descriptor in the batch, in input order.
	pub fn run(mut self) -> Result<Vec<Arc<EnrichedDescriptor>>, RegistryFault> {
		let mut stack = Vec::new();
		for index in 0..self.batch.len() {
			self.enrich_index(index, &mut stack)?;
		}
		Ok(self
			.done
			.into_iter()
			.map(|entry| entry.expect("every batch index enriched"))
			.collect())
	}

	fn enrich_index(
		&mut self,
		index: usize,
		stack: &mut Vec<String>,
	) -> Result<Arc<EnrichedDescriptor>, RegistryFault> {
		if let Some(done) = &self.done[index] {
			return Ok(done.clone());
		}

		let canonical = self.batch[index].ident().canonical();
		if stack.contains(&canonical) {
			let mut path: Vec<&str> = stack
				.iter()
				.skip_while(|entry| **entry != canonical)
				.map(String::as_str)
				.collect();
			path.push(&canonical);
			return Err(RegistryFault::InheritanceCycle {
				path: path.join(" -> "),
			});
		}

		stack.push(canonical);
		let parent = match self.batch[index].inherit_from().cloned() {
			Some(reference) => {
				let resolved = self
					.published
					.resolve_name(&reference.key_type, &reference.name)?;
				match resolved {
					Some(entry) => Some(entry),
					None => {
						let batch_key = (
							reference.key_type.to_ascii_lowercase(),
							reference.name.to_ascii_lowercase(),
						);
						match self.batch_names.get(&batch_key).copied() {
							Some(ancestor_index) => Some(self.enrich_index(ancestor_index, stack)?),
							None => {
								return Err(RegistryFault::UnknownAncestor {
									ident: self.batch[index].ident().canonical(),
									ancestor: reference.to_string(),
								});
							}
						}
					}
				}
			}
			None => None,
		};
		stack.pop();

		let entry = Arc::new(merge(self.batch[index].clone(), parent.as_deref()));
		tracing::trace!(key = %entry.canonical(), ancestors = entry.ancestors().len(), "enriched descriptor");
		self.done[index] = Some(entry.clone());
		Ok(entry)
	}
}

/// Merges a descriptor with its resolved direct ancestor and binds the
/// validator. The ancestor's own chain is already merged, so falling
/// through to it covers the whole chain transitively.
fn merge(descriptor: Descriptor, parent: Option<&EnrichedDescriptor>) -> EnrichedDescriptor {
	let ancestors = match parent {
		Some(parent) => {
			let mut chain = Vec::with_capacity(1 + parent.ancestors.len());
			chain.push(parent.ident().clone());
			chain.extend(parent.ancestors.iter().cloned());
			chain
		}
		None => Vec::new(),
	};

	let description = descriptor
		.description
		.clone()
		.or_else(|| parent.map(|p| p.description.clone()))
		.unwrap_or_else(|| Arc::from(""));
	let long_description = descriptor
		.long_description
		.clone()
		.or_else(|| parent.map(|p| p.long_description.clone()))
		.unwrap_or_else(|| Arc::from(""));
	let read_access = descriptor
		.read_access
		.or(parent.map(|p| p.read_access))
		.unwrap_or(DEFAULT_READ_ACCESS);
	let write_access = descriptor
		.write_access
		.or(parent.map(|p| p.write_access))
		.unwrap_or(DEFAULT_WRITE_ACCESS);
	let sample_values = if descriptor.sample_values.is_empty() {
		parent.map(|p| p.sample_values.clone()).unwrap_or_default()
	} else {
		descriptor.sample_values.clone()
	};
	let unique = descriptor
		.unique
		.or(parent.map(|p| p.unique))
		.unwrap_or(false);
	let read_only = descriptor
		.read_only
		.or(parent.map(|p| p.read_only))
		.unwrap_or(false);
	let value_kind = descriptor
		.value_kind
		.or(parent.map(|p| p.value_kind))
		.unwrap_or(ValueKind::Opaque);

	// An ancestor's bound validator is Custom exactly when its own chain
	// supplied an explicit hook, so the hook inherits through it.
	let inherited_hook = parent.and_then(|p| match p.validator.kind() {
		ValidatorKind::Custom(hook) => Some(*hook),
		_ => None,
	});
	let key_name: Arc<str> = Arc::from(descriptor.ident().name());
	let validator = match descriptor.validator.or(inherited_hook) {
		Some(hook) => ValidatorParser::new(key_name, ValidatorKind::Custom(hook)),
		None if !sample_values.is_empty() => ValidatorParser::new(
			key_name,
			ValidatorKind::OneOf(Arc::from(sample_values.clone())),
		),
		None => ValidatorParser::for_kind(key_name, value_kind),
	};

	let canonical = Arc::from(descriptor.ident().canonical());
	EnrichedDescriptor {
		descriptor,
		ancestors,
		description,
		long_description,
		read_access,
		write_access,
		sample_values,
		unique,
		read_only,
		value_kind,
		validator,
		canonical,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::{AccessLevel, KeyIdent};
	use crate::descriptor::{DescriptorFields, InheritRef};
	use crate::validate::ParsedValue;

	struct NoPublished;

	impl AncestorSource for NoPublished {
		fn resolve_name(
			&self,
			_key_type: &str,
			_name: &str,
		) -> Result<Option<Arc<EnrichedDescriptor>>, RegistryFault> {
			Ok(None)
		}
	}

	fn dynamic(name: &str, fields: DescriptorFields) -> Descriptor {
		Descriptor::from_fields(KeyIdent::dynamic("Test", name), fields).unwrap()
	}

	#[test]
	fn unset_fields_fall_through_the_chain() {
		let root = dynamic(
			"Root",
			DescriptorFields::new()
				.with_description("root docs")
				.with_access(AccessLevel::Anonymous, AccessLevel::Admin),
		);
		let mid = dynamic(
			"Mid",
			DescriptorFields {
				long_description: Some("mid detail".into()),
				inherit_from: Some(InheritRef::new("Test", "Root")),
				..DescriptorFields::new()
			},
		);
		let leaf = dynamic(
			"Leaf",
			DescriptorFields {
				description: Some("leaf docs".into()),
				inherit_from: Some(InheritRef::new("Test", "Mid")),
				..DescriptorFields::new()
			},
		);

		let enriched = Enricher::new(&NoPublished, vec![root, mid, leaf])
			.run()
			.unwrap();
		let leaf = &enriched[2];

		// Local wins, unset falls through to the nearest definer.
		assert_eq!(leaf.description(), "leaf docs");
		assert_eq!(leaf.long_description(), "mid detail");
		assert_eq!(leaf.read_access(), AccessLevel::Anonymous);
		assert_eq!(leaf.write_access(), AccessLevel::Admin);
		assert_eq!(
			leaf.ancestors()
				.iter()
				.map(|a| a.name().to_string())
				.collect::<Vec<_>>(),
			vec!["Mid", "Root"]
		);
	}

	#[test]
	fn batch_order_does_not_matter() {
		let child = dynamic(
			"Child",
			DescriptorFields::new().with_inherit_from("Test", "Base"),
		);
		let base = dynamic("Base", DescriptorFields::new().with_description("base"));

		// Child appears before its ancestor in the batch.
		let enriched = Enricher::new(&NoPublished, vec![child, base]).run().unwrap();
		assert_eq!(enriched[0].description(), "base");
	}

	#[test]
	fn cycle_is_named_in_full() {
		let a = dynamic("A", DescriptorFields::new().with_inherit_from("Test", "B"));
		let b = dynamic("B", DescriptorFields::new().with_inherit_from("Test", "A"));

		let err = Enricher::new(&NoPublished, vec![a, b]).run().unwrap_err();
		match err {
			RegistryFault::InheritanceCycle { path } => {
				assert_eq!(path, "Test::A -> Test::B -> Test::A");
			}
			other => panic!("expected InheritanceCycle, got {other:?}"),
		}
	}

	#[test]
	fn self_inheritance_is_a_cycle() {
		let a = dynamic("A", DescriptorFields::new().with_inherit_from("Test", "A"));
		let err = Enricher::new(&NoPublished, vec![a]).run().unwrap_err();
		assert!(matches!(err, RegistryFault::InheritanceCycle { .. }));
	}

	#[test]
	fn unknown_ancestor_is_a_fault() {
		let a = dynamic(
			"A",
			DescriptorFields::new().with_inherit_from("Test", "Missing"),
		);
		let err = Enricher::new(&NoPublished, vec![a]).run().unwrap_err();
		match err {
			RegistryFault::UnknownAncestor { ident, ancestor } => {
				assert_eq!(ident, "Test::A");
				assert_eq!(ancestor, "Test::Missing");
			}
			other => panic!("expected UnknownAncestor, got {other:?}"),
		}
	}

	#[test]
	fn sample_values_bind_a_membership_validator() {
		let status = dynamic(
			"Status",
			DescriptorFields::new()
				.with_description("entity status")
				.with_sample_values(["Active", "Closed"]),
		);

		let enriched = Enricher::new(&NoPublished, vec![status]).run().unwrap();
		let entry = &enriched[0];
		assert!(entry.validator().validate("Active").is_ok());

		let err = entry.validator().validate("Bogus").into_result().unwrap_err();
		assert!(err.message.contains("Status"));
	}

	#[test]
	fn kind_default_applies_when_chain_is_silent() {
		let count = dynamic(
			"Count",
			DescriptorFields::new().with_value_kind(ValueKind::Int),
		);
		let enriched = Enricher::new(&NoPublished, vec![count]).run().unwrap();
		assert_eq!(
			enriched[0].validator().validate("41").value(),
			Some(&ParsedValue::Int(41))
		);
		assert!(!enriched[0].validator().validate("4.5").is_ok());
	}

	#[test]
	fn enrichment_is_deterministic() {
		let build = || {
			dynamic(
				"Status",
				DescriptorFields::new()
					.with_description("entity status")
					.with_sample_values(["Active", "Closed"]),
			)
		};
		let first = Enricher::new(&NoPublished, vec![build()]).run().unwrap();
		let second = Enricher::new(&NoPublished, vec![build()]).run().unwrap();

		assert_eq!(first[0].description(), second[0].description());
		assert_eq!(first[0].sample_values(), second[0].sample_values());
		assert_eq!(first[0].canonical(), second[0].canonical());
	}
}
