//! Injected keys.
//!
//! An injected key exposes the same metadata contract as a stored key, but
//! its value is produced at read time by an external injector following a
//! [`ComputationRule`]. The rule is plain data: the core validates it
//! against the registry without ever executing the injector, and
//! persistence-facing code uses [`KeyHandle::storable`] to route around
//! injected keys.

use crate::core::ident::KeyIdent;
use crate::core::key::Key;
use crate::error::RegistryFault;
use crate::registry::KeyRegistry;

/// Aggregation function applied over a source key's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
	Count,
	Sum,
	Min,
	Max,
	Avg,
}

impl AggregateFn {
	pub fn as_str(self) -> &'static str {
		match self {
			AggregateFn::Count => "count",
			AggregateFn::Sum => "sum",
			AggregateFn::Min => "min",
			AggregateFn::Max => "max",
			AggregateFn::Avg => "avg",
		}
	}
}

impl core::fmt::Display for AggregateFn {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Rule an external injector follows to compute an injected key's value.
///
/// The variants are the closed set of injected-key derivations. Rules are
/// data, not behavior; [`ComputationRule::validate`] checks their
/// structure, and execution belongs entirely to the injector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputationRule {
	/// Aggregate the values of another key.
	Aggregate {
		function: AggregateFn,
		source: KeyIdent,
	},
	/// Expand a template; `{}` marks where the entity value goes.
	Expansion { template: String },
	/// Follow a join to another entity type and read a key there.
	Join {
		target_type: String,
		key: KeyIdent,
	},
}

impl ComputationRule {
	/// Checks the rule's structure against the registry.
	///
	/// `ident` is the injected key the rule is attached to; it only labels
	/// diagnostics.
	pub fn validate(&self, ident: &KeyIdent, registry: &KeyRegistry) -> Result<(), RegistryFault> {
		let invalid = |reason: String| RegistryFault::InvalidComputationRule {
			ident: ident.canonical(),
			reason,
		};
		match self {
			ComputationRule::Aggregate { source, .. } => {
				if registry.get(source).is_none() {
					return Err(invalid(format!("aggregate source {source} is not registered")));
				}
			}
			ComputationRule::Expansion { template } => {
				if template.trim().is_empty() {
					return Err(invalid("expansion template is empty".to_string()));
				}
				if !template.contains("{}") {
					return Err(invalid(format!(
						"expansion template {template:?} has no {{}} placeholder"
					)));
				}
			}
			ComputationRule::Join { target_type, key } => {
				if target_type.trim().is_empty() {
					return Err(invalid("join target type is empty".to_string()));
				}
				if registry.get(key).is_none() {
					return Err(invalid(format!("join key {key} is not registered")));
				}
			}
		}
		Ok(())
	}
}

impl core::fmt::Display for ComputationRule {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			ComputationRule::Aggregate { function, source } => {
				write!(f, "{function}({source})")
			}
			ComputationRule::Expansion { template } => write!(f, "expand {template:?}"),
			ComputationRule::Join { target_type, key } => write!(f, "join {target_type} via {key}"),
		}
	}
}

/// A key whose value an external injector computes.
#[derive(Debug, Clone)]
pub struct InjectedKey {
	key: Key,
	rule: ComputationRule,
}

impl InjectedKey {
	/// Attaches a computation rule to a key, validating the rule first.
	pub fn bind(key: Key, rule: ComputationRule, registry: &KeyRegistry) -> Result<Self, RegistryFault> {
		rule.validate(key.ident(), registry)?;
		Ok(Self { key, rule })
	}

	pub fn key(&self) -> &Key {
		&self.key
	}

	/// The rule the external injector reads to produce the value.
	pub fn computation_rule(&self) -> &ComputationRule {
		&self.rule
	}

	pub fn ident(&self) -> &KeyIdent {
		self.key.ident()
	}
}

/// A key as seen by persistence-facing code: either stored directly or
/// computed by an injector.
#[derive(Debug, Clone)]
pub enum KeyHandle {
	Stored(Key),
	Injected(InjectedKey),
}

impl KeyHandle {
	pub fn ident(&self) -> &KeyIdent {
		match self {
			KeyHandle::Stored(key) => key.ident(),
			KeyHandle::Injected(injected) => injected.ident(),
		}
	}

	pub fn key(&self) -> &Key {
		match self {
			KeyHandle::Stored(key) => key,
			KeyHandle::Injected(injected) => injected.key(),
		}
	}

	/// Returns the key if it may be written to storage directly.
	///
	/// Injected keys fail here; their values must come from the injector,
	/// and a caller trying to store one has wired its persistence wrong.
	pub fn storable(&self) -> Result<&Key, RegistryFault> {
		match self {
			KeyHandle::Stored(key) => Ok(key),
			KeyHandle::Injected(injected) => Err(RegistryFault::NotDirectlySettable {
				ident: injected.ident().canonical(),
			}),
		}
	}
}
