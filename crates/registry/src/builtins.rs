//! Built-in key sets.
//!
//! Every entity type on the platform carries the [`EntityField`] keys.
//! The set registers itself through the inventory collection; call
//! [`KeyRegistry::register_builtin_sets`](crate::registry::KeyRegistry::register_builtin_sets)
//! to install it along with any sets contributed by other crates.

use strum_macros::EnumIter;

use crate::core::{AccessLevel, KeySet, KeySetDef, KeySetReg, TypedKey, ValueKind};
use crate::descriptor::DescriptorDef;
use crate::error::RegistryFault;
use crate::registry::KeyRegistry;

/// Keys common to every entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum EntityField {
	Id,
	Identifier,
	Name,
	Description,
	Status,
	CreatedAt,
	ModifiedAt,
}

impl KeySet for EntityField {
	const TYPE_NAME: &'static str = "EntityField";

	fn key_name(self) -> &'static str {
		match self {
			EntityField::Id => "Id",
			EntityField::Identifier => "Identifier",
			EntityField::Name => "Name",
			EntityField::Description => "Description",
			EntityField::Status => "Status",
			EntityField::CreatedAt => "CreatedAt",
			EntityField::ModifiedAt => "ModifiedAt",
		}
	}

	fn ordinal(self) -> u32 {
		self as u32
	}

	fn declaration(self) -> DescriptorDef {
		match self {
			EntityField::Id => DescriptorDef {
				description: Some("Numeric identity of the entity."),
				read_access: Some(AccessLevel::Anonymous),
				write_access: Some(AccessLevel::System),
				unique: Some(true),
				read_only: Some(true),
				value_kind: Some(ValueKind::Int),
				..DescriptorDef::empty()
			},
			EntityField::Identifier => DescriptorDef {
				description: Some("Human-readable identity string."),
				long_description: Some(
					"Stable identity string used wherever a numeric id is too opaque, \
					 e.g. in query input and exported references.",
				),
				read_access: Some(AccessLevel::Anonymous),
				unique: Some(true),
				value_kind: Some(ValueKind::Text),
				..DescriptorDef::empty()
			},
			EntityField::Name => DescriptorDef {
				description: Some("Display name."),
				read_access: Some(AccessLevel::Anonymous),
				value_kind: Some(ValueKind::Text),
				..DescriptorDef::empty()
			},
			EntityField::Description => DescriptorDef {
				description: Some("Free-form description."),
				value_kind: Some(ValueKind::Opaque),
				..DescriptorDef::empty()
			},
			EntityField::Status => DescriptorDef {
				description: Some("Lifecycle status."),
				sample_values: &["Draft", "Active", "Archived"],
				value_kind: Some(ValueKind::Text),
				..DescriptorDef::empty()
			},
			EntityField::CreatedAt => DescriptorDef {
				description: Some("Creation time, seconds since the epoch."),
				write_access: Some(AccessLevel::System),
				read_only: Some(true),
				value_kind: Some(ValueKind::Int),
				..DescriptorDef::empty()
			},
			// Shares the timestamp contract with CreatedAt.
			EntityField::ModifiedAt => DescriptorDef {
				description: Some("Last modification time, seconds since the epoch."),
				inherit_from: Some((Self::TYPE_NAME, "CreatedAt")),
				..DescriptorDef::empty()
			},
		}
	}
}

/// Numeric identity key.
pub const ENTITY_ID: TypedKey<EntityField> = TypedKey::new(EntityField::Id);

/// Identity-string key; identity-string query identifiers predicate on it.
pub const ENTITY_IDENTIFIER: TypedKey<EntityField> = TypedKey::new(EntityField::Identifier);

/// Lifecycle status key.
pub const ENTITY_STATUS: TypedKey<EntityField> = TypedKey::new(EntityField::Status);

fn install_entity_fields(registry: &KeyRegistry) -> Result<(), RegistryFault> {
	registry.register_declared::<EntityField>().map(|_| ())
}

static ENTITY_FIELDS: KeySetDef = KeySetDef {
	type_name: EntityField::TYPE_NAME,
	install: install_entity_fields,
};

inventory::submit! { KeySetReg(&ENTITY_FIELDS) }
