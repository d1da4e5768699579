//! Cross-module test suites.

mod consistency;

use strum_macros::EnumIter;

use crate::core::{KeySet, ValueKind};
use crate::descriptor::DescriptorDef;

/// Fixture key set used across suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub(crate) enum ProjectField {
	Code,
	Budget,
	Phase,
}

impl KeySet for ProjectField {
	const TYPE_NAME: &'static str = "ProjectField";

	fn key_name(self) -> &'static str {
		match self {
			ProjectField::Code => "Code",
			ProjectField::Budget => "Budget",
			ProjectField::Phase => "Phase",
		}
	}

	fn ordinal(self) -> u32 {
		self as u32
	}

	fn declaration(self) -> DescriptorDef {
		match self {
			ProjectField::Code => DescriptorDef {
				description: Some("Project code."),
				unique: Some(true),
				value_kind: Some(ValueKind::Text),
				..DescriptorDef::empty()
			},
			ProjectField::Budget => DescriptorDef {
				description: Some("Budget in whole currency units."),
				value_kind: Some(ValueKind::Int),
				..DescriptorDef::empty()
			},
			ProjectField::Phase => DescriptorDef {
				sample_values: &["Design", "Build", "Run"],
				..DescriptorDef::empty()
			},
		}
	}
}
