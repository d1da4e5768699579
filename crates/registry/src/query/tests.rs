use std::sync::Arc;

use rustc_hash::FxHashMap;
use strum_macros::EnumIter;

use crate::core::{KeySet, ValueKind};
use crate::descriptor::DescriptorDef;
use crate::error::ResultCode;
use crate::registry::KeyRegistry;

use super::{CompareOp, EntityView, MatchContext, QueryId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum PersonField {
	Age,
	Name,
	Status,
}

impl KeySet for PersonField {
	const TYPE_NAME: &'static str = "PersonField";

	fn key_name(self) -> &'static str {
		match self {
			PersonField::Age => "Age",
			PersonField::Name => "Name",
			PersonField::Status => "Status",
		}
	}

	fn ordinal(self) -> u32 {
		self as u32
	}

	fn declaration(self) -> DescriptorDef {
		match self {
			PersonField::Age => DescriptorDef {
				description: Some("Age in years."),
				value_kind: Some(ValueKind::Int),
				..DescriptorDef::empty()
			},
			PersonField::Name => DescriptorDef {
				description: Some("Display name."),
				value_kind: Some(ValueKind::Text),
				..DescriptorDef::empty()
			},
			PersonField::Status => DescriptorDef {
				sample_values: &["Active", "Retired"],
				..DescriptorDef::empty()
			},
		}
	}
}

/// Minimal entity double; the entity graph lives outside the crate.
#[derive(Default)]
struct TestEntity {
	id: i64,
	identifier: Option<String>,
	properties: FxHashMap<String, String>,
}

impl TestEntity {
	fn with_property(mut self, key: &str, value: &str) -> Self {
		self.properties.insert(key.to_string(), value.to_string());
		self
	}
}

impl EntityView for TestEntity {
	fn entity_id(&self) -> i64 {
		self.id
	}

	fn identifier(&self) -> Option<&str> {
		self.identifier.as_deref()
	}

	fn property(&self, key_name: &str) -> Option<&str> {
		self.properties.get(key_name).map(String::as_str)
	}
}

fn registry() -> KeyRegistry {
	let registry = KeyRegistry::new();
	registry.register_declared::<PersonField>().unwrap();
	registry
}

#[test]
fn all_matches_anything_including_empty_entities() {
	let parsed = QueryId::parse("All", PersonField::TYPE_NAME, &registry()).unwrap();
	assert_eq!(parsed, QueryId::All);
	assert!(parsed.is_multiple());

	let empty = TestEntity::default();
	assert!(parsed.is_match(&empty, &MatchContext::new()));
}

#[test]
fn token_rules_are_case_insensitive() {
	let reg = registry();
	assert_eq!(
		QueryId::parse("all", PersonField::TYPE_NAME, &reg).unwrap(),
		QueryId::All
	);
	assert_eq!(
		QueryId::parse("currentcontext", PersonField::TYPE_NAME, &reg).unwrap(),
		QueryId::CurrentContext
	);
}

#[test]
fn integer_input_resolves_to_by_id_never_identifier() {
	// "42" is also a plausible identity string; the earlier rule wins.
	let parsed = QueryId::parse("42", PersonField::TYPE_NAME, &registry()).unwrap();
	assert_eq!(parsed, QueryId::ById(42));
	assert!(parsed.is_single());

	let entity = TestEntity {
		id: 42,
		..TestEntity::default()
	};
	assert!(parsed.is_match(&entity, &MatchContext::new()));
	let other = TestEntity {
		id: 7,
		..TestEntity::default()
	};
	assert!(!parsed.is_match(&other, &MatchContext::new()));
}

#[test]
fn zero_is_not_a_valid_numeric_identity() {
	let parsed = QueryId::parse("0", PersonField::TYPE_NAME, &registry()).unwrap();
	assert_eq!(parsed, QueryId::ByIdentifier(Arc::from("0")));
}

#[test]
fn bare_token_is_an_identity_string() {
	let parsed = QueryId::parse("PROJ-7", PersonField::TYPE_NAME, &registry()).unwrap();
	assert_eq!(parsed, QueryId::ByIdentifier(Arc::from("PROJ-7")));
	assert!(parsed.is_single());

	let entity = TestEntity {
		id: 1,
		identifier: Some("proj-7".to_string()),
		..TestEntity::default()
	};
	assert!(parsed.is_match(&entity, &MatchContext::new()));
}

#[test]
fn key_operator_value_compares_numerically() {
	let parsed = QueryId::parse("Age GT 30", PersonField::TYPE_NAME, &registry()).unwrap();
	match &parsed {
		QueryId::KeyOperatorValue { key, op, value } => {
			assert_eq!(key.name(), "Age");
			assert_eq!(*op, CompareOp::Gt);
			assert_eq!(&**value, "30");
		}
		other => panic!("expected KeyOperatorValue, got {other:?}"),
	}
	assert!(parsed.is_multiple());

	let ctx = MatchContext::new();
	let young = TestEntity::default().with_property("Age", "25");
	let older = TestEntity::default().with_property("Age", "31");
	// Numeric, not lexical: "9" must not beat "31".
	let nine = TestEntity::default().with_property("Age", "9");
	assert!(!parsed.is_match(&young, &ctx));
	assert!(parsed.is_match(&older, &ctx));
	assert!(!parsed.is_match(&nine, &ctx));

	let gte = QueryId::parse("Age GTE 31", PersonField::TYPE_NAME, &registry()).unwrap();
	assert!(gte.is_match(&older, &ctx));
}

#[test]
fn missing_property_never_matches() {
	let reg = registry();
	let ctx = MatchContext::new();
	let entity = TestEntity::default();

	for query in ["Age GT 30", "Age NEQ 30", "Age EQ 30"] {
		let parsed = QueryId::parse(query, PersonField::TYPE_NAME, &reg).unwrap();
		assert!(!parsed.is_match(&entity, &ctx), "{query} matched an entity without the property");
	}
}

#[test]
fn text_comparisons_fall_back_to_lexical_order() {
	let parsed = QueryId::parse("Name LT m", PersonField::TYPE_NAME, &registry()).unwrap();
	let ctx = MatchContext::new();
	assert!(parsed.is_match(&TestEntity::default().with_property("Name", "ada"), &ctx));
	assert!(!parsed.is_match(&TestEntity::default().with_property("Name", "zoe"), &ctx));
}

#[test]
fn value_with_spaces_spans_the_rest_of_the_input() {
	let parsed = QueryId::parse("Name EQ Ada Lovelace", PersonField::TYPE_NAME, &registry()).unwrap();
	match &parsed {
		QueryId::KeyOperatorValue { value, .. } => assert_eq!(&**value, "Ada Lovelace"),
		other => panic!("expected KeyOperatorValue, got {other:?}"),
	}
}

#[test]
fn current_context_uses_the_caller_supplied_set() {
	let parsed = QueryId::parse("CurrentContext", PersonField::TYPE_NAME, &registry()).unwrap();
	let ctx: MatchContext = [3, 5].into_iter().collect();

	let in_ctx = TestEntity {
		id: 5,
		..TestEntity::default()
	};
	let out_of_ctx = TestEntity {
		id: 9,
		..TestEntity::default()
	};
	assert!(parsed.is_match(&in_ctx, &ctx));
	assert!(!parsed.is_match(&out_of_ctx, &ctx));
}

#[test]
fn unknown_key_and_operator_name_the_offending_token() {
	let reg = registry();

	let err = QueryId::parse("Salary GT 10", PersonField::TYPE_NAME, &reg).unwrap_err();
	assert_eq!(err.code, ResultCode::ParseError);
	assert!(err.message.contains("Salary"));

	let err = QueryId::parse("Age NEAR 10", PersonField::TYPE_NAME, &reg).unwrap_err();
	assert_eq!(err.code, ResultCode::ParseError);
	assert!(err.message.contains("NEAR"));
}

#[test]
fn two_tokens_fit_no_grammar_rule() {
	let err = QueryId::parse("Age GT", PersonField::TYPE_NAME, &registry()).unwrap_err();
	assert_eq!(err.code, ResultCode::NoMatchingGrammar);
}

#[test]
fn round_trip_preserves_matching_semantics() {
	let reg = registry();
	let queries = [
		QueryId::All,
		QueryId::CurrentContext,
		QueryId::ById(42),
		QueryId::ByIdentifier(Arc::from("PROJ-7")),
		QueryId::parse("Age GTE 21", PersonField::TYPE_NAME, &reg).unwrap(),
		QueryId::parse("Status EQ Active", PersonField::TYPE_NAME, &reg).unwrap(),
	];

	for query in &queries {
		let rendered = query.to_string();
		let reparsed = QueryId::parse(&rendered, PersonField::TYPE_NAME, &reg).unwrap();
		assert_eq!(&reparsed, query, "round-trip changed {rendered:?}");
	}
}

#[test]
fn field_iterator_renders_but_never_matches() {
	let iterator = QueryId::FieldIterator {
		row_key: Arc::from("Status"),
		column_type: Arc::from("Project"),
		column_key: Arc::from("Phase"),
	};
	assert_eq!(iterator.to_string(), "ITERATE Status BY Project.Phase");
	assert!(iterator.is_multiple());

	// The rendered form is not parseable as a predicate either; the row
	// token is not a key of the scoped type.
	let err = QueryId::parse(&iterator.to_string(), PersonField::TYPE_NAME, &registry()).unwrap_err();
	assert_eq!(err.code, ResultCode::ParseError);
}

#[test]
#[should_panic(expected = "undefined for FieldIterator")]
fn field_iterator_match_fails_fast() {
	let iterator = QueryId::FieldIterator {
		row_key: Arc::from("Status"),
		column_type: Arc::from("Project"),
		column_key: Arc::from("Phase"),
	};
	let entity = TestEntity::default();
	iterator.is_match(&entity, &MatchContext::new());
}
