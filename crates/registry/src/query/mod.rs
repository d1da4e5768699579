//! Query identifiers.
//!
//! A [`QueryId`] addresses one entity, a set of entities, or a structured
//! two-axis iteration. The variant set is closed and every consumer
//! matches it exhaustively. Each variant renders to a canonical string
//! form; [`QueryId::parse`] (in [`parse`](self::parse)) turns strings back
//! into identifiers through an ordered rule list.
//!
//! Matching runs against the [`EntityView`] boundary trait; the entity
//! graph itself lives outside this crate. The current-context variant is
//! resolved against a caller-supplied [`MatchContext`].

mod parse;

use std::cmp::Ordering;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::descriptor::EnrichedDescriptor;

#[cfg(test)]
mod tests;

/// Comparison operator of a key-operator-value predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Neq,
	Gt,
	Lt,
	Gte,
	Lte,
}

impl CompareOp {
	/// Canonical grammar token.
	pub fn as_str(self) -> &'static str {
		match self {
			CompareOp::Eq => "EQ",
			CompareOp::Neq => "NEQ",
			CompareOp::Gt => "GT",
			CompareOp::Lt => "LT",
			CompareOp::Gte => "GTE",
			CompareOp::Lte => "LTE",
		}
	}

	/// Parses a grammar token, case-insensitively.
	pub fn from_token(token: &str) -> Option<Self> {
		match token.to_ascii_uppercase().as_str() {
			"EQ" => Some(CompareOp::Eq),
			"NEQ" => Some(CompareOp::Neq),
			"GT" => Some(CompareOp::Gt),
			"LT" => Some(CompareOp::Lt),
			"GTE" => Some(CompareOp::Gte),
			"LTE" => Some(CompareOp::Lte),
			_ => None,
		}
	}

	/// Whether an ordering between property and operand satisfies the
	/// operator.
	pub fn holds(self, ordering: Ordering) -> bool {
		match self {
			CompareOp::Eq => ordering == Ordering::Equal,
			CompareOp::Neq => ordering != Ordering::Equal,
			CompareOp::Gt => ordering == Ordering::Greater,
			CompareOp::Lt => ordering == Ordering::Less,
			CompareOp::Gte => ordering != Ordering::Less,
			CompareOp::Lte => ordering != Ordering::Greater,
		}
	}
}

impl core::fmt::Display for CompareOp {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Read-only view of an entity, as much of it as matching needs.
pub trait EntityView {
	/// Numeric identity.
	fn entity_id(&self) -> i64;

	/// Identity string, when the entity has one.
	fn identifier(&self) -> Option<&str>;

	/// Raw string form of a property, addressed by canonical key name.
	fn property(&self, key_name: &str) -> Option<&str>;
}

/// Caller-supplied context set for [`QueryId::CurrentContext`].
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
	ids: FxHashSet<i64>,
}

impl MatchContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, id: i64) {
		self.ids.insert(id);
	}

	pub fn contains(&self, id: i64) -> bool {
		self.ids.contains(&id)
	}
}

impl FromIterator<i64> for MatchContext {
	fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
		Self {
			ids: iter.into_iter().collect(),
		}
	}
}

/// Matcher/serializer addressing entities.
///
/// Single-entity variants are [`QueryId::ById`] and
/// [`QueryId::ByIdentifier`]; every other variant addresses a set. The
/// identity-string variant is a key-operator-value predicate fixed to the
/// identity key with equality, so only the value is carried.
#[derive(Debug, Clone)]
pub enum QueryId {
	/// Matches every entity.
	All,
	/// Matches the entity with this numeric identity. Never zero.
	ById(i64),
	/// Matches the entity whose identity string equals the value.
	ByIdentifier(Arc<str>),
	/// Matches entities whose property satisfies `value OP operator`.
	KeyOperatorValue {
		key: Arc<EnrichedDescriptor>,
		op: CompareOp,
		value: Arc<str>,
	},
	/// Matches entities in the caller's current context set.
	CurrentContext,
	/// Two-axis iteration request: group row-key values by a column key of
	/// another type. Not an entity matcher; render-only.
	FieldIterator {
		row_key: Arc<str>,
		column_type: Arc<str>,
		column_key: Arc<str>,
	},
}

impl QueryId {
	/// Whether this identifier addresses exactly one entity.
	pub fn is_single(&self) -> bool {
		matches!(self, QueryId::ById(_) | QueryId::ByIdentifier(_))
	}

	/// Whether this identifier addresses a set of entities.
	pub fn is_multiple(&self) -> bool {
		!self.is_single()
	}

	/// Tests one entity against this identifier.
	///
	/// # Panics
	///
	/// Panics for [`QueryId::FieldIterator`]: iteration requests are
	/// structural, not entity matchers, and invoking matching on one is a
	/// caller defect.
	pub fn is_match(&self, entity: &dyn EntityView, ctx: &MatchContext) -> bool {
		match self {
			QueryId::All => true,
			QueryId::ById(id) => entity.entity_id() == *id,
			QueryId::ByIdentifier(value) => entity
				.identifier()
				.is_some_and(|identifier| identifier.eq_ignore_ascii_case(value)),
			QueryId::KeyOperatorValue { key, op, value } => match entity.property(key.name()) {
				Some(property) => op.holds(compare_property(key, property, value)),
				// A missing property satisfies no operator.
				None => false,
			},
			QueryId::CurrentContext => ctx.contains(entity.entity_id()),
			QueryId::FieldIterator { .. } => {
				panic!("is_match is undefined for FieldIterator query identifiers")
			}
		}
	}
}

/// Orders a property string against an operand string under a key.
///
/// Both sides go through the key's validator; when both parse, the typed
/// values are compared, otherwise the raw strings compare lexically.
fn compare_property(key: &EnrichedDescriptor, property: &str, operand: &str) -> Ordering {
	use crate::validate::ParsedValue;

	let lhs = key.validator().validate(property).into_result();
	let rhs = key.validator().validate(operand).into_result();
	match (lhs, rhs) {
		(Ok(ParsedValue::Int(a)), Ok(ParsedValue::Int(b))) => a.cmp(&b),
		(Ok(ParsedValue::Bool(a)), Ok(ParsedValue::Bool(b))) => a.cmp(&b),
		(Ok(ParsedValue::Text(a)), Ok(ParsedValue::Text(b))) => a.cmp(&b),
		_ => property.cmp(operand),
	}
}

impl PartialEq for QueryId {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(QueryId::All, QueryId::All) => true,
			(QueryId::CurrentContext, QueryId::CurrentContext) => true,
			(QueryId::ById(a), QueryId::ById(b)) => a == b,
			(QueryId::ByIdentifier(a), QueryId::ByIdentifier(b)) => a == b,
			(
				QueryId::KeyOperatorValue {
					key: key_a,
					op: op_a,
					value: value_a,
				},
				QueryId::KeyOperatorValue {
					key: key_b,
					op: op_b,
					value: value_b,
				},
			) => key_a.ident() == key_b.ident() && op_a == op_b && value_a == value_b,
			(
				QueryId::FieldIterator {
					row_key: row_a,
					column_type: type_a,
					column_key: column_a,
				},
				QueryId::FieldIterator {
					row_key: row_b,
					column_type: type_b,
					column_key: column_b,
				},
			) => row_a == row_b && type_a == type_b && column_a == column_b,
			_ => false,
		}
	}
}

impl core::fmt::Display for QueryId {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			QueryId::All => f.write_str("All"),
			QueryId::ById(id) => write!(f, "{id}"),
			QueryId::ByIdentifier(value) => f.write_str(value),
			QueryId::KeyOperatorValue { key, op, value } => {
				write!(f, "{} {op} {value}", key.name())
			}
			QueryId::CurrentContext => f.write_str("CurrentContext"),
			QueryId::FieldIterator {
				row_key,
				column_type,
				column_key,
			} => write!(f, "ITERATE {row_key} BY {column_type}.{column_key}"),
		}
	}
}
