//! Query-identifier grammar.
//!
//! Canonical forms:
//!
//! ```text
//! All
//! CurrentContext
//! <integer>
//! <identifier>
//! <key> <operator> <value>      operator in {EQ, NEQ, GT, LT, GTE, LTE}
//! ITERATE <key> BY <type>.<key> (render-only; never parsed)
//! ```
//!
//! Rules are tried in a fixed order and the first hit wins, so ambiguous
//! input resolves deterministically: a numeric identity string parses as
//! [`QueryId::ById`], never as [`QueryId::ByIdentifier`]. Downstream query
//! planning depends on that ordering.

use std::sync::Arc;

use crate::error::{ErrorResponse, LookupError};
use crate::registry::KeyRegistry;

use super::{CompareOp, QueryId};

impl QueryId {
	/// Parses the canonical string form of a query identifier.
	///
	/// `key_type` scopes key-operator-value predicates: the key token is
	/// resolved by name against that type in `registry`. Failures are
	/// recoverable responses, never panics; an unknown key or operator is
	/// a `ParseError` naming the offending token, and input that fits no
	/// rule at all is `NoMatchingGrammar`.
	pub fn parse(
		input: &str,
		key_type: &str,
		registry: &KeyRegistry,
	) -> Result<QueryId, ErrorResponse> {
		let input = input.trim();
		if input.is_empty() {
			return Err(ErrorResponse::no_matching_grammar(input));
		}

		if input.eq_ignore_ascii_case("All") {
			return Ok(QueryId::All);
		}
		if input.eq_ignore_ascii_case("CurrentContext") {
			return Ok(QueryId::CurrentContext);
		}

		if let Ok(id) = input.parse::<i64>() {
			// Zero never addresses an entity; let it fall through to the
			// identity-string rule.
			if id != 0 {
				return Ok(QueryId::ById(id));
			}
		}

		let parts: Vec<&str> = input.split_whitespace().collect();
		match parts.as_slice() {
			[single] => Ok(QueryId::ByIdentifier(Arc::from(*single))),
			[key_token, op_token, value @ ..] if !value.is_empty() => {
				let key = match registry.lookup_by_name(key_type, key_token) {
					Ok(entry) => entry,
					Err(LookupError::NotFound(_)) => {
						return Err(ErrorResponse::parse_error(format!(
							"unknown key '{key_token}' in query"
						)));
					}
					Err(LookupError::Fault(_)) => {
						return Err(ErrorResponse::parse_error(format!(
							"ambiguous key '{key_token}' in query"
						)));
					}
				};
				let op = CompareOp::from_token(op_token).ok_or_else(|| {
					ErrorResponse::parse_error(format!("unknown operator '{op_token}' in query"))
				})?;
				Ok(QueryId::KeyOperatorValue {
					key,
					op,
					value: Arc::from(value.join(" ")),
				})
			}
			_ => Err(ErrorResponse::no_matching_grammar(input)),
		}
	}
}
