//! Value validation and parsing.
//!
//! Every enriched descriptor carries a [`ValidatorParser`] that converts a
//! raw string into a typed value or a structured error. Malformed input is
//! never a panic; it comes back as a [`ParseResult`] holding an
//! [`ErrorResponse`]. Validator behavior is data (a [`ValidatorKind`]), so
//! descriptors stay inspectable and enrichment stays reproducible.

use std::sync::Arc;

use crate::core::ValueKind;
use crate::error::{ErrorResponse, ResultCode};

/// Custom validator hook a declaration may supply.
pub type ValidatorFn = fn(&str) -> Result<ParsedValue, String>;

/// A parsed, typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
	Bool(bool),
	Int(i64),
	Text(String),
}

impl ParsedValue {
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			ParsedValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			ParsedValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			ParsedValue::Text(v) => Some(v),
			_ => None,
		}
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			ParsedValue::Bool(_) => "bool",
			ParsedValue::Int(_) => "int",
			ParsedValue::Text(_) => "text",
		}
	}
}

/// Outcome of a validation: exactly one of a typed value or an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
	Parsed(ParsedValue),
	Rejected(ErrorResponse),
}

impl ParseResult {
	pub fn is_ok(&self) -> bool {
		matches!(self, ParseResult::Parsed(_))
	}

	pub fn value(&self) -> Option<&ParsedValue> {
		match self {
			ParseResult::Parsed(v) => Some(v),
			ParseResult::Rejected(_) => None,
		}
	}

	pub fn error(&self) -> Option<&ErrorResponse> {
		match self {
			ParseResult::Parsed(_) => None,
			ParseResult::Rejected(e) => Some(e),
		}
	}

	pub fn into_result(self) -> Result<ParsedValue, ErrorResponse> {
		match self {
			ParseResult::Parsed(v) => Ok(v),
			ParseResult::Rejected(e) => Err(e),
		}
	}
}

/// How a validator decides; kept as data so enrichment output is
/// inspectable and reproducible.
#[derive(Clone)]
pub enum ValidatorKind {
	/// Signed integer within an inclusive range.
	IntRange { min: i64, max: i64 },
	/// Boolean in its common string spellings.
	BoolForms,
	/// Non-empty text.
	NonEmptyText,
	/// Membership in the key's sample values (case-insensitive).
	OneOf(Arc<[Arc<str>]>),
	/// Declaration-supplied hook.
	Custom(ValidatorFn),
	/// No constraint; the raw string passes through as text.
	Passthrough,
}

impl core::fmt::Debug for ValidatorKind {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			ValidatorKind::IntRange { min, max } => {
				f.debug_struct("IntRange").field("min", min).field("max", max).finish()
			}
			ValidatorKind::BoolForms => f.write_str("BoolForms"),
			ValidatorKind::NonEmptyText => f.write_str("NonEmptyText"),
			ValidatorKind::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
			ValidatorKind::Custom(_) => f.write_str("Custom(..)"),
			ValidatorKind::Passthrough => f.write_str("Passthrough"),
		}
	}
}

/// Validator bound to one key during enrichment.
#[derive(Debug, Clone)]
pub struct ValidatorParser {
	key_name: Arc<str>,
	kind: ValidatorKind,
}

impl ValidatorParser {
	pub fn new(key_name: impl Into<Arc<str>>, kind: ValidatorKind) -> Self {
		Self {
			key_name: key_name.into(),
			kind,
		}
	}

	/// Default validator for a value kind, used when a declaration supplies
	/// neither a custom hook nor sample values.
	pub fn for_kind(key_name: impl Into<Arc<str>>, kind: ValueKind) -> Self {
		let kind = match kind {
			ValueKind::Bool => ValidatorKind::BoolForms,
			ValueKind::Int => ValidatorKind::IntRange {
				min: i64::MIN,
				max: i64::MAX,
			},
			ValueKind::Text => ValidatorKind::NonEmptyText,
			ValueKind::Opaque => ValidatorKind::Passthrough,
		};
		Self::new(key_name, kind)
	}

	pub fn kind(&self) -> &ValidatorKind {
		&self.kind
	}

	pub fn key_name(&self) -> &str {
		&self.key_name
	}

	/// Converts a raw string into a typed value or a structured error.
	/// Never panics on malformed input.
	pub fn validate(&self, raw: &str) -> ParseResult {
		let key = &self.key_name;
		match &self.kind {
			ValidatorKind::IntRange { min, max } => match parse_int(raw) {
				Ok(v) if (*min..=*max).contains(&v) => ParseResult::Parsed(ParsedValue::Int(v)),
				Ok(v) => ParseResult::Rejected(ErrorResponse::parse_error(format!(
					"value {v} for {key} is out of range {min}..={max}"
				))),
				Err(reason) => ParseResult::Rejected(ErrorResponse::parse_error(format!(
					"{reason} for {key}"
				))),
			},
			ValidatorKind::BoolForms => match parse_bool(raw) {
				Ok(v) => ParseResult::Parsed(ParsedValue::Bool(v)),
				Err(reason) => ParseResult::Rejected(ErrorResponse::parse_error(format!(
					"{reason} for {key}"
				))),
			},
			ValidatorKind::NonEmptyText => {
				if raw.trim().is_empty() {
					ParseResult::Rejected(ErrorResponse::new(
						ResultCode::ValidationFailed,
						format!("{key} requires non-empty text"),
					))
				} else {
					ParseResult::Parsed(ParsedValue::Text(raw.to_string()))
				}
			}
			ValidatorKind::OneOf(values) => {
				if values.iter().any(|v| v.eq_ignore_ascii_case(raw)) {
					ParseResult::Parsed(ParsedValue::Text(raw.to_string()))
				} else {
					ParseResult::Rejected(ErrorResponse::parse_error(format!(
						"{raw:?} is not a known value for {key}"
					)))
				}
			}
			ValidatorKind::Custom(hook) => match hook(raw) {
				Ok(v) => ParseResult::Parsed(v),
				Err(reason) => ParseResult::Rejected(ErrorResponse::new(
					ResultCode::ValidationFailed,
					format!("invalid value for {key}: {reason}"),
				)),
			},
			ValidatorKind::Passthrough => ParseResult::Parsed(ParsedValue::Text(raw.to_string())),
		}
	}
}

/// Parse a boolean value from common string representations.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(format!(
			"invalid boolean: '{value}' (expected true/false, yes/no, on/off, 1/0)"
		)),
	}
}

/// Parse an integer value.
pub fn parse_int(value: &str) -> Result<i64, String> {
	value
		.trim()
		.parse::<i64>()
		.map_err(|_| format!("invalid integer: '{value}'"))
}
