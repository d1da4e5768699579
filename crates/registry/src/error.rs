//! Failure taxonomies for the key registry.
//!
//! Two classes, kept apart on purpose:
//!
//! - [`RegistryFault`] covers programming-defect faults in the static key
//!   configuration (wrong payload type, inheritance cycle, duplicate or
//!   ambiguous identity). These abort the operation with full diagnostic
//!   context and are never converted into response data.
//! - [`ErrorResponse`] is the only shape returned to callers for
//!   recoverable user-input failures (unknown key, unparseable query,
//!   rejected value). These are plain data; the caller decides whether to
//!   retry with corrected input.
//!
//! [`LookupError`] is the one seam where both classes meet: name lookup can
//! fail recoverably (nothing under that name) or fatally (the name is
//! genuinely ambiguous).

use serde::{Deserialize, Serialize};

/// Fatal faults in the static configuration of keys and descriptors.
///
/// A fault means the caller's key declarations are wrong, not that the user
/// typed something invalid. Faults propagate unchanged; nothing in this
/// crate retries or wraps them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryFault {
	/// A descriptor's raw payload does not match its origin's expected
	/// key-value type.
	#[error("type mismatch for {ident}: expected {expected}, got {actual}")]
	TypeMismatch {
		ident: String,
		expected: &'static str,
		actual: &'static str,
	},

	/// The inheritance chain starting at a key loops back on itself.
	#[error("inheritance cycle: {path}")]
	InheritanceCycle { path: String },

	/// A descriptor names an inherit-from ancestor that is not registered
	/// and not part of the same registration batch.
	#[error("unknown ancestor {ancestor} referenced by {ident}")]
	UnknownAncestor { ident: String, ancestor: String },

	/// The key identity is already registered.
	#[error("duplicate key: {ident}")]
	DuplicateKey { ident: String },

	/// A name lookup matched several keys and the declared-wins precedence
	/// rule could not single one out.
	#[error("ambiguous key name {name:?} for type {key_type}: candidates {candidates:?}")]
	AmbiguousKey {
		key_type: String,
		name: String,
		candidates: Vec<String>,
	},

	/// An injected key was handed to a persistence-facing operation. Its
	/// value is produced by an external injector, never stored directly.
	#[error("{ident} is not directly settable; its value is computed by an injector")]
	NotDirectlySettable { ident: String },

	/// A computation rule attached to an injected key is structurally
	/// invalid (unresolvable source key, empty template, missing target).
	#[error("invalid computation rule on {ident}: {reason}")]
	InvalidComputationRule { ident: String, reason: String },
}

/// Result-code enumerants carried by [`ErrorResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
	/// No key registered under the requested identity or name.
	UnknownKey,
	/// Query input matched none of the grammar rules.
	NoMatchingGrammar,
	/// Input matched a grammar rule but a token inside it is invalid.
	ParseError,
	/// A validator rejected an otherwise well-formed value.
	ValidationFailed,
}

impl ResultCode {
	/// Stable wire name of the code.
	pub fn as_str(self) -> &'static str {
		match self {
			ResultCode::UnknownKey => "UnknownKey",
			ResultCode::NoMatchingGrammar => "NoMatchingGrammar",
			ResultCode::ParseError => "ParseError",
			ResultCode::ValidationFailed => "ValidationFailed",
		}
	}
}

impl core::fmt::Display for ResultCode {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Recoverable failure surfaced to callers as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub code: ResultCode,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
		}
	}

	/// Unknown-key response, optionally carrying a near-miss suggestion.
	pub fn unknown_key(what: impl core::fmt::Display, suggestion: Option<&str>) -> Self {
		let message = match suggestion {
			Some(s) => format!("unknown key: {what} (did you mean {s:?}?)"),
			None => format!("unknown key: {what}"),
		};
		Self::new(ResultCode::UnknownKey, message)
	}

	pub fn parse_error(message: impl Into<String>) -> Self {
		Self::new(ResultCode::ParseError, message)
	}

	pub fn no_matching_grammar(input: &str) -> Self {
		Self::new(
			ResultCode::NoMatchingGrammar,
			format!("no query grammar matches input {input:?}"),
		)
	}
}

impl core::fmt::Display for ErrorResponse {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}: {}", self.code, self.message)
	}
}

impl std::error::Error for ErrorResponse {}

/// Outcome of a name lookup, which is the only operation that can fail in
/// either taxonomy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
	/// Nothing registered under the name; recoverable.
	#[error(transparent)]
	NotFound(ErrorResponse),

	/// The name is ambiguous; a configuration defect.
	#[error(transparent)]
	Fault(#[from] RegistryFault),
}

impl LookupError {
	/// Returns the recoverable response, if this is the recoverable side.
	pub fn as_response(&self) -> Option<&ErrorResponse> {
		match self {
			LookupError::NotFound(resp) => Some(resp),
			LookupError::Fault(_) => None,
		}
	}
}
