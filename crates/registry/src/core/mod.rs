//! Core key model: values, identities, key sets, and key handles.

pub mod ident;
pub mod injected;
pub mod key;
pub mod keyset;
pub mod value;

pub use ident::{KeyIdent, KeyOrigin};
pub use injected::{AggregateFn, ComputationRule, InjectedKey, KeyHandle};
pub use key::{Key, TypedKey};
pub use keyset::{KeySet, KeySetDef, KeySetReg};
pub use value::{AccessLevel, KeyValue, ValueKind};
