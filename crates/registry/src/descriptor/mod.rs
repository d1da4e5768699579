//! Key descriptors and their enrichment.
//!
//! A [`Descriptor`] is the declared metadata bag for one key; an
//! [`EnrichedDescriptor`] is the same key after inheritance merging and
//! validator binding. Declared and dynamic keys share both shapes and
//! differ only in provenance.

pub mod def;
#[allow(clippy::module_inception, reason = "descriptor type of the descriptor module")]
pub mod descriptor;
pub(crate) mod enrich;
pub mod entry;

pub use def::{DescriptorDef, DescriptorFields, InheritRef};
pub use descriptor::Descriptor;
pub use entry::EnrichedDescriptor;
