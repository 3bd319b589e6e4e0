//! Logical entity definitions.
//!
//! Entities are declared at runtime, either through the builder methods here
//! or by deserializing the JSON schema description produced by an import
//! loader. They are independent of any SQL dialect; see [`super::db`] for the
//! physical mirror.

mod entity;
pub use entity::EntityDefinition;

mod field;
pub use field::{DefaultValue, Field, FieldKind, FieldType, GeneratedValue};

mod index;
pub use index::{IndexDefinition, IndexField};

mod relation;
pub use relation::RelationField;

/// Stable 64-bit FNV-1a digest, used to derive index names from their
/// content. Names must not change between runs or toolchain versions.
pub(crate) fn content_hash(parts: &[&str]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0)) {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}
