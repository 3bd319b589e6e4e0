//! Dialect-agnostic structural descriptors of physical schema objects.
//!
//! DDL exporters in `quarry-sql` render these into statements for a given
//! dialect.

mod column;
pub use column::{ColumnDefault, SqlColumn};

mod foreign_key;
pub use foreign_key::SqlForeignKey;

mod index;
pub use index::SqlIndex;

mod mapping;

mod sequence;
pub use sequence::SqlSequence;

mod table;
pub use table::{SqlPrimaryKey, SqlTable};

mod ty;
pub use ty::TypeCode;

mod unique_key;
pub use unique_key::SqlUniqueKey;

/// Canonical form of an identifier used for case-insensitive comparisons.
pub fn canonical_name(name: &str) -> String {
    name.to_ascii_lowercase()
}
