//! DDL exporters.
//!
//! Each exporter turns one structural descriptor into an ordered list of
//! statements for its dialect. Callers run the statements strictly in the
//! returned order; some dialects need several statements for one logical
//! change.

mod column;
pub use column::ColumnExporter;

mod foreign_key;
pub use foreign_key::ForeignKeyExporter;

mod index;
pub use index::IndexExporter;

mod sequence;
pub use sequence::SequenceExporter;

mod table;
pub use table::TableExporter;

mod unique_key;
pub use unique_key::UniqueKeyExporter;

use crate::Dialect;
use quarry_core::Result;

pub trait Exporter {
    type Item: ?Sized;

    /// Statements creating `item`.
    fn sql_create_strings(&self, item: &Self::Item) -> Result<Vec<String>>;

    /// Statements dropping `item`.
    fn sql_drop_strings(&self, item: &Self::Item) -> Result<Vec<String>>;
}

impl Dialect {
    pub fn table_exporter(&self) -> TableExporter<'_> {
        TableExporter::new(self)
    }

    /// Exports columns of `table`.
    pub fn column_exporter<'a>(&'a self, table: &'a str) -> ColumnExporter<'a> {
        ColumnExporter::new(self, table)
    }

    pub fn index_exporter(&self) -> IndexExporter<'_> {
        IndexExporter::new(self)
    }

    pub fn unique_key_exporter(&self) -> UniqueKeyExporter<'_> {
        UniqueKeyExporter::new(self)
    }

    pub fn foreign_key_exporter(&self) -> ForeignKeyExporter<'_> {
        ForeignKeyExporter::new(self)
    }

    pub fn sequence_exporter(&self) -> SequenceExporter<'_> {
        SequenceExporter::new(self)
    }
}
