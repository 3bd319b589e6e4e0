//! Small building blocks for writing SQL text.

#[macro_use]
mod fmt;
pub(crate) use fmt::ToSql;

mod delim;
pub(crate) use delim::Comma;

mod ident;
pub(crate) use ident::Ident;

use crate::Dialect;

/// Writes SQL fragments for one dialect into a buffer.
pub(crate) struct Formatter<'a> {
    /// Dialect the SQL is written for
    pub(crate) dialect: &'a Dialect,

    /// Where to write the serialized SQL
    pub(crate) dst: String,
}

impl<'a> Formatter<'a> {
    pub(crate) fn new(dialect: &'a Dialect) -> Formatter<'a> {
        Formatter {
            dialect,
            dst: String::new(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.dst
    }
}
