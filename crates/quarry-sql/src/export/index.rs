use super::Exporter;
use crate::{
    serializer::{Comma, Formatter, Ident, ToSql},
    Dialect,
};

use quarry_core::{
    schema::db::SqlIndex,
    stmt::Direction,
    Result,
};

#[derive(Debug)]
pub struct IndexExporter<'a> {
    dialect: &'a Dialect,
}

impl<'a> IndexExporter<'a> {
    pub(super) fn new(dialect: &'a Dialect) -> IndexExporter<'a> {
        IndexExporter { dialect }
    }
}

struct IndexColumn<'a>(&'a (String, Direction));

impl ToSql for IndexColumn<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let (name, direction) = self.0;
        fmt!(f, Ident(name), " ", direction.as_sql());
    }
}

impl Exporter for IndexExporter<'_> {
    type Item = SqlIndex;

    fn sql_create_strings(&self, index: &SqlIndex) -> Result<Vec<String>> {
        let mut f = Formatter::new(self.dialect);
        fmt!(
            &mut f,
            "CREATE ",
            if index.unique { "UNIQUE " } else { "" },
            "INDEX ",
            Ident(&index.name),
            " ON ",
            Ident(&index.table),
            " (",
            Comma(index.columns.iter().map(IndexColumn)),
            ")"
        );
        Ok(vec![f.finish()])
    }

    fn sql_drop_strings(&self, index: &SqlIndex) -> Result<Vec<String>> {
        Ok(vec![drop_index(self.dialect, &index.name, &index.table)])
    }
}

pub(super) fn drop_index(dialect: &Dialect, name: &str, table: &str) -> String {
    let mut f = Formatter::new(dialect);
    if dialect.capability.drop_index_on_table {
        fmt!(&mut f, "DROP INDEX ", Ident(name), " ON ", Ident(table));
    } else {
        fmt!(
            &mut f,
            "DROP INDEX ",
            if dialect.capability.drop_if_exists { "IF EXISTS " } else { "" },
            Ident(name)
        );
    }
    f.finish()
}
