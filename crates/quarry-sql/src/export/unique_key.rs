use super::{index::drop_index, Exporter};
use crate::{
    serializer::{Comma, Formatter, Ident},
    Dialect,
};

use quarry_core::{schema::db::SqlUniqueKey, Result};

#[derive(Debug)]
pub struct UniqueKeyExporter<'a> {
    dialect: &'a Dialect,
}

impl<'a> UniqueKeyExporter<'a> {
    pub(super) fn new(dialect: &'a Dialect) -> UniqueKeyExporter<'a> {
        UniqueKeyExporter { dialect }
    }
}

impl Exporter for UniqueKeyExporter<'_> {
    type Item = SqlUniqueKey;

    fn sql_create_strings(&self, key: &SqlUniqueKey) -> Result<Vec<String>> {
        let mut f = Formatter::new(self.dialect);
        let columns = Comma(key.columns.iter().map(Ident));

        if self.dialect.capability.unique_key_as_index {
            fmt!(
                &mut f,
                "CREATE UNIQUE INDEX ",
                Ident(&key.name),
                " ON ",
                Ident(&key.table),
                " (",
                columns,
                ")"
            );
        } else {
            fmt!(
                &mut f,
                "ALTER TABLE ",
                Ident(&key.table),
                " ADD CONSTRAINT ",
                Ident(&key.name),
                " UNIQUE (",
                columns,
                ")"
            );
        }

        Ok(vec![f.finish()])
    }

    fn sql_drop_strings(&self, key: &SqlUniqueKey) -> Result<Vec<String>> {
        if self.dialect.capability.unique_key_as_index {
            return Ok(vec![drop_index(self.dialect, &key.name, &key.table)]);
        }

        let mut f = Formatter::new(self.dialect);
        fmt!(
            &mut f,
            "ALTER TABLE ",
            Ident(&key.table),
            " ",
            self.dialect.capability.drop_unique_key,
            " ",
            Ident(&key.name)
        );
        Ok(vec![f.finish()])
    }
}
