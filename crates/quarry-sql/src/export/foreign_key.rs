use super::Exporter;
use crate::{
    serializer::{Comma, Formatter, Ident},
    Dialect,
};

use quarry_core::{schema::db::SqlForeignKey, Error, Result};

#[derive(Debug)]
pub struct ForeignKeyExporter<'a> {
    dialect: &'a Dialect,
}

impl<'a> ForeignKeyExporter<'a> {
    pub(super) fn new(dialect: &'a Dialect) -> ForeignKeyExporter<'a> {
        ForeignKeyExporter { dialect }
    }

    fn check_supported(&self, key: &SqlForeignKey) -> Result<()> {
        if self.dialect.capability.alter_foreign_keys {
            Ok(())
        } else {
            Err(Error::dialect(format!(
                "{} cannot alter foreign key `{}` of an existing table",
                self.dialect.name, key.name
            )))
        }
    }
}

impl Exporter for ForeignKeyExporter<'_> {
    type Item = SqlForeignKey;

    fn sql_create_strings(&self, key: &SqlForeignKey) -> Result<Vec<String>> {
        self.check_supported(key)?;

        let mut f = Formatter::new(self.dialect);
        fmt!(
            &mut f,
            "ALTER TABLE ",
            Ident(&key.table),
            " ADD CONSTRAINT ",
            Ident(&key.name),
            " FOREIGN KEY (",
            Comma(key.columns.iter().map(Ident)),
            ") REFERENCES ",
            Ident(&key.referenced_table),
            " (",
            Comma(key.referenced_columns.iter().map(Ident)),
            ")"
        );

        if key.cascade_delete && self.dialect.capability.cascade_delete {
            fmt!(&mut f, " ON DELETE CASCADE");
        }

        Ok(vec![f.finish()])
    }

    fn sql_drop_strings(&self, key: &SqlForeignKey) -> Result<Vec<String>> {
        self.check_supported(key)?;

        let mut f = Formatter::new(self.dialect);
        fmt!(
            &mut f,
            "ALTER TABLE ",
            Ident(&key.table),
            " ",
            self.dialect.capability.drop_foreign_key,
            " ",
            Ident(&key.name)
        );
        Ok(vec![f.finish()])
    }
}
