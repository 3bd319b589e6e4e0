use super::{column::write_definition, Exporter};
use crate::{
    dialect::{Comments, Identity},
    serializer::{Comma, Formatter, Ident},
    Dialect,
};

use quarry_core::{schema::db::SqlTable, Error, Result};

#[derive(Debug)]
pub struct TableExporter<'a> {
    dialect: &'a Dialect,
}

impl<'a> TableExporter<'a> {
    pub(super) fn new(dialect: &'a Dialect) -> TableExporter<'a> {
        TableExporter { dialect }
    }

    /// True when the primary key is declared on the identity column itself.
    fn inline_primary_key(&self, table: &SqlTable) -> Result<bool> {
        if self.dialect.capability.identity != Identity::InlinePrimaryKey {
            return Ok(false);
        }

        let mut auto = table.columns.iter().filter(|column| column.auto_increment);
        match (auto.next(), auto.next()) {
            (None, _) => Ok(false),
            (Some(column), None) => match &table.primary_key {
                Some(pk) if pk.columns.len() == 1 && pk.columns[0].eq_ignore_ascii_case(&column.name) => {
                    Ok(true)
                }
                _ => Err(Error::dialect(format!(
                    "{} requires the auto-increment column `{}` to be the whole primary key of `{}`",
                    self.dialect.name, column.name, table.name
                ))),
            },
            (Some(_), Some(_)) => Err(Error::dialect(format!(
                "{} allows at most one auto-increment column; table=`{}`",
                self.dialect.name, table.name
            ))),
        }
    }
}

impl Exporter for TableExporter<'_> {
    type Item = SqlTable;

    fn sql_create_strings(&self, table: &SqlTable) -> Result<Vec<String>> {
        let dialect = self.dialect;
        let inline_pk = self.inline_primary_key(table)?;
        let mut f = Formatter::new(dialect);

        fmt!(&mut f, "CREATE TABLE ", Ident(&table.name), " (");

        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                fmt!(&mut f, ", ");
            }
            write_definition(&mut f, column, inline_pk && column.auto_increment)?;
        }

        match &table.primary_key {
            Some(pk) if !inline_pk => {
                fmt!(&mut f, ", ");
                if let Some(name) = &pk.name {
                    fmt!(&mut f, "CONSTRAINT ", Ident(name), " ");
                }
                fmt!(&mut f, "PRIMARY KEY (", Comma(pk.columns.iter().map(Ident)), ")");
            }
            _ => {}
        }

        // Standalone unique indexes follow the table so they can be dropped
        let keys = table.all_unique_keys();
        let (inline_keys, index_keys) = if dialect.capability.unique_key_as_index {
            (vec![], keys)
        } else {
            (keys, vec![])
        };

        for key in &inline_keys {
            fmt!(
                &mut f,
                ", CONSTRAINT ",
                Ident(&key.name),
                " UNIQUE (",
                Comma(key.columns.iter().map(Ident)),
                ")"
            );
        }

        fmt!(&mut f, ")");

        if let (Some(comment), Comments::Inline) = (&table.comment, dialect.capability.comments) {
            fmt!(&mut f, " COMMENT=", dialect.string_literal(comment));
        }

        let mut out = vec![f.finish()];

        let unique_keys = dialect.unique_key_exporter();
        for key in &index_keys {
            out.extend(unique_keys.sql_create_strings(key)?);
        }

        if dialect.capability.comments == Comments::CommentOn {
            if let Some(comment) = &table.comment {
                out.push(format!(
                    "COMMENT ON TABLE {} IS {}",
                    dialect.quote(&table.name),
                    dialect.string_literal(comment)
                ));
            }

            let columns = dialect.column_exporter(&table.name);
            for column in &table.columns {
                out.extend(columns.sql_comment_strings(column));
            }
        }

        Ok(out)
    }

    fn sql_drop_strings(&self, table: &SqlTable) -> Result<Vec<String>> {
        let capability = &self.dialect.capability;
        let mut f = Formatter::new(self.dialect);

        fmt!(
            &mut f,
            "DROP TABLE ",
            if capability.drop_if_exists { "IF EXISTS " } else { "" },
            Ident(&table.name)
        );
        if let Some(cascade) = capability.cascade_drop {
            fmt!(&mut f, " ", cascade);
        }

        Ok(vec![f.finish()])
    }
}
