use super::Exporter;
use crate::{
    dialect::Sequences,
    serializer::{Formatter, Ident},
    Dialect,
};

use quarry_core::{
    schema::db::{SqlSequence, TypeCode},
    Result,
};

/// Column of the one-row table backing an emulated sequence.
const NEXT_VAL: &str = "next_val";

#[derive(Debug)]
pub struct SequenceExporter<'a> {
    dialect: &'a Dialect,
}

impl<'a> SequenceExporter<'a> {
    pub(super) fn new(dialect: &'a Dialect) -> SequenceExporter<'a> {
        SequenceExporter { dialect }
    }

    /// Statements producing the next value. The first statement returns the
    /// value; any following statements advance the sequence only while it
    /// still holds the value read, bound as `:p0`.
    pub fn sql_next_value_strings(&self, sequence: &SqlSequence) -> Vec<String> {
        let dialect = self.dialect;
        let name = dialect.quote(&sequence.name);

        match dialect.capability.sequences {
            Sequences::NextValueFor => vec![format!("SELECT NEXT VALUE FOR {name}")],
            Sequences::ValuesNextValueFor => vec![format!("VALUES NEXT VALUE FOR {name}")],
            Sequences::Nextval => vec![format!(
                "SELECT nextval({})",
                dialect.string_literal(&name)
            )],
            Sequences::DotNextval(dummy) => vec![format!("SELECT {name}.NEXTVAL FROM {dummy}")],
            Sequences::Emulated => {
                let column = dialect.quote(NEXT_VAL);
                vec![
                    format!("SELECT {column} FROM {name}"),
                    format!(
                        "UPDATE {name} SET {column} = {column} + {} WHERE {column} = :p0",
                        sequence.increment
                    ),
                ]
            }
        }
    }
}

impl Exporter for SequenceExporter<'_> {
    type Item = SqlSequence;

    fn sql_create_strings(&self, sequence: &SqlSequence) -> Result<Vec<String>> {
        let dialect = self.dialect;

        if dialect.capability.sequences == Sequences::Emulated {
            let ty = dialect.type_name(TypeCode::BigInt, None, None, None)?;
            let mut create = Formatter::new(dialect);
            fmt!(
                &mut create,
                "CREATE TABLE ",
                Ident(&sequence.name),
                " (",
                Ident(NEXT_VAL),
                " ",
                ty,
                " NOT NULL)"
            );

            let mut seed = Formatter::new(dialect);
            fmt!(
                &mut seed,
                "INSERT INTO ",
                Ident(&sequence.name),
                " (",
                Ident(NEXT_VAL),
                ") VALUES (",
                sequence.start,
                ")"
            );

            return Ok(vec![create.finish(), seed.finish()]);
        }

        let mut f = Formatter::new(dialect);
        fmt!(
            &mut f,
            "CREATE SEQUENCE ",
            Ident(&sequence.name),
            " START WITH ",
            sequence.start,
            " INCREMENT BY ",
            sequence.increment
        );
        Ok(vec![f.finish()])
    }

    fn sql_drop_strings(&self, sequence: &SqlSequence) -> Result<Vec<String>> {
        let dialect = self.dialect;
        let object = match dialect.capability.sequences {
            Sequences::Emulated => "DROP TABLE ",
            _ => "DROP SEQUENCE ",
        };

        let mut f = Formatter::new(dialect);
        fmt!(
            &mut f,
            object,
            if dialect.capability.drop_if_exists { "IF EXISTS " } else { "" },
            Ident(&sequence.name)
        );
        Ok(vec![f.finish()])
    }
}
