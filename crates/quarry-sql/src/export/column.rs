use super::Exporter;
use crate::{
    dialect::{AlterColumn, Comments, Identity},
    serializer::{Formatter, Ident},
    Dialect,
};

use quarry_core::{
    schema::db::{ColumnDefault, SqlColumn},
    Error, Result,
};

/// Adds, alters and drops the columns of one table.
#[derive(Debug)]
pub struct ColumnExporter<'a> {
    dialect: &'a Dialect,
    table: &'a str,
}

impl<'a> ColumnExporter<'a> {
    pub(super) fn new(dialect: &'a Dialect, table: &'a str) -> ColumnExporter<'a> {
        ColumnExporter { dialect, table }
    }

    /// Statements changing an existing column to match `column`.
    pub fn sql_alter_strings(&self, column: &SqlColumn) -> Result<Vec<String>> {
        let dialect = self.dialect;
        let table = Ident(self.table);
        let name = Ident(&column.name);
        let mut f = Formatter::new(dialect);

        let mut out = match dialect.capability.alter_column {
            AlterColumn::Modify => {
                fmt!(&mut f, "ALTER TABLE ", table, " MODIFY COLUMN ");
                write_definition(&mut f, column, false)?;
                vec![f.finish()]
            }
            AlterColumn::ModifyParenthesized => {
                let ty = dialect.column_type(column)?;
                fmt!(&mut f, "ALTER TABLE ", table, " MODIFY (", name, " ", ty);
                write_default(&mut f, column);
                fmt!(&mut f, if column.nullable { " NULL)" } else { " NOT NULL)" });
                vec![f.finish()]
            }
            AlterColumn::AlterColumn => {
                // Defaults are named constraints here, replaced around the alter
                let ty = dialect.column_type(column)?;
                fmt!(
                    &mut f,
                    "ALTER TABLE ",
                    table,
                    " ALTER COLUMN ",
                    name,
                    " ",
                    ty,
                    if column.nullable { " NULL" } else { " NOT NULL" }
                );
                let mut out = vec![self.drop_default_string(column), f.finish()];
                if let Some(default) = &column.default {
                    out.push(format!(
                        "ALTER TABLE {} ADD DEFAULT {} FOR {}",
                        dialect.quote(self.table),
                        default_sql(dialect, default),
                        dialect.quote(&column.name)
                    ));
                }
                out
            }
            AlterColumn::AlterType | AlterColumn::SetDataType => {
                let prefix = format!(
                    "ALTER TABLE {} ALTER COLUMN {}",
                    dialect.quote(self.table),
                    dialect.quote(&column.name)
                );
                let set_type = match dialect.capability.alter_column {
                    AlterColumn::SetDataType => "SET DATA TYPE",
                    _ => "TYPE",
                };
                let nullability = if column.nullable {
                    "DROP NOT NULL"
                } else {
                    "SET NOT NULL"
                };
                let default = match &column.default {
                    Some(default) => format!("SET DEFAULT {}", default_sql(dialect, default)),
                    None => "DROP DEFAULT".to_string(),
                };

                vec![
                    format!("{prefix} {set_type} {}", dialect.column_type(column)?),
                    format!("{prefix} {nullability}"),
                    format!("{prefix} {default}"),
                ]
            }
            AlterColumn::Unsupported => {
                return Err(Error::dialect(format!(
                    "{} cannot alter column `{}.{}`",
                    dialect.name, self.table, column.name
                )))
            }
        };

        out.extend(self.sql_comment_strings(column));
        Ok(out)
    }

    /// Drops the named default constraint of a column, if it has one.
    fn drop_default_string(&self, column: &SqlColumn) -> String {
        let table = self.dialect.quote(self.table);
        format!(
            "DECLARE @sql NVARCHAR(MAX); \
             SELECT @sql = 'ALTER TABLE {table} DROP CONSTRAINT ' + QUOTENAME(dc.name) \
             FROM sys.default_constraints dc \
             JOIN sys.columns c ON dc.parent_object_id = c.object_id AND dc.parent_column_id = c.column_id \
             WHERE dc.parent_object_id = OBJECT_ID({}) AND c.name = {}; \
             IF @sql IS NOT NULL EXEC sp_executesql @sql",
            self.dialect.string_literal(&table),
            self.dialect.string_literal(&column.name),
        )
    }

    /// `COMMENT ON COLUMN` for dialects that keep comments out of line.
    pub fn sql_comment_strings(&self, column: &SqlColumn) -> Vec<String> {
        match (&column.comment, self.dialect.capability.comments) {
            (Some(comment), Comments::CommentOn) => vec![format!(
                "COMMENT ON COLUMN {} IS {}",
                self.dialect.qualify(self.table, &column.name),
                self.dialect.string_literal(comment)
            )],
            _ => vec![],
        }
    }
}

impl Exporter for ColumnExporter<'_> {
    type Item = SqlColumn;

    fn sql_create_strings(&self, column: &SqlColumn) -> Result<Vec<String>> {
        let mut f = Formatter::new(self.dialect);
        let add = match self.dialect.capability.alter_column {
            AlterColumn::ModifyParenthesized => " ADD (",
            AlterColumn::AlterColumn => " ADD ",
            _ => " ADD COLUMN ",
        };

        fmt!(&mut f, "ALTER TABLE ", Ident(self.table), add);
        write_definition(&mut f, column, false)?;
        if self.dialect.capability.alter_column == AlterColumn::ModifyParenthesized {
            fmt!(&mut f, ")");
        }

        let mut out = vec![f.finish()];
        out.extend(self.sql_comment_strings(column));
        Ok(out)
    }

    fn sql_drop_strings(&self, column: &SqlColumn) -> Result<Vec<String>> {
        let dialect = self.dialect;
        let table = dialect.quote(self.table);
        let name = dialect.quote(&column.name);
        let mut out = vec![];

        if dialect.capability.drop_column_default_first {
            out.push(self.drop_default_string(column));
        }

        out.push(match dialect.capability.alter_column {
            AlterColumn::ModifyParenthesized => format!("ALTER TABLE {table} DROP ({name})"),
            _ => format!("ALTER TABLE {table} DROP COLUMN {name}"),
        });

        Ok(out)
    }
}

/// Writes `name type [identity] [DEFAULT ..] [NOT NULL] [COMMENT ..]`.
///
/// With `inline_primary_key` an identity column is declared as the table's
/// primary key in place, as SQLite requires.
pub(super) fn write_definition(
    f: &mut Formatter<'_>,
    column: &SqlColumn,
    inline_primary_key: bool,
) -> Result<()> {
    let dialect = f.dialect;
    let ty = dialect.column_type(column)?;
    fmt!(f, Ident(&column.name), " ", ty);

    if column.auto_increment {
        match dialect.capability.identity {
            Identity::Suffix(suffix) => fmt!(f, " ", suffix),
            Identity::InlinePrimaryKey if inline_primary_key => {
                fmt!(f, " PRIMARY KEY AUTOINCREMENT");
                return Ok(());
            }
            Identity::InlinePrimaryKey => {
                return Err(Error::dialect(format!(
                    "{} supports auto-increment only on a single-column primary key; column=`{}`",
                    dialect.name, column.name
                )))
            }
            Identity::SerialType(_) => {}
        }
    } else {
        write_default(f, column);
    }

    if !column.nullable {
        fmt!(f, " NOT NULL");
    }

    if let (Some(comment), Comments::Inline) = (&column.comment, dialect.capability.comments) {
        let comment = dialect.string_literal(comment);
        fmt!(f, " COMMENT ", comment);
    }

    Ok(())
}

fn write_default(f: &mut Formatter<'_>, column: &SqlColumn) {
    if let Some(default) = &column.default {
        let default = default_sql(f.dialect, default);
        fmt!(f, " DEFAULT ", default);
    }
}

fn default_sql(dialect: &Dialect, default: &ColumnDefault) -> String {
    match default {
        ColumnDefault::Value(value) => dialect.literal(value),
        ColumnDefault::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
    }
}
