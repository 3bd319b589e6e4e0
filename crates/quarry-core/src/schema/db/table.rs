use super::{canonical_name, SqlColumn, SqlForeignKey, SqlIndex, SqlUniqueKey};
use crate::{Error, Result};

/// A physical table.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlTable {
    pub name: String,

    pub comment: Option<String>,

    pub columns: Vec<SqlColumn>,

    pub primary_key: Option<SqlPrimaryKey>,

    /// Explicit unique keys. Keys implied by unique columns are derived on
    /// export; see [`SqlTable::implicit_unique_keys`].
    pub unique_keys: Vec<SqlUniqueKey>,

    pub indexes: Vec<SqlIndex>,

    pub foreign_keys: Vec<SqlForeignKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlPrimaryKey {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl SqlTable {
    pub fn new(name: impl Into<String>) -> SqlTable {
        SqlTable {
            name: name.into(),
            comment: None,
            columns: vec![],
            primary_key: None,
            unique_keys: vec![],
            indexes: vec![],
            foreign_keys: vec![],
        }
    }

    /// Adds a column. Names are unique under their canonical form.
    pub fn add_column(&mut self, column: SqlColumn) -> Result<()> {
        if self.column(&column.name).is_some() {
            return Err(Error::invalid_schema(format!(
                "duplicate column `{}` in table `{}`",
                column.name, self.name
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn with_column(mut self, column: SqlColumn) -> Result<Self> {
        self.add_column(column)?;
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Option<&SqlColumn> {
        let canonical = canonical_name(name);
        self.columns
            .iter()
            .find(|column| canonical_name(&column.name) == canonical)
    }

    /// Assigns the primary key. Every key column becomes non-nullable.
    pub fn set_primary_key<I, S>(&mut self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        for name in &columns {
            let canonical = canonical_name(name);
            let Some(column) = self
                .columns
                .iter_mut()
                .find(|column| canonical_name(&column.name) == canonical)
            else {
                return Err(Error::invalid_schema(format!(
                    "primary key column `{}` is not a column of `{}`",
                    name, self.name
                )));
            };
            column.primary_key = true;
            column.nullable = false;
        }

        self.primary_key = Some(SqlPrimaryKey {
            name: None,
            columns,
        });
        Ok(())
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &SqlColumn> + '_ {
        self.columns.iter().filter(|column| column.primary_key)
    }

    /// Unique keys implied by unique, non-primary-key columns.
    pub fn implicit_unique_keys(&self) -> Vec<SqlUniqueKey> {
        self.columns
            .iter()
            .filter(|column| column.unique && !column.primary_key)
            .filter(|column| {
                !self.unique_keys.iter().any(|key| {
                    key.columns.len() == 1
                        && canonical_name(&key.columns[0]) == canonical_name(&column.name)
                })
            })
            .map(|column| SqlUniqueKey::for_column(&self.name, &column.name))
            .collect()
    }

    /// Explicit and implicit unique keys together.
    pub fn all_unique_keys(&self) -> Vec<SqlUniqueKey> {
        let mut keys = self.unique_keys.clone();
        keys.extend(self.implicit_unique_keys());
        keys
    }
}
