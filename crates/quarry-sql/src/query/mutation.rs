use super::QueryCompiler;
use crate::{Bindings, Statement};

use quarry_core::{
    schema::app::EntityDefinition,
    stmt::{Row, Value},
    Error, Result,
};

impl QueryCompiler<'_> {
    /// `INSERT INTO t (..) VALUES (..)` for the given column values.
    pub fn compile_insert(&self, entity: &EntityDefinition, values: &Row) -> Result<Statement> {
        let dialect = self.dialect;
        let table = dialect.quote(&entity.name);

        if values.is_empty() {
            return Ok(Statement::new(
                format!("INSERT INTO {table} DEFAULT VALUES"),
                Default::default(),
            ));
        }

        let mut bindings = Bindings::new();
        let mut columns = vec![];
        let mut placeholders = vec![];

        for (name, value) in values.iter() {
            columns.push(dialect.quote(column_name(entity, name)?));
            placeholders.push(bindings.push(value.clone()));
        }

        Ok(Statement::new(
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            ),
            bindings.into_params(),
        ))
    }

    /// `UPDATE t SET .. WHERE id = ..`
    pub fn compile_update(
        &self,
        entity: &EntityDefinition,
        id: &Value,
        values: &Row,
    ) -> Result<Statement> {
        let dialect = self.dialect;
        let id_field = identity(entity)?;

        if values.is_empty() {
            return Err(Error::sql_execution(format!(
                "update of `{}` sets no fields",
                entity.name
            )));
        }

        let mut bindings = Bindings::new();
        let mut assignments = vec![];

        for (name, value) in values.iter() {
            let column = dialect.quote(column_name(entity, name)?);
            assignments.push(format!("{column} = {}", bindings.push(value.clone())));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            dialect.quote(&entity.name),
            assignments.join(", "),
            dialect.quote(id_field),
            bindings.push(id.clone())
        );

        Ok(Statement::new(sql, bindings.into_params()))
    }

    /// `DELETE FROM t WHERE field = ..`
    pub fn compile_delete(
        &self,
        entity: &EntityDefinition,
        field: &str,
        value: &Value,
    ) -> Result<Statement> {
        let dialect = self.dialect;
        let mut bindings = Bindings::new();

        let sql = format!(
            "DELETE FROM {} WHERE {} = {}",
            dialect.quote(&entity.name),
            dialect.quote(column_name(entity, field)?),
            bindings.push(value.clone())
        );

        Ok(Statement::new(sql, bindings.into_params()))
    }

    /// `DELETE FROM t WHERE id = ..`
    pub fn compile_delete_by_id(&self, entity: &EntityDefinition, id: &Value) -> Result<Statement> {
        self.compile_delete(entity, identity(entity)?, id)
    }
}

fn identity(entity: &EntityDefinition) -> Result<&str> {
    entity
        .id_field()
        .map(|field| field.name.as_str())
        .ok_or_else(|| {
            Error::invalid_schema(format!("entity `{}` has no identity field", entity.name))
        })
}

/// The declared column name for `name`, rejecting relation and unknown fields.
fn column_name<'e>(entity: &'e EntityDefinition, name: &str) -> Result<&'e str> {
    match entity.get_field(name) {
        Some(field) if !field.is_relation() => Ok(&field.name),
        Some(_) => Err(Error::sql_execution(format!(
            "relation field `{}.{name}` cannot be written",
            entity.name
        ))),
        None => Err(Error::sql_execution(format!(
            "unknown field `{name}` of `{}`",
            entity.name
        ))),
    }
}
