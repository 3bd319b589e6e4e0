use crate::Dialect;

use indexmap::IndexMap;
use quarry_core::{
    schema::app::{EntityDefinition, Field},
    Error, Result,
};
use std::sync::Arc;

/// Names visible to the clauses of one statement: the primary entity and
/// every registered join alias.
#[derive(Debug, Clone)]
pub struct Scope {
    primary: Arc<EntityDefinition>,

    /// Qualify primary-entity columns with the table name
    qualified: bool,

    /// Lower-cased alias to (alias as written, joined entity)
    joins: IndexMap<String, (String, Arc<EntityDefinition>)>,

    /// Alias that unqualified names resolve against, instead of the primary
    /// entity
    default_alias: Option<String>,
}

/// A field reference resolved against a [`Scope`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'a> {
    /// Alias to qualify the column with, if any
    pub qualifier: Option<&'a str>,

    pub entity: &'a EntityDefinition,

    pub field: &'a Field,
}

impl Scope {
    pub fn new(primary: Arc<EntityDefinition>) -> Scope {
        Scope {
            primary,
            qualified: false,
            joins: IndexMap::new(),
            default_alias: None,
        }
    }

    pub fn primary(&self) -> &EntityDefinition {
        &self.primary
    }

    /// Qualifies primary-entity columns with the table name.
    pub fn qualified(mut self) -> Scope {
        self.qualified = true;
        self
    }

    /// Registers a join alias. Aliases must be unique and must not shadow the
    /// primary entity.
    pub fn join(&mut self, alias: &str, entity: Arc<EntityDefinition>) -> Result<()> {
        let key = alias.to_ascii_lowercase();
        if self.joins.contains_key(&key) || self.primary.name.eq_ignore_ascii_case(alias) {
            return Err(Error::sql_execution(format!(
                "join alias `{alias}` is already in use"
            )));
        }
        self.joins.insert(key, (alias.to_string(), entity));
        Ok(())
    }

    /// A copy where unqualified names resolve against `alias`.
    pub fn within(&self, alias: &str) -> Scope {
        Scope {
            default_alias: Some(alias.to_ascii_lowercase()),
            ..self.clone()
        }
    }

    /// Resolves `field` or `alias.field`.
    pub fn resolve(&self, name: &str) -> Result<ResolvedField<'_>> {
        let (alias, field_name) = match name.split_once('.') {
            Some((alias, field)) => (Some(alias), field),
            None => (self.default_alias.as_deref(), name),
        };

        let (qualifier, entity) = match alias {
            None => (self.primary_qualifier(), &*self.primary),
            Some(alias) if self.primary.name.eq_ignore_ascii_case(alias) => {
                (Some(self.primary.name.as_str()), &*self.primary)
            }
            Some(alias) => match self.joins.get(&alias.to_ascii_lowercase()) {
                Some((written, entity)) => (Some(written.as_str()), &**entity),
                None => {
                    return Err(Error::sql_execution(format!(
                        "`{name}` references unknown alias `{alias}`"
                    )))
                }
            },
        };

        let Some(field) = entity.get_field(field_name) else {
            return Err(Error::sql_execution(format!(
                "unknown field `{field_name}` of `{}`",
                entity.name
            )));
        };

        Ok(ResolvedField {
            qualifier,
            entity,
            field,
        })
    }

    /// The quoted column expression for `field` or `alias.field`.
    pub fn column(&self, dialect: &Dialect, name: &str) -> Result<String> {
        let resolved = self.resolve(name)?;

        if resolved.field.is_relation() {
            return Err(Error::sql_execution(format!(
                "relation field `{}` of `{}` has no column",
                resolved.field.name, resolved.entity.name
            )));
        }

        Ok(match resolved.qualifier {
            Some(qualifier) => dialect.qualify(qualifier, &resolved.field.name),
            None => dialect.quote(&resolved.field.name),
        })
    }

    fn primary_qualifier(&self) -> Option<&str> {
        self.qualified.then_some(self.primary.name.as_str())
    }
}
