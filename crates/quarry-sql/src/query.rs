//! Compilation of structured queries and row mutations to SQL.

mod mutation;
mod select;

use crate::{Dialect, FilterCompiler, Scope};

use quarry_core::{
    schema::{app::EntityDefinition, ModelRegistry},
    stmt::Query,
    Error, Result,
};
use std::sync::Arc;

/// Compiles queries against the entities of a model registry.
#[derive(Debug)]
pub struct QueryCompiler<'a> {
    dialect: &'a Dialect,
    models: &'a ModelRegistry,
}

/// A compiled select together with what the caller needs to post-process its
/// rows.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub statement: crate::Statement,

    /// Primary entity
    pub entity: Arc<EntityDefinition>,

    /// Relation fields of the primary entity to expand after reading
    pub relations: Vec<String>,

    /// Columns selected only to resolve relations, to be removed from the
    /// result rows
    pub hidden: Vec<String>,
}

/// A join with its keys resolved and its clause rendered.
struct ResolvedJoin {
    sql: String,
}

/// The FROM clause shared by select and count.
struct Source {
    entity: Arc<EntityDefinition>,
    scope: Scope,
    joins: Vec<ResolvedJoin>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(dialect: &'a Dialect, models: &'a ModelRegistry) -> QueryCompiler<'a> {
        QueryCompiler { dialect, models }
    }

    pub fn dialect(&self) -> &'a Dialect {
        self.dialect
    }

    fn entity(&self, name: &str) -> Result<Arc<EntityDefinition>> {
        self.models
            .get(name)
            .ok_or_else(|| Error::sql_execution(format!("entity `{name}` is not registered")))
    }

    /// Checks a query before any SQL is produced.
    ///
    /// With a GROUP BY, every projected field outside an aggregate must be
    /// grouped.
    pub fn validate(&self, query: &Query) -> Result<()> {
        if query.group_by.is_empty() {
            return Ok(());
        }

        let Some(projection) = &query.projection else {
            return Ok(());
        };

        for (_, call) in projection.iter() {
            if call.is_aggregate() {
                continue;
            }
            for field in call.fields() {
                let grouped = query
                    .group_by
                    .iter()
                    .any(|group| same_field(&query.entity, group, field));
                if !grouped {
                    return Err(Error::ungrouped_field(field));
                }
            }
        }

        Ok(())
    }

    /// Resolves the primary entity and every join.
    fn source(&self, query: &Query) -> Result<Source> {
        let entity = self.entity(&query.entity)?;
        let mut scope = Scope::new(entity.clone());
        if !query.joins.is_empty() {
            scope = scope.qualified();
        }

        let mut joins = Vec::with_capacity(query.joins.len());

        for join in &query.joins {
            let target = self.entity(&join.from)?;

            let relation = entity.relation_to(&target.name);
            let local = join
                .local_field
                .clone()
                .or_else(|| relation.map(|relation| relation.local_field.clone()));
            let foreign = join
                .foreign_field
                .clone()
                .or_else(|| relation.map(|relation| relation.foreign_field.clone()));

            let (Some(local), Some(foreign)) = (local, foreign) else {
                return Err(Error::sql_execution(format!(
                    "cannot resolve join keys from `{}` to `{}`: no keys given and no relation declared",
                    entity.name, join.from
                )));
            };

            scope.join(&join.alias, target.clone())?;

            let local = scope.column(self.dialect, &local)?;
            let foreign = scope.column(self.dialect, &format!("{}.{foreign}", join.alias))?;

            let mut sql = format!("{} {}", join.ty.as_sql(), self.dialect.quote(&target.name));
            if join.alias != target.name {
                sql.push(' ');
                sql.push_str(&self.dialect.quote(&join.alias));
            }
            sql.push_str(&format!(" ON {local} = {foreign}"));

            if let Some(filter) = &join.filter {
                let within = scope.within(&join.alias);
                let condition = FilterCompiler::inline(self.dialect, &within).compile(filter)?;
                sql.push_str(&format!(" AND ({condition})"));
            }

            joins.push(ResolvedJoin { sql });
        }

        Ok(Source {
            entity,
            scope,
            joins,
        })
    }
}

impl Source {
    /// `FROM t [joins]`
    fn from_clause(&self, dialect: &Dialect) -> String {
        let mut sql = format!("FROM {}", dialect.quote(&self.entity.name));
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.sql);
        }
        sql
    }
}

/// True if `group` and `field` name the same field, allowing either to be
/// qualified with the primary entity name.
fn same_field(entity: &str, group: &str, field: &str) -> bool {
    fn strip<'s>(entity: &str, name: &'s str) -> &'s str {
        match name.split_once('.') {
            Some((alias, field)) if alias.eq_ignore_ascii_case(entity) => field,
            _ => name,
        }
    }

    strip(entity, group).eq_ignore_ascii_case(strip(entity, field))
}

#[cfg(test)]
mod tests {
    use super::same_field;

    #[test]
    fn group_fields_match_qualified_names() {
        assert!(same_field("User", "status", "User.status"));
        assert!(same_field("User", "STATUS", "status"));
        assert!(!same_field("User", "status", "o.status"));
        assert!(same_field("User", "o.status", "o.status"));
    }
}
