use async_recursion::async_recursion;
use futures_util::future::try_join_all;
use indexmap::IndexMap;
use quarry_core::{
    schema::{
        app::{EntityDefinition, RelationField},
        ModelRegistry,
    },
    stmt::{Query, Row, Value},
    Error, Executor, Result,
};
use quarry_sql::{Dialect, QueryCompiler};
use serde_json::json;

/// Keys bound into one `IN` list, below the limits of Oracle and SQLite.
pub const MAX_IN_LIST: usize = 500;

/// Attaches related rows to a result set.
///
/// Every relation costs one batched `IN` query per level, however many parent
/// rows there are. Key sets longer than the `IN` list limit are split into
/// several statements of one batch. Sibling relations are fetched
/// concurrently; the first failing branch aborts the whole fetch.
#[derive(Debug)]
pub struct NestedRelationResolver<'a> {
    dialect: &'a Dialect,
    models: &'a ModelRegistry,
    executor: &'a dyn Executor,
    in_list_limit: usize,
}

/// Rows of one relation grouped by foreign key.
struct Fetched<'e> {
    name: String,
    relation: &'e RelationField,
    groups: IndexMap<String, Vec<Row>>,
}

impl<'a> NestedRelationResolver<'a> {
    pub fn new(
        dialect: &'a Dialect,
        models: &'a ModelRegistry,
        executor: &'a dyn Executor,
    ) -> NestedRelationResolver<'a> {
        NestedRelationResolver {
            dialect,
            models,
            executor,
            in_list_limit: MAX_IN_LIST,
        }
    }

    pub fn in_list_limit(mut self, limit: usize) -> Self {
        self.in_list_limit = limit.max(1);
        self
    }

    /// Resolves `relations` of `entity` into `rows`, descending at most
    /// `depth` levels.
    ///
    /// A 1:1 relation becomes a nested row or `Null`; a 1:N relation becomes
    /// a list, empty when nothing matched.
    #[async_recursion]
    pub async fn resolve(
        &self,
        entity: &EntityDefinition,
        rows: &mut [Row],
        relations: &[String],
        depth: usize,
    ) -> Result<()> {
        if depth == 0 || rows.is_empty() {
            return Ok(());
        }

        let mut branches = vec![];
        for name in relations {
            let relation = entity
                .get_field(name)
                .and_then(|field| field.as_relation().map(|relation| (field, relation)));
            let Some((field, relation)) = relation else {
                return Err(Error::sql_execution(format!(
                    "`{name}` is not a relation of `{}`",
                    entity.name
                )));
            };

            let keys = distinct_keys(rows, &relation.local_field);
            branches.push(self.fetch(field.name.clone(), relation, keys, depth));
        }

        for fetched in try_join_all(branches).await? {
            attach(rows, fetched);
        }

        Ok(())
    }

    async fn fetch<'e>(
        &self,
        name: String,
        relation: &'e RelationField,
        keys: Vec<Value>,
        depth: usize,
    ) -> Result<Fetched<'e>> {
        let mut fetched = Fetched {
            name,
            relation,
            groups: IndexMap::new(),
        };
        if keys.is_empty() {
            return Ok(fetched);
        }

        let compiler = QueryCompiler::new(self.dialect, self.models);
        let mut rows = vec![];
        let mut target = None;

        for chunk in keys.chunks(self.in_list_limit) {
            let chunk: Vec<_> = chunk.iter().map(Value::to_json).collect();
            let query = Query::new(&relation.from)
                .filter(json!({ "in": [{ "field": relation.foreign_field }, chunk] }))
                .nested(depth > 1);

            let compiled = compiler.compile(&query)?;
            let statement = &compiled.statement;
            tracing::debug!(
                relation = %fetched.name,
                target = %relation.from,
                keys = chunk.len(),
                "nested fetch"
            );

            rows.extend(
                self.executor
                    .query_for_list(&statement.sql, &statement.params)
                    .await?,
            );
            target = Some(compiled);
        }

        // The next level resolves over every chunk at once
        if let Some(compiled) = target {
            self.resolve(&compiled.entity, &mut rows, &compiled.relations, depth - 1)
                .await?;
        }

        for row in rows {
            let key = row
                .get_ignore_case(&relation.foreign_field)
                .and_then(Value::group_key);
            if let Some(key) = key {
                fetched.groups.entry(key).or_default().push(row);
            }
        }

        Ok(fetched)
    }
}

fn distinct_keys(rows: &[Row], local_field: &str) -> Vec<Value> {
    let mut keys = IndexMap::new();
    for row in rows {
        let Some(value) = row.get_ignore_case(local_field) else {
            continue;
        };
        if let Some(key) = value.group_key() {
            keys.entry(key).or_insert_with(|| value.clone());
        }
    }
    keys.into_values().collect()
}

fn attach(rows: &mut [Row], fetched: Fetched<'_>) {
    let Fetched {
        name,
        relation,
        groups,
    } = fetched;

    for row in rows.iter_mut() {
        let matched = row
            .get_ignore_case(&relation.local_field)
            .and_then(Value::group_key)
            .and_then(|key| groups.get(&key));

        let value = if relation.multiple {
            Value::List(
                matched
                    .into_iter()
                    .flatten()
                    .map(|child| Value::Row(Box::new(child.clone())))
                    .collect(),
            )
        } else {
            matched
                .and_then(|children| children.first())
                .map(|child| Value::Row(Box::new(child.clone())))
                .unwrap_or(Value::Null)
        };

        row.insert(name.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(id: i64, user: Value) -> Row {
        [
            ("id".to_string(), Value::I64(id)),
            ("userId".to_string(), user),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn keys_are_distinct_and_skip_null() {
        let rows = vec![
            row(1, Value::I64(7)),
            row(2, Value::Null),
            row(3, Value::I64(7)),
            row(4, Value::String("9".into())),
        ];

        assert_eq!(
            distinct_keys(&rows, "userid"),
            vec![Value::I64(7), Value::String("9".into())]
        );
    }

    #[test]
    fn attach_defaults_to_null_and_empty() {
        let one = RelationField::one("User", "userId", "id");
        let many = RelationField::many("User", "userId", "id");
        let mut groups = IndexMap::new();
        groups.insert("7".to_string(), vec![row(7, Value::Null)]);

        let mut rows = vec![row(1, Value::I64(7)), row(2, Value::I64(8))];
        attach(
            &mut rows,
            Fetched {
                name: "user".into(),
                relation: &one,
                groups: groups.clone(),
            },
        );
        attach(
            &mut rows,
            Fetched {
                name: "users".into(),
                relation: &many,
                groups,
            },
        );

        assert_eq!(
            rows[0].get("user"),
            Some(&Value::Row(Box::new(row(7, Value::Null))))
        );
        assert_eq!(rows[1].get("user"), Some(&Value::Null));
        assert_eq!(rows[1].get("users"), Some(&Value::List(vec![])));
    }
}
