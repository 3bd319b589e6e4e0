use crate::{generate, Config, NestedRelationResolver, SchemaSynchronizer};

use async_recursion::async_recursion;
use quarry_core::{
    schema::{
        app::{DefaultValue, EntityDefinition, FieldType, GeneratedValue, RelationField},
        db::SqlSequence,
        ModelRegistry,
    },
    driver::Params,
    stmt::{Page, Query, Row, Value},
    Error, Executor, Result, TypeHandlerRegistry,
};
use quarry_sql::{CompiledQuery, Dialect, QueryCompiler, Statement};
use serde_json::json;
use std::{collections::HashSet, sync::Arc};

/// A record as seen by callers: field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Bound on how many levels of `cascade_delete` relations one delete follows.
const MAX_CASCADE_DEPTH: usize = 16;

/// Reads of an emulated sequence before giving up on a contended advance.
const SEQUENCE_ATTEMPTS: usize = 16;

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<Record>,

    /// Rows matching the query across all pages
    pub total: u64,

    pub number: u64,

    pub size: u64,
}

/// A unit of work bound to one executor.
///
/// Reads take `&self`; schema changes and writes take `&mut self`, so a
/// session is used by one caller at a time. Compilation errors are raised
/// before anything reaches the executor.
#[derive(Debug)]
pub struct Session {
    config: Config,
    dialect: Arc<Dialect>,
    models: Arc<ModelRegistry>,
    handlers: Arc<TypeHandlerRegistry>,
    executor: Box<dyn Executor>,
}

impl Session {
    pub(crate) fn new(
        config: Config,
        dialect: Arc<Dialect>,
        models: Arc<ModelRegistry>,
        handlers: Arc<TypeHandlerRegistry>,
        executor: Box<dyn Executor>,
    ) -> Session {
        Session {
            config,
            dialect,
            models,
            handlers,
            executor,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn executor(&self) -> &dyn Executor {
        &*self.executor
    }

    pub fn is_failsafe(&self) -> bool {
        self.config.failsafe
    }

    /// Switches failsafe mode for the schema operations of this session.
    pub fn set_failsafe(&mut self, failsafe: bool) {
        self.config.failsafe = failsafe;
    }

    fn compiler(&self) -> QueryCompiler<'_> {
        QueryCompiler::new(&self.dialect, &self.models)
    }

    fn synchronizer(&self) -> SchemaSynchronizer<'_> {
        SchemaSynchronizer::new(&self.dialect, &self.models, &*self.executor)
            .failsafe(self.config.failsafe)
    }

    fn entity(&self, name: &str) -> Result<Arc<EntityDefinition>> {
        self.models
            .get(name)
            .ok_or_else(|| Error::sql_execution(format!("entity `{name}` is not registered")))
    }

    // ===== schema =====

    /// Creates or reconciles the table of one entity.
    pub async fn register(&mut self, entity: EntityDefinition) -> Result<()> {
        self.synchronizer().sync(entity).await
    }

    /// Synchronizes entities one after another, in the given order.
    pub async fn sync_schema(
        &mut self,
        entities: impl IntoIterator<Item = EntityDefinition>,
    ) -> Result<()> {
        let entities: Vec<_> = entities.into_iter().collect();
        let synchronizer = self.synchronizer();
        for entity in entities {
            synchronizer.sync(entity).await?;
        }
        Ok(())
    }

    pub async fn drop_model(&mut self, name: &str) -> Result<()> {
        self.synchronizer().drop_model(name).await
    }

    pub async fn drop_field(&mut self, entity: &str, field: &str) -> Result<()> {
        self.synchronizer().drop_field(entity, field).await
    }

    pub async fn drop_index(&mut self, entity: &str, index: &str) -> Result<()> {
        self.synchronizer().drop_index(entity, index).await
    }

    pub async fn create_sequence(&mut self, sequence: SqlSequence) -> Result<()> {
        self.synchronizer().create_sequence(&sequence).await
    }

    pub async fn drop_sequence(&mut self, name: &str) -> Result<()> {
        self.synchronizer().drop_sequence(name).await
    }

    /// Returns the next value of a sequence and advances it.
    pub async fn next_sequence_value(&mut self, name: &str) -> Result<i64> {
        let sequence = SqlSequence::new(name);
        let statements = self
            .dialect
            .sequence_exporter()
            .sql_next_value_strings(&sequence);

        let Some((select, advance)) = statements.split_first() else {
            return Err(Error::sql_execution(format!(
                "no next-value statement for sequence `{name}`"
            )));
        };

        for _ in 0..SEQUENCE_ATTEMPTS {
            let value = self
                .executor
                .query_for_scalar(select, &Params::default())
                .await?;
            let Some(current) = value.as_i64() else {
                return Err(Error::type_conversion(value, "i64"));
            };

            // Emulated sequences advance only from the value just read
            let mut params = Params::new();
            params.insert("p0".to_string(), Value::I64(current));
            let mut claimed = true;
            for sql in advance {
                if self.executor.update(sql, &params).await? == 0 {
                    claimed = false;
                    break;
                }
            }

            if claimed {
                return Ok(current);
            }
            tracing::debug!(sequence = name, current, "sequence advanced concurrently, retrying");
        }

        Err(Error::sql_execution(format!(
            "sequence `{name}` kept advancing concurrently"
        )))
    }

    // ===== writes =====

    /// Inserts one record and returns it as stored, generated values
    /// included.
    ///
    /// Absent fields take their generated value or literal default. An
    /// auto-increment identity is read back from the executor's generated
    /// keys.
    pub async fn insert(&mut self, entity: &str, record: Record) -> Result<Record> {
        let entity = self.entity(entity)?;
        let mut row = self.to_row(&entity, &record)?;
        let mut auto_increment = None;

        for field in entity.columns() {
            if row.get(&field.name).is_some_and(|value| !value.is_null()) {
                continue;
            }

            match (field.generated_value(), &field.default) {
                (Some(GeneratedValue::AutoIncrement), _) => {
                    row.remove(&field.name);
                    auto_increment = Some(field);
                }
                (Some(generated), _) => {
                    if let Some(value) = generate::generated_value(generated) {
                        row.insert(field.name.clone(), value);
                    }
                }
                (None, Some(DefaultValue::Literal(default))) if !row.contains(&field.name) => {
                    let value = self.handlers.to_param(&field.ty, default)?;
                    row.insert(field.name.clone(), value);
                }
                _ => {}
            }
        }

        let statement = self.compiler().compile_insert(&entity, &row)?;
        let keys = self
            .executor
            .update_and_return_generated_keys(&statement.sql, &statement.params)
            .await
            .map_err(|err| self.translate(err))?;

        if let (Some(field), Some(key)) = (auto_increment, keys.key) {
            row.insert(field.name.clone(), key);
        }
        tracing::debug!(entity = %entity.name, rows = keys.rows_affected, "insert");

        let stored: Row = entity
            .columns()
            .filter_map(|field| {
                row.remove(&field.name)
                    .map(|value| (field.name.clone(), value))
            })
            .collect();
        self.to_record(&entity, stored)
    }

    /// Updates the fields present in `changes` on one row. Returns the number
    /// of rows affected.
    pub async fn update_by_id(
        &mut self,
        entity: &str,
        id: &serde_json::Value,
        changes: Record,
    ) -> Result<u64> {
        let entity = self.entity(entity)?;
        let id = self.id_param(&entity, id)?;
        let row = self.to_row(&entity, &changes)?;

        let statement = self.compiler().compile_update(&entity, &id, &row)?;
        self.update(&statement).await
    }

    /// Deletes one row, and first the rows of every relation flagged
    /// `cascade_delete`.
    pub async fn delete_by_id(&mut self, entity: &str, id: &serde_json::Value) -> Result<u64> {
        let entity = self.entity(entity)?;
        let id = self.id_param(&entity, id)?;
        let Some(id_field) = entity.id_field() else {
            return Err(Error::invalid_schema(format!(
                "entity `{}` has no identity field",
                entity.name
            )));
        };

        self.delete_where(&entity, &id_field.name, id, MAX_CASCADE_DEPTH)
            .await
    }

    #[async_recursion]
    async fn delete_where(
        &self,
        entity: &EntityDefinition,
        field: &str,
        value: Value,
        depth: usize,
    ) -> Result<u64> {
        let cascades: Vec<&RelationField> = entity
            .relations()
            .map(|(_, relation)| relation)
            .filter(|relation| relation.cascade_delete)
            .collect();

        if !cascades.is_empty() {
            if depth == 0 {
                return Err(Error::sql_execution(format!(
                    "cascade delete from `{}` nests deeper than {MAX_CASCADE_DEPTH} levels",
                    entity.name
                )));
            }

            let query =
                Query::new(&entity.name).filter(json!({ "==": [{ "field": field }, value.to_json()] }));
            let compiled = self.compiler().compile(&query)?;
            let parents = self
                .executor
                .query_for_list(&compiled.statement.sql, &compiled.statement.params)
                .await?;

            for relation in cascades {
                let target = self.entity(&relation.from)?;
                let mut seen = HashSet::new();

                for parent in &parents {
                    let Some(key) = parent.get_ignore_case(&relation.local_field) else {
                        continue;
                    };
                    if key.group_key().is_some_and(|group| seen.insert(group)) {
                        self.delete_where(&target, &relation.foreign_field, key.clone(), depth - 1)
                            .await?;
                    }
                }
            }
        }

        let statement = self.compiler().compile_delete(entity, field, &value)?;
        let deleted = self.update(&statement).await?;
        tracing::debug!(entity = %entity.name, field, deleted, "delete");
        Ok(deleted)
    }

    async fn update(&self, statement: &Statement) -> Result<u64> {
        self.executor
            .update(&statement.sql, &statement.params)
            .await
            .map_err(|err| self.translate(err))
    }

    /// Names the violated constraint when the driver reports a duplicate key.
    fn translate(&self, err: Error) -> Error {
        let constraint = err
            .driver_message()
            .and_then(|message| self.dialect.translate_duplicate_key(&message));

        match constraint {
            Some(name) => err.context(Error::constraint_violation(name)),
            None => err,
        }
    }

    // ===== reads =====

    /// Runs a query. Relations are resolved when the query enables nesting.
    pub async fn query(&self, query: &Query) -> Result<Vec<Record>> {
        let CompiledQuery {
            statement,
            entity,
            relations,
            hidden,
        } = self.compiler().compile(query)?;

        let mut rows = self
            .executor
            .query_for_list(&statement.sql, &statement.params)
            .await?;

        if !relations.is_empty() {
            NestedRelationResolver::new(&self.dialect, &self.models, &*self.executor)
                .resolve(&entity, &mut rows, &relations, self.config.max_depth)
                .await?;
        }

        rows.into_iter()
            .map(|mut row| {
                for column in &hidden {
                    row.remove_ignore_case(column);
                }
                self.to_record(&entity, row)
            })
            .collect()
    }

    /// The first record of a query, if any. Queries without a page fetch a
    /// single row.
    pub async fn query_one(&self, query: &Query) -> Result<Option<Record>> {
        if query.page.is_some() {
            return Ok(self.query(query).await?.into_iter().next());
        }

        let query = query.clone().page(1, 1);
        Ok(self.query(&query).await?.into_iter().next())
    }

    /// Counts the rows, or the groups, a query matches. Sort and page are
    /// ignored.
    pub async fn count(&self, query: &Query) -> Result<u64> {
        let statement = self.compiler().compile_count(query)?;
        let value = self
            .executor
            .query_for_scalar(&statement.sql, &statement.params)
            .await?;

        match value.as_i64() {
            Some(count) => Ok(count.max(0) as u64),
            None => Err(Error::type_conversion(value, "u64")),
        }
    }

    /// Fetches page `number` using the configured default page size, unless
    /// the query carries its own size.
    pub async fn page(&self, query: &Query, number: u64) -> Result<PageResult> {
        let size = query
            .page
            .map(|page| page.size)
            .unwrap_or(self.config.default_page_size);
        let page = Page::new(number, size);

        let mut query = query.clone();
        query.page = Some(page);

        let total = self.count(&query).await?;
        let items = self.query(&query).await?;

        Ok(PageResult {
            items,
            total,
            number: page.number,
            size: page.size,
        })
    }

    // ===== conversion =====

    fn id_param(&self, entity: &EntityDefinition, id: &serde_json::Value) -> Result<Value> {
        let Some(field) = entity.id_field() else {
            return Err(Error::invalid_schema(format!(
                "entity `{}` has no identity field",
                entity.name
            )));
        };
        self.handlers.to_param(&field.ty, id)
    }

    fn to_row(&self, entity: &EntityDefinition, record: &Record) -> Result<Row> {
        let mut row = Row::new();

        for (name, value) in record {
            let Some(field) = entity.get_field(name) else {
                return Err(Error::sql_execution(format!(
                    "`{name}` is not a field of `{}`",
                    entity.name
                )));
            };
            if field.is_relation() {
                return Err(Error::sql_execution(format!(
                    "relation `{}.{}` cannot be written directly",
                    entity.name, field.name
                )));
            }

            row.insert(field.name.clone(), self.handlers.to_param(&field.ty, value)?);
        }

        Ok(row)
    }

    fn to_record(&self, entity: &EntityDefinition, row: Row) -> Result<Record> {
        let mut record = Record::new();

        for (name, value) in row {
            // Field labels are keyed by their declared name
            let (name, json) = match entity.get_field(&name) {
                Some(field) => {
                    let json = match &field.ty {
                        FieldType::Relation(relation) => self.nested_to_json(relation, value)?,
                        ty => self.handlers.from_result(ty, value)?,
                    };
                    (field.name.clone(), json)
                }
                // Labels of projected calls, such as aggregates
                None => (name, value.to_json()),
            };
            record.insert(name, json);
        }

        Ok(record)
    }

    fn nested_to_json(&self, relation: &RelationField, value: Value) -> Result<serde_json::Value> {
        let Some(target) = self.models.get(&relation.from) else {
            return Ok(value.to_json());
        };

        Ok(match value {
            Value::Row(row) => serde_json::Value::Object(self.to_record(&target, *row)?),
            Value::List(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Row(row) => self.to_record(&target, *row).map(serde_json::Value::Object),
                        other => Ok(other.to_json()),
                    })
                    .collect::<Result<_>>()?,
            ),
            other => other.to_json(),
        })
    }
}
