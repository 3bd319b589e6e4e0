use quarry_core::{
    schema::{
        app::{EntityDefinition, IndexDefinition},
        db::{SqlColumn, SqlIndex, SqlSequence, SqlTable, SqlUniqueKey},
        ModelRegistry,
    },
    Error, Executor, Result,
};
use quarry_sql::{Dialect, Exporter};

/// Converges physical tables with entity definitions.
///
/// The model registry is the record of what was last applied. Each sync
/// diffs the declared entity against the registered one and issues only the
/// DDL needed to close the gap, so an unchanged definition issues nothing.
///
/// Statements run strictly in order. In failsafe mode a failing step is
/// logged and skipped; otherwise the first failure is returned and the
/// registry keeps its previous entry.
#[derive(Debug)]
pub struct SchemaSynchronizer<'a> {
    dialect: &'a Dialect,
    models: &'a ModelRegistry,
    executor: &'a dyn Executor,
    failsafe: bool,
}

impl<'a> SchemaSynchronizer<'a> {
    pub fn new(
        dialect: &'a Dialect,
        models: &'a ModelRegistry,
        executor: &'a dyn Executor,
    ) -> SchemaSynchronizer<'a> {
        SchemaSynchronizer {
            dialect,
            models,
            executor,
            failsafe: false,
        }
    }

    pub fn failsafe(mut self, failsafe: bool) -> Self {
        self.failsafe = failsafe;
        self
    }

    /// Creates or reconciles the table of `entity` and registers it.
    pub async fn sync(&self, mut entity: EntityDefinition) -> Result<()> {
        entity.normalize();
        entity.validate()?;

        match self.models.get(&entity.name) {
            Some(previous) => {
                self.reconcile(&previous, &entity, self.tolerance(Tolerate::Nothing))
                    .await?
            }
            None => {
                let created = self.create_statements(&entity)?;
                if let Err(err) = self.run(&created).await {
                    if !self.is_existing_object(&err) && !self.failsafe {
                        return Err(err);
                    }
                    tracing::info!(
                        entity = %entity.name,
                        error = %err,
                        "create failed, reconciling field by field"
                    );
                    // An existing table already carries its key
                    let mut existing = EntityDefinition::new(&entity.name);
                    existing.fields.extend(entity.id_field().cloned());
                    self.reconcile(&existing, &entity, self.tolerance(Tolerate::Existing))
                        .await?;
                }
            }
        }

        self.models.insert(entity);
        Ok(())
    }

    fn create_statements(&self, entity: &EntityDefinition) -> Result<Vec<String>> {
        let table = SqlTable::from_entity(entity)?;
        let mut statements = self.dialect.table_exporter().sql_create_strings(&table)?;

        let indexes = self.dialect.index_exporter();
        for index in &table.indexes {
            statements.extend(indexes.sql_create_strings(index)?);
        }

        Ok(statements)
    }

    async fn reconcile(
        &self,
        previous: &EntityDefinition,
        entity: &EntityDefinition,
        tolerate: Tolerate,
    ) -> Result<()> {
        let table = entity.name.as_str();
        let unique_keys = self.dialect.unique_key_exporter();

        for field in entity.columns() {
            let Some(column) = SqlColumn::from_field(field)? else {
                continue;
            };
            let key = SqlUniqueKey::for_column(table, &column.name);

            let old = match previous.get_field(&field.name) {
                Some(old) => SqlColumn::from_field(old)?,
                None => None,
            };

            let Some(old) = old else {
                let statements = self.add_column_strings(table, &column);
                self.step(table, &field.name, "create field", statements, tolerate)
                    .await?;
                continue;
            };

            if old.has_diff(&column) {
                let statements = self.alter_column_strings(table, &old, &column);
                self.step(table, &field.name, "modify field", statements, tolerate)
                    .await?;
            } else if old.unique != column.unique {
                tracing::info!(
                    entity = table,
                    field = %field.name,
                    unique = column.unique,
                    "field divergence"
                );
                let statements = if column.unique {
                    unique_keys.sql_create_strings(&key)
                } else {
                    unique_keys.sql_drop_strings(&key)
                };
                self.step(table, &field.name, "unique key", statements, tolerate)
                    .await?;
            }
        }

        let indexes = self.dialect.index_exporter();
        for index in &entity.indexes {
            let declared = SqlIndex::from_definition(index, table);
            let statements = match find_index(previous, &index.name) {
                None => indexes.sql_create_strings(&declared),
                Some(old) if old != index => {
                    let old = SqlIndex::from_definition(old, table);
                    self.recreate_index_strings(&old, &declared)
                }
                Some(_) => continue,
            };
            self.step(table, &index.name, "index", statements, tolerate)
                .await?;
        }

        Ok(())
    }

    /// Drops the table of `name` and forgets its definition.
    pub async fn drop_model(&self, name: &str) -> Result<()> {
        let table = match self.models.get(name) {
            Some(entity) => SqlTable::from_entity(&entity)?,
            None => SqlTable::new(name),
        };
        let statements = self.dialect.table_exporter().sql_drop_strings(&table);
        self.step(name, name, "drop model", statements, self.tolerance(Tolerate::Nothing))
            .await?;

        self.models.remove(name);
        Ok(())
    }

    /// Drops one column, and the unique key derived from it first.
    pub async fn drop_field(&self, entity: &str, field: &str) -> Result<()> {
        let mut definition = self.registered(entity)?;
        let Some(position) = definition
            .fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(field))
        else {
            return Err(Error::invalid_schema(format!(
                "entity `{entity}` has no field `{field}`"
            )));
        };

        let removed = definition.fields.remove(position);
        if let Some(column) = SqlColumn::from_field(&removed)? {
            let statements = self.drop_column_strings(&definition.name, &column);
            let tolerate = self.tolerance(Tolerate::Nothing);
            self.step(entity, &removed.name, "drop field", statements, tolerate)
                .await?;
        }

        definition.indexes.retain(|index| {
            !index
                .fields
                .iter()
                .any(|f| f.name.eq_ignore_ascii_case(&removed.name))
        });
        self.models.insert(definition);
        Ok(())
    }

    pub async fn drop_index(&self, entity: &str, name: &str) -> Result<()> {
        let mut definition = self.registered(entity)?;
        let index = match find_index(&definition, name) {
            Some(index) => SqlIndex::from_definition(index, &definition.name),
            None => SqlIndex::new(name, &definition.name),
        };

        let statements = self.dialect.index_exporter().sql_drop_strings(&index);
        self.step(entity, name, "drop index", statements, self.tolerance(Tolerate::Nothing))
            .await?;

        definition
            .indexes
            .retain(|index| !index.name.eq_ignore_ascii_case(name));
        self.models.insert(definition);
        Ok(())
    }

    pub async fn create_sequence(&self, sequence: &SqlSequence) -> Result<()> {
        let statements = self.dialect.sequence_exporter().sql_create_strings(sequence);
        let tolerate = self.tolerance(Tolerate::Nothing);
        self.step(&sequence.name, &sequence.name, "create sequence", statements, tolerate)
            .await
    }

    pub async fn drop_sequence(&self, name: &str) -> Result<()> {
        let sequence = SqlSequence::new(name);
        let statements = self.dialect.sequence_exporter().sql_drop_strings(&sequence);
        self.step(name, name, "drop sequence", statements, self.tolerance(Tolerate::Nothing))
            .await
    }

    fn add_column_strings(&self, table: &str, column: &SqlColumn) -> Result<Vec<String>> {
        let mut out = self.dialect.column_exporter(table).sql_create_strings(column)?;
        if column.unique {
            let key = SqlUniqueKey::for_column(table, &column.name);
            out.extend(self.dialect.unique_key_exporter().sql_create_strings(&key)?);
        }
        Ok(out)
    }

    /// The unique key is dropped before the alter and re-derived after it.
    fn alter_column_strings(
        &self,
        table: &str,
        old: &SqlColumn,
        column: &SqlColumn,
    ) -> Result<Vec<String>> {
        let unique_keys = self.dialect.unique_key_exporter();
        let key = SqlUniqueKey::for_column(table, &column.name);
        let mut out = vec![];

        if old.unique {
            out.extend(unique_keys.sql_drop_strings(&key)?);
        }
        out.extend(self.dialect.column_exporter(table).sql_alter_strings(column)?);
        if column.unique {
            out.extend(unique_keys.sql_create_strings(&key)?);
        }
        Ok(out)
    }

    fn drop_column_strings(&self, table: &str, column: &SqlColumn) -> Result<Vec<String>> {
        let mut out = vec![];
        if column.unique {
            let key = SqlUniqueKey::for_column(table, &column.name);
            out.extend(self.dialect.unique_key_exporter().sql_drop_strings(&key)?);
        }
        out.extend(self.dialect.column_exporter(table).sql_drop_strings(column)?);
        Ok(out)
    }

    fn recreate_index_strings(&self, old: &SqlIndex, index: &SqlIndex) -> Result<Vec<String>> {
        let indexes = self.dialect.index_exporter();
        let mut out = indexes.sql_drop_strings(old)?;
        out.extend(indexes.sql_create_strings(index)?);
        Ok(out)
    }

    fn registered(&self, entity: &str) -> Result<EntityDefinition> {
        self.models
            .get(entity)
            .map(|definition| (*definition).clone())
            .ok_or_else(|| Error::invalid_schema(format!("entity `{entity}` is not registered")))
    }

    async fn step(
        &self,
        entity: &str,
        target: &str,
        action: &str,
        statements: Result<Vec<String>>,
        tolerate: Tolerate,
    ) -> Result<()> {
        let result = match statements {
            Ok(statements) => self.run(&statements).await,
            Err(err) => Err(err),
        };

        match result {
            Err(err) if self.tolerates(tolerate, &err) => {
                tracing::warn!(entity, target, action, error = %err, "schema step skipped");
                Ok(())
            }
            other => other,
        }
    }

    /// Failsafe mode widens any tolerance to every failure.
    fn tolerance(&self, tolerate: Tolerate) -> Tolerate {
        if self.failsafe {
            Tolerate::Everything
        } else {
            tolerate
        }
    }

    fn tolerates(&self, tolerate: Tolerate, err: &Error) -> bool {
        match tolerate {
            Tolerate::Nothing => false,
            Tolerate::Existing => self.is_existing_object(err),
            Tolerate::Everything => true,
        }
    }

    fn is_existing_object(&self, err: &Error) -> bool {
        err.driver_message()
            .is_some_and(|message| self.dialect.reports_existing_object(&message))
    }

    async fn run(&self, statements: &[String]) -> Result<()> {
        for sql in statements {
            tracing::debug!(%sql, "ddl");
            self.executor.execute(sql).await?;
        }
        Ok(())
    }
}

/// Which failed schema steps are logged and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tolerate {
    Nothing,
    /// Only failures reporting that the object is already there.
    Existing,
    Everything,
}

fn find_index<'e>(entity: &'e EntityDefinition, name: &str) -> Option<&'e IndexDefinition> {
    entity
        .indexes
        .iter()
        .find(|index| index.name.eq_ignore_ascii_case(name))
}
