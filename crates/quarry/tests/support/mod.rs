#![allow(dead_code)]

use quarry::{
    driver::{GeneratedKeys, Params},
    schema::app::{EntityDefinition, Field, RelationField},
    stmt::Row,
    Config, Executor, Result, Session, SessionFactory,
};
use quarry_core::async_trait;
use quarry_driver_sqlite::Connection;
use std::sync::{Arc, Mutex};

/// Statements seen by a [`Recorder`], in execution order.
#[derive(Debug, Clone, Default)]
pub struct Log {
    statements: Arc<Mutex<Vec<String>>>,
    interleaved: Arc<Mutex<Option<String>>>,
}

impl Log {
    fn push(&self, sql: &str) {
        self.statements.lock().unwrap().push(sql.to_string());
    }

    /// Returns and clears the recorded statements.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.statements.lock().unwrap())
    }

    /// Runs `sql`, unrecorded, right before the next update, as another
    /// connection would.
    pub fn interleave(&self, sql: &str) {
        *self.interleaved.lock().unwrap() = Some(sql.to_string());
    }
}

/// Backend behaviors a [`Recorder`] can imitate on top of SQLite.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    /// Result labels come back upper-cased.
    pub upper_labels: bool,
    /// Every DDL statement fails.
    pub failing_ddl: bool,
}

/// An in-memory SQLite executor that records every statement it is given.
#[derive(Debug)]
pub struct Recorder {
    inner: Connection,
    log: Log,
    quirks: Quirks,
}

#[async_trait]
impl Executor for Recorder {
    async fn query_for_list(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.log.push(sql);
        let rows = self.inner.query_for_list(sql, params).await?;
        if !self.quirks.upper_labels {
            return Ok(rows);
        }
        Ok(rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(label, value)| (label.to_ascii_uppercase(), value))
                    .collect()
            })
            .collect())
    }

    async fn update(&self, sql: &str, params: &Params) -> Result<u64> {
        self.log.push(sql);
        let interleaved = self.log.interleaved.lock().unwrap().take();
        if let Some(other) = interleaved {
            self.inner.execute(&other).await?;
        }
        self.inner.update(sql, params).await
    }

    async fn update_and_return_generated_keys(
        &self,
        sql: &str,
        params: &Params,
    ) -> Result<GeneratedKeys> {
        self.log.push(sql);
        self.inner.update_and_return_generated_keys(sql, params).await
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        self.log.push(sql);
        if self.quirks.failing_ddl {
            return Err(quarry::Error::driver_operation_failed(std::io::Error::other(
                "disk I/O error",
            )));
        }
        self.inner.execute(sql).await
    }
}

pub fn user() -> EntityDefinition {
    EntityDefinition::new("User")
        .field(Field::id("id"))
        .field(Field::string("name").unique())
        .field(Field::int("age"))
        .field(Field::relation(
            "orders",
            RelationField::many("Order", "id", "userId").cascade_delete(),
        ))
}

pub fn order() -> EntityDefinition {
    EntityDefinition::new("Order")
        .field(Field::id("id"))
        .field(Field::long("userId"))
        .field(Field::int("total"))
        .field(Field::relation("user", RelationField::one("User", "userId", "id")))
}

/// A session over a fresh in-memory database.
pub fn session(config: Config) -> (Session, Log) {
    session_with(config, Quirks::default())
}

pub fn session_with(config: Config, quirks: Quirks) -> (Session, Log) {
    let factory = SessionFactory::new(config).unwrap();
    let log = Log::default();
    let recorder = Recorder {
        inner: Connection::in_memory().unwrap(),
        log: log.clone(),
        quirks,
    };
    (factory.session(recorder), log)
}

/// A session with `User` and `Order` registered and an empty log.
pub async fn shop(config: Config) -> (Session, Log) {
    let (mut session, log) = session(config);
    session.sync_schema([user(), order()]).await.unwrap();
    log.take();
    (session, log)
}

pub fn record(value: serde_json::Value) -> quarry::Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

pub fn value_of(records: Vec<quarry::Record>) -> Vec<serde_json::Value> {
    records.into_iter().map(serde_json::Value::Object).collect()
}
