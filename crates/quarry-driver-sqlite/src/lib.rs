mod value;
pub(crate) use value::Value;

use quarry_core::{
    async_trait,
    driver::{GeneratedKeys, Params},
    stmt::Row,
    Error, Executor, Result,
};
use rusqlite::{types::ToSql, Connection as RusqliteConnection};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use url::Url;

/// Where a SQLite database lives.
#[derive(Debug, Clone)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Parses a `sqlite:` connection URL. `sqlite::memory:` selects an
    /// in-memory database.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(quarry_core::err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    /// Opens a connection. Every in-memory connection is a fresh database.
    pub fn connect(&self) -> Result<Connection> {
        match self {
            Sqlite::File(path) => Connection::open(path),
            Sqlite::InMemory => Connection::in_memory(),
        }
    }
}

/// One SQLite connection serving as a session's executor.
#[derive(Debug)]
pub struct Connection {
    connection: Mutex<RusqliteConnection>,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self::from_connection(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: RusqliteConnection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&RusqliteConnection) -> rusqlite::Result<T>) -> Result<T> {
        let connection = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&connection).map_err(Error::driver_operation_failed)
    }
}

/// Named parameters in the form rusqlite binds them: `(":p0", value)`.
struct Bound {
    values: Vec<(String, Value)>,
}

impl Bound {
    fn new(params: &Params) -> Bound {
        Bound {
            values: params
                .iter()
                .map(|(name, value)| (format!(":{name}"), Value::from(value.clone())))
                .collect(),
        }
    }

    fn named(&self) -> Vec<(&str, &dyn ToSql)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

#[async_trait]
impl Executor for Connection {
    async fn query_for_list(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        tracing::trace!(%sql, "sqlite query");
        let bound = Bound::new(params);

        self.with(|connection| {
            let mut stmt = connection.prepare(sql)?;
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();

            let mut rows = stmt.query(&*bound.named())?;
            let mut out = vec![];

            while let Some(row) = rows.next()? {
                let mut record = Row::new();
                for (index, column) in columns.iter().enumerate() {
                    record.insert(column.clone(), Value::from_sql(row.get_ref(index)?).into_inner());
                }
                out.push(record);
            }

            Ok(out)
        })
    }

    async fn update(&self, sql: &str, params: &Params) -> Result<u64> {
        tracing::trace!(%sql, "sqlite update");
        let bound = Bound::new(params);

        self.with(|connection| {
            let count = connection.prepare(sql)?.execute(&*bound.named())?;
            Ok(count as u64)
        })
    }

    async fn update_and_return_generated_keys(
        &self,
        sql: &str,
        params: &Params,
    ) -> Result<GeneratedKeys> {
        tracing::trace!(%sql, "sqlite insert");
        let bound = Bound::new(params);

        self.with(|connection| {
            let rows_affected = connection.prepare(sql)?.execute(&*bound.named())? as u64;
            let key = (rows_affected > 0)
                .then(|| quarry_core::stmt::Value::I64(connection.last_insert_rowid()));
            Ok(GeneratedKeys { rows_affected, key })
        })
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        tracing::trace!(%sql, "sqlite execute");
        self.with(|connection| connection.execute_batch(sql))
    }
}
