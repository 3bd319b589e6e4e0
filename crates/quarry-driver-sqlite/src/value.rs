use quarry_core::{stmt, Error};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

#[derive(Debug)]
pub struct Value(stmt::Value);

impl From<stmt::Value> for Value {
    fn from(value: stmt::Value) -> Self {
        Self(value)
    }
}

impl Value {
    pub fn into_inner(self) -> stmt::Value {
        self.0
    }

    /// Converts a SQLite cell. SQLite has no temporal or boolean storage
    /// class; such cells come back as text or integers and are coerced by the
    /// type handlers.
    pub fn from_sql(value: ValueRef<'_>) -> Self {
        let core_value = match value {
            ValueRef::Null => stmt::Value::Null,
            ValueRef::Integer(value) => stmt::Value::I64(value),
            ValueRef::Real(value) => stmt::Value::F64(value),
            ValueRef::Text(value) | ValueRef::Blob(value) => {
                stmt::Value::String(String::from_utf8_lossy(value).into_owned())
            }
        };

        Value(core_value)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match &self.0 {
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Value::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) | Value::Json(_) => {
                Ok(ToSqlOutput::Owned(SqlValue::Text(self.0.to_string())))
            }
            Value::List(_) | Value::Row(_) => Err(rusqlite::Error::ToSqlConversionFailure(
                Box::new(Error::type_conversion(self.0.clone(), "sqlite value")),
            )),
        }
    }
}
