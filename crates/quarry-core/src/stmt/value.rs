use super::Row;
use crate::{Error, Result};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A native value exchanged with the executor: a bind parameter or a result
/// cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),

    /// A JSON document, serialized as text when bound
    Json(serde_json::Value),

    /// A list of values. Produced by `in` filters and by 1:N nested fetches.
    List(Vec<Value>),

    /// A nested row attached by a 1:1 nested fetch
    Row(Box<Row>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Value::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I64(_) => "I64",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
            Value::Time(_) => "Time",
            Value::DateTime(_) => "DateTime",
            Value::Json(_) => "Json",
            Value::List(_) => "List",
            Value::Row(_) => "Row",
        }
    }

    /// A key usable for grouping rows by this value.
    ///
    /// Integers and their string spelling compare equal so that a relation
    /// stored as text can join against an integer id.
    pub fn group_key(&self) -> Option<String> {
        match self {
            Value::Null | Value::List(_) | Value::Row(_) => None,
            Value::F64(v) if v.fract() == 0.0 => Some(format!("{}", *v as i64)),
            other => Some(other.to_string()),
        }
    }

    /// Converts a JSON value with no schema information into a native value.
    pub fn from_json(value: &serde_json::Value) -> Result<Value> {
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(*v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Value::I64(v),
                None => match n.as_f64() {
                    Some(v) => Value::F64(v),
                    None => return Err(Error::type_conversion(Value::Json(value.clone()), "F64")),
                },
            },
            serde_json::Value::String(v) => Value::String(v.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect::<Result<_>>()?)
            }
            serde_json::Value::Object(_) => Value::Json(value.clone()),
        })
    }

    /// Converts the value into JSON with no schema information.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::F64(v) => serde_json::Value::from(*v),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Date(v) => serde_json::Value::String(v.format("%Y-%m-%d").to_string()),
            Value::Time(v) => serde_json::Value::String(v.format("%H:%M:%S").to_string()),
            Value::DateTime(v) => {
                serde_json::Value::String(v.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            Value::Json(v) => v.clone(),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Row(row) => row.to_json(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Value::Json(v) => write!(f, "{v}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Row(row) => write!(f, "{}", row.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_matches_integer_spellings() {
        assert_eq!(Value::I64(7).group_key(), Value::String("7".into()).group_key());
        assert_eq!(Value::F64(7.0).group_key(), Some("7".to_string()));
        assert_eq!(Value::Null.group_key(), None);
    }

    #[test]
    fn json_round_trip_for_scalars() {
        let json = serde_json::json!([1, "two", true, null, 1.5]);
        let value = Value::from_json(&json).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::I64(1),
                Value::String("two".into()),
                Value::Bool(true),
                Value::Null,
                Value::F64(1.5),
            ])
        );
        assert_eq!(value.to_json(), json);
    }
}
