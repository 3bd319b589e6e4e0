//! Conversion between logical field values and native values.
//!
//! Applications exchange JSON values with the session. Before binding, each
//! value passes through the handler registered for its field kind; result
//! cells pass back through the same handler.

use crate::{
    schema::app::{FieldKind, FieldType},
    stmt::Value,
    Error, Result,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use std::{fmt::Debug, sync::Arc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Converts values of one field kind in both directions.
pub trait TypeHandler: Debug + Send + Sync {
    /// Logical (JSON) value to native bind parameter.
    fn to_param(&self, ty: &FieldType, value: &serde_json::Value) -> Result<Value>;

    /// Native result cell to logical (JSON) value.
    fn from_result(&self, ty: &FieldType, value: Value) -> Result<serde_json::Value>;
}

/// Handlers keyed by field kind. Built once per session factory.
#[derive(Debug, Clone)]
pub struct TypeHandlerRegistry {
    handlers: IndexMap<FieldKind, Arc<dyn TypeHandler>>,
}

impl TypeHandlerRegistry {
    /// A registry with the default handler for every field kind.
    pub fn new() -> TypeHandlerRegistry {
        let mut registry = TypeHandlerRegistry {
            handlers: IndexMap::new(),
        };

        let integer: Arc<dyn TypeHandler> = Arc::new(IntegerHandler);
        registry.register(FieldKind::Id, Arc::new(IdHandler));
        registry.register(FieldKind::Int, integer.clone());
        registry.register(FieldKind::Long, integer);
        registry.register(FieldKind::String, Arc::new(StringHandler));
        registry.register(FieldKind::Enum, Arc::new(EnumHandler));
        registry.register(FieldKind::Float, Arc::new(FloatHandler));
        registry.register(FieldKind::Boolean, Arc::new(BooleanHandler));
        registry.register(FieldKind::DateTime, Arc::new(TemporalHandler));
        registry.register(FieldKind::Date, Arc::new(TemporalHandler));
        registry.register(FieldKind::Time, Arc::new(TemporalHandler));
        registry.register(FieldKind::Json, Arc::new(JsonHandler));
        registry
    }

    /// Registers a handler, replacing any previous one for the kind.
    pub fn register(&mut self, kind: FieldKind, handler: Arc<dyn TypeHandler>) {
        self.handlers.insert(kind, handler);
    }

    fn get(&self, ty: &FieldType) -> Result<&Arc<dyn TypeHandler>> {
        self.handlers.get(&ty.kind()).ok_or_else(|| {
            crate::err!("no type handler registered for {:?}", ty.kind())
        })
    }

    pub fn to_param(&self, ty: &FieldType, value: &serde_json::Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.get(ty)?.to_param(ty, value)
    }

    pub fn from_result(&self, ty: &FieldType, value: Value) -> Result<serde_json::Value> {
        if value.is_null() {
            return Ok(serde_json::Value::Null);
        }
        self.get(ty)?.from_result(ty, value)
    }
}

impl Default for TypeHandlerRegistry {
    fn default() -> Self {
        TypeHandlerRegistry::new()
    }
}

fn mismatch(value: &serde_json::Value, to_type: &'static str) -> Error {
    Error::type_conversion(Value::Json(value.clone()), to_type)
}

#[derive(Debug)]
struct IdHandler;

impl TypeHandler for IdHandler {
    fn to_param(&self, _: &FieldType, value: &serde_json::Value) -> Result<Value> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(Value::I64).ok_or_else(|| mismatch(value, "I64")),
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            _ => Err(mismatch(value, "Id")),
        }
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        Ok(value.to_json())
    }
}

#[derive(Debug)]
struct IntegerHandler;

impl TypeHandler for IntegerHandler {
    fn to_param(&self, _: &FieldType, value: &serde_json::Value) -> Result<Value> {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Ok(Value::I64(v)),
                // Accept integral floats such as `30.0`
                None => match n.as_f64() {
                    Some(v) if v.fract() == 0.0 => Ok(Value::I64(v as i64)),
                    _ => Err(mismatch(value, "I64")),
                },
            },
            serde_json::Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::I64)
                .map_err(|_| mismatch(value, "I64")),
            serde_json::Value::Bool(b) => Ok(Value::I64(*b as i64)),
            _ => Err(mismatch(value, "I64")),
        }
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        match value {
            Value::I64(v) => Ok(v.into()),
            Value::F64(v) if v.fract() == 0.0 => Ok((v as i64).into()),
            Value::String(s) => s
                .parse::<i64>()
                .map(Into::into)
                .map_err(|_| Error::type_conversion(Value::String(s), "I64")),
            other => Err(Error::type_conversion(other, "I64")),
        }
    }
}

#[derive(Debug)]
struct FloatHandler;

impl TypeHandler for FloatHandler {
    fn to_param(&self, _: &FieldType, value: &serde_json::Value) -> Result<Value> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Value::F64).ok_or_else(|| mismatch(value, "F64")),
            serde_json::Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::F64)
                .map_err(|_| mismatch(value, "F64")),
            _ => Err(mismatch(value, "F64")),
        }
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        match value {
            Value::F64(v) => Ok(v.into()),
            Value::I64(v) => Ok((v as f64).into()),
            Value::String(s) => s
                .parse::<f64>()
                .map(Into::into)
                .map_err(|_| Error::type_conversion(Value::String(s), "F64")),
            other => Err(Error::type_conversion(other, "F64")),
        }
    }
}

#[derive(Debug)]
struct StringHandler;

impl TypeHandler for StringHandler {
    fn to_param(&self, ty: &FieldType, value: &serde_json::Value) -> Result<Value> {
        let s = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => return Err(mismatch(value, "String")),
        };

        if let FieldType::String { length: Some(length) } = ty {
            if s.chars().count() > *length as usize {
                return Err(crate::err!(
                    "value length {} exceeds column length {}",
                    s.chars().count(),
                    length
                ));
            }
        }

        Ok(Value::String(s))
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        match value {
            Value::String(s) => Ok(s.into()),
            other => Ok(other.to_string().into()),
        }
    }
}

#[derive(Debug)]
struct EnumHandler;

impl TypeHandler for EnumHandler {
    fn to_param(&self, ty: &FieldType, value: &serde_json::Value) -> Result<Value> {
        let FieldType::Enum { values } = ty else {
            return Err(mismatch(value, "Enum"));
        };

        match value {
            serde_json::Value::String(s) if values.iter().any(|v| v == s) => {
                Ok(Value::String(s.clone()))
            }
            serde_json::Value::String(s) => Err(crate::err!(
                "`{}` is not one of the enum values {:?}",
                s,
                values
            )),
            _ => Err(mismatch(value, "Enum")),
        }
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        match value {
            Value::String(s) => Ok(s.into()),
            other => Err(Error::type_conversion(other, "Enum")),
        }
    }
}

#[derive(Debug)]
struct BooleanHandler;

impl TypeHandler for BooleanHandler {
    fn to_param(&self, _: &FieldType, value: &serde_json::Value) -> Result<Value> {
        match value {
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => Ok(Value::Bool(n.as_f64() != Some(0.0))),
            serde_json::Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "y" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "n" | "no" => Ok(Value::Bool(false)),
                _ => Err(mismatch(value, "Bool")),
            },
            _ => Err(mismatch(value, "Bool")),
        }
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        // Backends without a BOOLEAN type store 0/1
        match value {
            Value::Bool(b) => Ok(b.into()),
            Value::I64(v) => Ok((v != 0).into()),
            Value::String(s) => Ok(matches!(s.as_str(), "1" | "true" | "TRUE" | "Y" | "y").into()),
            other => Err(Error::type_conversion(other, "Bool")),
        }
    }
}

#[derive(Debug)]
struct TemporalHandler;

impl TemporalHandler {
    fn parse(ty: &FieldType, s: &str) -> Result<Value> {
        let s = s.trim();
        Ok(match ty {
            FieldType::Date => Value::Date(NaiveDate::parse_from_str(&s[..s.len().min(10)], DATE_FORMAT)?),
            FieldType::Time => Value::Time(
                NaiveTime::parse_from_str(s, TIME_FORMAT)
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S%.f"))?,
            ),
            _ => Value::DateTime(
                NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                    .or_else(|err| {
                        NaiveDate::parse_from_str(s, DATE_FORMAT)
                            .ok()
                            .and_then(|date| date.and_hms_opt(0, 0, 0))
                            .ok_or(err)
                    })?,
            ),
        })
    }
}

impl TypeHandler for TemporalHandler {
    fn to_param(&self, ty: &FieldType, value: &serde_json::Value) -> Result<Value> {
        match value {
            serde_json::Value::String(s) => TemporalHandler::parse(ty, s),
            _ => Err(mismatch(value, "DateTime")),
        }
    }

    fn from_result(&self, ty: &FieldType, value: Value) -> Result<serde_json::Value> {
        let value = match value {
            Value::String(s) => TemporalHandler::parse(ty, &s)?,
            other => other,
        };

        match value {
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) => Ok(value.to_json()),
            other => Err(Error::type_conversion(other, "DateTime")),
        }
    }
}

#[derive(Debug)]
struct JsonHandler;

impl TypeHandler for JsonHandler {
    fn to_param(&self, _: &FieldType, value: &serde_json::Value) -> Result<Value> {
        Ok(Value::Json(value.clone()))
    }

    fn from_result(&self, _: &FieldType, value: Value) -> Result<serde_json::Value> {
        match value {
            Value::String(s) => Ok(serde_json::from_str(&s)?),
            Value::Json(v) => Ok(v),
            other => Ok(other.to_json()),
        }
    }
}
