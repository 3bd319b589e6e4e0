//! Per-vendor SQL policy.
//!
//! A [`Dialect`] is a plain value: capability flags, a type-name table, a
//! function table and a duplicate-key translator. Related vendors are built
//! from one another's records rather than through a type hierarchy.

mod capability;
pub use capability::{
    AlterColumn, Capability, Comments, IdentifierCase, Identity, Pagination, Quote, Sequences,
};

mod db2;
mod duplicate_key;
mod existing_object;
pub use duplicate_key::DuplicateKeyTranslator;

mod functions;
pub use functions::{Arity, FunctionRegistry};

mod informix;
mod mysql;
mod oracle;
mod postgresql;
mod sqlite;
mod sqlserver;

mod type_names;
pub use type_names::{TypeNameRegistry, DEFAULT_LENGTH, DEFAULT_PRECISION, DEFAULT_SCALE};

use quarry_core::{
    schema::db::{SqlColumn, TypeCode},
    stmt::Value,
    Error, Result,
};

#[derive(Debug, Clone)]
pub struct Dialect {
    /// Lower-case vendor name, as accepted by [`Dialect::from_name`]
    pub name: &'static str,

    pub capability: Capability,

    pub types: TypeNameRegistry,

    pub functions: FunctionRegistry,

    pub duplicate_key: DuplicateKeyTranslator,
}

impl Dialect {
    /// Looks a dialect up by vendor name.
    pub fn from_name(name: &str) -> Result<Dialect> {
        Ok(match name.to_ascii_lowercase().as_str() {
            "mysql" => Dialect::mysql(),
            "mariadb" => Dialect::mariadb(),
            "postgresql" | "postgres" => Dialect::postgresql(),
            "h2" => Dialect::h2(),
            "sqlite" => Dialect::sqlite(),
            "oracle" => Dialect::oracle(),
            "sqlserver" | "mssql" => Dialect::sqlserver(),
            "db2" => Dialect::db2(),
            "informix" => Dialect::informix(),
            _ => return Err(Error::dialect(format!("unknown dialect `{name}`"))),
        })
    }

    /// Registers a native type-name template, optionally limited to a
    /// capacity.
    pub fn register_column_type(
        &mut self,
        code: TypeCode,
        capacity: Option<u32>,
        template: impl Into<String>,
    ) {
        match capacity {
            Some(capacity) => self.types.register_with_capacity(code, capacity, template),
            None => self.types.register(code, template),
        };
    }

    pub fn type_name(
        &self,
        code: TypeCode,
        length: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Result<String> {
        self.types.type_name(code, length, precision, scale)
    }

    /// The declared type of a column, including identity type substitution.
    pub fn column_type(&self, column: &SqlColumn) -> Result<String> {
        match self.capability.identity {
            Identity::SerialType(serial) if column.auto_increment => Ok(serial.to_string()),
            Identity::InlinePrimaryKey if column.auto_increment => Ok("INTEGER".to_string()),
            _ => self.type_name(
                column.type_code,
                column.length,
                column.precision,
                column.scale,
            ),
        }
    }

    pub fn register_function(&mut self, name: &str, arity: Arity, sql_name: &'static str) {
        self.functions.register_standard(name, arity, sql_name);
    }

    pub fn function_string(&self, name: &str, args: &[String]) -> Result<String> {
        self.functions.function_string(name, args)
    }

    /// Applies the dialect's identifier case strategy.
    pub fn fold_case(&self, name: &str) -> String {
        match self.capability.identifier_case {
            IdentifierCase::Preserve => name.to_string(),
            IdentifierCase::Upper => name.to_ascii_uppercase(),
            IdentifierCase::Lower => name.to_ascii_lowercase(),
        }
    }

    /// Quotes an identifier. Quoted names keep their canonical case; only
    /// dialects that do not quote fold it.
    pub fn quote(&self, name: &str) -> String {
        match self.capability.quote {
            Quote::Double => format!("\"{}\"", name.replace('"', "\"\"")),
            Quote::Backtick => format!("`{}`", name.replace('`', "``")),
            Quote::Bracket => format!("[{}]", name.replace(']', "]]")),
            Quote::None => self.fold_case(name),
        }
    }

    /// `table.column`, both quoted.
    pub fn qualify(&self, table: &str, column: &str) -> String {
        format!("{}.{}", self.quote(table), self.quote(column))
    }

    /// Wraps a select statement with the dialect's pagination syntax.
    pub fn limit_string(&self, sql: &str, offset: u64, limit: u64, has_order_by: bool) -> String {
        match self.capability.pagination {
            Pagination::LimitOffset if offset == 0 => format!("{sql} LIMIT {limit}"),
            Pagination::LimitOffset => format!("{sql} LIMIT {limit} OFFSET {offset}"),
            Pagination::OffsetFetchNext | Pagination::OffsetFetchFirst => {
                let fetch = match self.capability.pagination {
                    Pagination::OffsetFetchNext => "NEXT",
                    _ => "FIRST",
                };
                let order = if self.capability.pagination_requires_order && !has_order_by {
                    " ORDER BY (SELECT NULL)"
                } else {
                    ""
                };
                format!("{sql}{order} OFFSET {offset} ROWS FETCH {fetch} {limit} ROWS ONLY")
            }
            Pagination::SkipFirst => {
                let rest = sql
                    .get(..7)
                    .filter(|head| head.eq_ignore_ascii_case("SELECT "))
                    .map(|_| &sql[7..]);
                match rest {
                    Some(rest) if offset == 0 => format!("SELECT FIRST {limit} {rest}"),
                    Some(rest) => format!("SELECT SKIP {offset} FIRST {limit} {rest}"),
                    None => format!("SELECT SKIP {offset} FIRST {limit} * FROM ({sql}) q"),
                }
            }
        }
    }

    /// Renders a value as an inline SQL literal.
    pub fn literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) if self.capability.native_boolean => "TRUE".to_string(),
            Value::Bool(false) if self.capability.native_boolean => "FALSE".to_string(),
            Value::Bool(v) => (*v as u8).to_string(),
            Value::I64(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::List(items) => {
                let items: Vec<_> = items.iter().map(|item| self.literal(item)).collect();
                format!("({})", items.join(", "))
            }
            other => self.string_literal(&other.to_string()),
        }
    }

    /// Quotes and escapes a string literal.
    pub fn string_literal(&self, s: &str) -> String {
        let mut escaped = s.replace('\'', "''");
        if self.capability.backslash_escapes {
            escaped = escaped.replace('\\', "\\\\");
        }
        format!("'{escaped}'")
    }

    /// The constraint named by a duplicate-key driver message, if any.
    pub fn translate_duplicate_key(&self, message: &str) -> Option<String> {
        self.duplicate_key.translate(message)
    }

    /// Whether a driver message reports that the object being created
    /// already exists.
    pub fn reports_existing_object(&self, message: &str) -> bool {
        existing_object::reports_existing_object(message)
    }
}
