use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    pub fn postgresql() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "boolean")
            .register(TypeCode::SmallInt, "int2")
            .register(TypeCode::Integer, "int4")
            .register(TypeCode::BigInt, "int8")
            .register(TypeCode::Double, "float8")
            .register(TypeCode::Decimal, "numeric($p,$s)")
            .register(TypeCode::Char, "char($l)")
            .register(TypeCode::VarChar, "text")
            .register_with_capacity(TypeCode::VarChar, 10_485_760, "varchar($l)")
            .register(TypeCode::LongVarChar, "text")
            .register(TypeCode::Date, "date")
            .register(TypeCode::Time, "time")
            .register(TypeCode::Timestamp, "timestamp")
            .register(TypeCode::Blob, "bytea")
            .register(TypeCode::Json, "jsonb");

        Dialect {
            name: "postgresql",
            capability: Capability::POSTGRESQL,
            types,
            functions: extract_functions("to_char"),
            duplicate_key: DuplicateKeyTranslator::new(&[
                r#"duplicate key value violates unique constraint "(?P<name>[^"]+)""#,
            ]),
        }
    }

    /// H2 shares PostgreSQL's DDL shape but keeps identifier case and uses
    /// its own type names for large values.
    pub fn h2() -> Dialect {
        let mut dialect = Dialect {
            name: "h2",
            capability: Capability::H2,
            functions: extract_functions("formatdatetime"),
            duplicate_key: DuplicateKeyTranslator::new(&[
                r#"Unique index or primary key violation: "(?:[^".\s]+\.)?(?P<name>[^"\s]+)"#,
            ]),
            ..Dialect::postgresql()
        };

        dialect
            .types
            .register(TypeCode::SmallInt, "smallint")
            .register(TypeCode::Integer, "integer")
            .register(TypeCode::BigInt, "bigint")
            .register(TypeCode::Double, "double precision")
            .register(TypeCode::Decimal, "decimal($p,$s)")
            .register(TypeCode::VarChar, "clob")
            .register_with_capacity(TypeCode::VarChar, 1_048_576, "varchar($l)")
            .register(TypeCode::LongVarChar, "clob")
            .register(TypeCode::Blob, "blob")
            .register(TypeCode::Json, "json");

        dialect
    }
}

fn extract_functions(date_format: &'static str) -> FunctionRegistry {
    let mut functions = FunctionRegistry::standard();
    functions
        .register_template("year", Arity::Exact(1), "extract(year from ?1)")
        .register_template("month", Arity::Exact(1), "extract(month from ?1)")
        .register_template("day", Arity::Exact(1), "extract(day from ?1)")
        .register_template("hour", Arity::Exact(1), "extract(hour from ?1)")
        .register_template("minute", Arity::Exact(1), "extract(minute from ?1)")
        .register_template("second", Arity::Exact(1), "extract(second from ?1)")
        .register_standard("date_format", Arity::Exact(2), date_format)
        .register_template("dayofweek", Arity::Exact(1), "(extract(dow from ?1) + 1)")
        .register_template("dayofmonth", Arity::Exact(1), "extract(day from ?1)")
        .register_template("dayofyear", Arity::Exact(1), "extract(doy from ?1)");
    functions
}
