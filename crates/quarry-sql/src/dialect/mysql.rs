use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    pub fn mysql() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "boolean")
            .register(TypeCode::SmallInt, "smallint")
            .register(TypeCode::Integer, "integer")
            .register(TypeCode::BigInt, "bigint")
            .register(TypeCode::Double, "double precision")
            .register(TypeCode::Decimal, "decimal($p,$s)")
            .register(TypeCode::Char, "char($l)")
            .register(TypeCode::VarChar, "longtext")
            .register_with_capacity(TypeCode::VarChar, 16_383, "varchar($l)")
            .register(TypeCode::LongVarChar, "longtext")
            .register(TypeCode::Date, "date")
            .register(TypeCode::Time, "time")
            .register(TypeCode::Timestamp, "datetime(6)")
            .register(TypeCode::Blob, "longblob")
            .register(TypeCode::Json, "json");

        let mut functions = FunctionRegistry::standard();
        functions
            .register_standard("year", Arity::Exact(1), "year")
            .register_standard("month", Arity::Exact(1), "month")
            .register_standard("day", Arity::Exact(1), "dayofmonth")
            .register_standard("hour", Arity::Exact(1), "hour")
            .register_standard("minute", Arity::Exact(1), "minute")
            .register_standard("second", Arity::Exact(1), "second")
            .register_standard("date_format", Arity::Exact(2), "date_format")
            .register_standard("dayofweek", Arity::Exact(1), "dayofweek")
            .register_standard("dayofmonth", Arity::Exact(1), "dayofmonth")
            .register_standard("dayofyear", Arity::Exact(1), "dayofyear");

        Dialect {
            name: "mysql",
            capability: Capability::MYSQL,
            types,
            functions,
            // MySQL 8 reports the key as `table.key`
            duplicate_key: DuplicateKeyTranslator::new(&[
                r"Duplicate entry '.*' for key '(?:[^'.]+\.)?(?P<name>[^']+)'",
            ]),
        }
    }

    pub fn mariadb() -> Dialect {
        Dialect {
            name: "mariadb",
            capability: Capability::MARIADB,
            ..Dialect::mysql()
        }
    }
}
