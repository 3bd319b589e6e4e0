use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    pub fn db2() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "smallint")
            .register(TypeCode::SmallInt, "smallint")
            .register(TypeCode::Integer, "integer")
            .register(TypeCode::BigInt, "bigint")
            .register(TypeCode::Double, "double")
            .register(TypeCode::Decimal, "decimal($p,$s)")
            .register(TypeCode::Char, "char($l)")
            .register(TypeCode::VarChar, "clob")
            .register_with_capacity(TypeCode::VarChar, 32_672, "varchar($l)")
            .register(TypeCode::LongVarChar, "clob")
            .register(TypeCode::Date, "date")
            .register(TypeCode::Time, "time")
            .register(TypeCode::Timestamp, "timestamp")
            .register(TypeCode::Blob, "blob")
            .register(TypeCode::Json, "clob");

        let mut functions = FunctionRegistry::standard();
        functions
            .register_standard("year", Arity::Exact(1), "year")
            .register_standard("month", Arity::Exact(1), "month")
            .register_standard("day", Arity::Exact(1), "day")
            .register_standard("hour", Arity::Exact(1), "hour")
            .register_standard("minute", Arity::Exact(1), "minute")
            .register_standard("second", Arity::Exact(1), "second")
            .register_standard("date_format", Arity::Exact(2), "varchar_format")
            .register_standard("dayofweek", Arity::Exact(1), "dayofweek")
            .register_standard("dayofmonth", Arity::Exact(1), "day")
            .register_standard("dayofyear", Arity::Exact(1), "dayofyear")
            .register_infix("concat", " || ");

        Dialect {
            name: "db2",
            capability: Capability::DB2,
            types,
            functions,
            // SQL0803N carries the index id, not its name
            duplicate_key: DuplicateKeyTranslator::new(&[
                r"SQLCODE=-803.*SQLERRMC=(?:\d+;)?(?P<name>[^;,\s]+)",
            ]),
        }
    }
}
