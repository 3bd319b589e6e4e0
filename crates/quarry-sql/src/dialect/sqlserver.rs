use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    pub fn sqlserver() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "bit")
            .register(TypeCode::SmallInt, "smallint")
            .register(TypeCode::Integer, "int")
            .register(TypeCode::BigInt, "bigint")
            .register(TypeCode::Double, "float")
            .register(TypeCode::Decimal, "numeric($p,$s)")
            .register(TypeCode::Char, "nchar($l)")
            .register(TypeCode::VarChar, "nvarchar(max)")
            .register_with_capacity(TypeCode::VarChar, 4_000, "nvarchar($l)")
            .register(TypeCode::LongVarChar, "nvarchar(max)")
            .register(TypeCode::Date, "date")
            .register(TypeCode::Time, "time")
            .register(TypeCode::Timestamp, "datetime2")
            .register(TypeCode::Blob, "varbinary(max)")
            .register(TypeCode::Json, "nvarchar(max)");

        let mut functions = FunctionRegistry::standard();
        functions
            .register_standard("year", Arity::Exact(1), "year")
            .register_standard("month", Arity::Exact(1), "month")
            .register_standard("day", Arity::Exact(1), "day")
            .register_template("hour", Arity::Exact(1), "datepart(hour, ?1)")
            .register_template("minute", Arity::Exact(1), "datepart(minute, ?1)")
            .register_template("second", Arity::Exact(1), "datepart(second, ?1)")
            .register_standard("date_format", Arity::Exact(2), "format")
            .register_template("dayofweek", Arity::Exact(1), "datepart(weekday, ?1)")
            .register_standard("dayofmonth", Arity::Exact(1), "day")
            .register_template("dayofyear", Arity::Exact(1), "datepart(dayofyear, ?1)");

        Dialect {
            name: "sqlserver",
            capability: Capability::SQLSERVER,
            types,
            functions,
            duplicate_key: DuplicateKeyTranslator::new(&[
                r"Violation of (?:UNIQUE KEY|PRIMARY KEY) constraint '(?P<name>[^']+)'",
                r"Cannot insert duplicate key row in object '[^']+' with unique index '(?P<name>[^']+)'",
            ]),
        }
    }
}
