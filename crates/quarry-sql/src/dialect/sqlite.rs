use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    /// SQLite. Types map onto storage affinities; temporal values are kept as
    /// ISO-8601 text.
    pub fn sqlite() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "boolean")
            .register(TypeCode::SmallInt, "integer")
            .register(TypeCode::Integer, "integer")
            .register(TypeCode::BigInt, "integer")
            .register(TypeCode::Double, "real")
            .register(TypeCode::Decimal, "numeric($p,$s)")
            .register(TypeCode::Char, "char($l)")
            .register(TypeCode::VarChar, "varchar($l)")
            .register(TypeCode::LongVarChar, "text")
            .register(TypeCode::Date, "text")
            .register(TypeCode::Time, "text")
            .register(TypeCode::Timestamp, "text")
            .register(TypeCode::Blob, "blob")
            .register(TypeCode::Json, "text");

        let mut functions = FunctionRegistry::standard();
        functions
            .register_template("year", Arity::Exact(1), "cast(strftime('%Y', ?1) as integer)")
            .register_template("month", Arity::Exact(1), "cast(strftime('%m', ?1) as integer)")
            .register_template("day", Arity::Exact(1), "cast(strftime('%d', ?1) as integer)")
            .register_template("hour", Arity::Exact(1), "cast(strftime('%H', ?1) as integer)")
            .register_template("minute", Arity::Exact(1), "cast(strftime('%M', ?1) as integer)")
            .register_template("second", Arity::Exact(1), "cast(strftime('%S', ?1) as integer)")
            .register_template("date_format", Arity::Exact(2), "strftime(?2, ?1)")
            .register_template(
                "dayofweek",
                Arity::Exact(1),
                "(cast(strftime('%w', ?1) as integer) + 1)",
            )
            .register_template("dayofmonth", Arity::Exact(1), "cast(strftime('%d', ?1) as integer)")
            .register_template("dayofyear", Arity::Exact(1), "cast(strftime('%j', ?1) as integer)")
            .register_infix("concat", " || ");

        Dialect {
            name: "sqlite",
            capability: Capability::SQLITE,
            types,
            functions,
            duplicate_key: DuplicateKeyTranslator::new(&[
                r"UNIQUE constraint failed: (?P<name>[^\s,:]+)",
            ]),
        }
    }
}
