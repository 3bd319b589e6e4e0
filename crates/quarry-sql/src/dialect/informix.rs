use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    pub fn informix() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "boolean")
            .register(TypeCode::SmallInt, "smallint")
            .register(TypeCode::Integer, "integer")
            .register(TypeCode::BigInt, "int8")
            .register(TypeCode::Double, "float")
            .register(TypeCode::Decimal, "decimal($p,$s)")
            .register(TypeCode::Char, "char($l)")
            .register(TypeCode::VarChar, "text")
            .register_with_capacity(TypeCode::VarChar, 255, "varchar($l)")
            .register_with_capacity(TypeCode::VarChar, 32_739, "lvarchar($l)")
            .register(TypeCode::LongVarChar, "text")
            .register(TypeCode::Date, "date")
            .register(TypeCode::Time, "datetime hour to second")
            .register(TypeCode::Timestamp, "datetime year to fraction(5)")
            .register(TypeCode::Blob, "blob")
            .register(TypeCode::Json, "lvarchar(32739)");

        let mut functions = FunctionRegistry::standard();
        functions
            .register_standard("year", Arity::Exact(1), "year")
            .register_standard("month", Arity::Exact(1), "month")
            .register_standard("day", Arity::Exact(1), "day")
            .register_template("hour", Arity::Exact(1), "to_number(to_char(?1, '%H'))")
            .register_template("minute", Arity::Exact(1), "to_number(to_char(?1, '%M'))")
            .register_template("second", Arity::Exact(1), "to_number(to_char(?1, '%S'))")
            .register_standard("date_format", Arity::Exact(2), "to_char")
            .register_template("dayofweek", Arity::Exact(1), "(weekday(?1) + 1)")
            .register_standard("dayofmonth", Arity::Exact(1), "day")
            .register_template("dayofyear", Arity::Exact(1), "(?1 - mdy(1, 1, year(?1)) + 1)")
            .register_infix("concat", " || ");

        Dialect {
            name: "informix",
            capability: Capability::INFORMIX,
            types,
            functions,
            duplicate_key: DuplicateKeyTranslator::new(&[
                r"Unique constraint \((?:[^.)]+\.)?(?P<name>[^)]+)\) violated",
            ]),
        }
    }
}
