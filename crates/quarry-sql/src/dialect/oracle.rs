use super::{Arity, Capability, Dialect, DuplicateKeyTranslator, FunctionRegistry, TypeNameRegistry};

use quarry_core::schema::db::TypeCode;

impl Dialect {
    pub fn oracle() -> Dialect {
        let mut types = TypeNameRegistry::new();
        types
            .register(TypeCode::Boolean, "number(1,0)")
            .register(TypeCode::SmallInt, "number(5,0)")
            .register(TypeCode::Integer, "number(10,0)")
            .register(TypeCode::BigInt, "number(19,0)")
            .register(TypeCode::Double, "binary_double")
            .register(TypeCode::Decimal, "number($p,$s)")
            .register(TypeCode::Char, "char($l char)")
            .register(TypeCode::VarChar, "clob")
            .register_with_capacity(TypeCode::VarChar, 4_000, "varchar2($l char)")
            .register(TypeCode::LongVarChar, "clob")
            .register(TypeCode::Date, "date")
            .register(TypeCode::Time, "date")
            .register(TypeCode::Timestamp, "timestamp")
            .register(TypeCode::Blob, "blob")
            .register(TypeCode::Json, "clob");

        let mut functions = FunctionRegistry::standard();
        functions
            .register_template("year", Arity::Exact(1), "extract(year from ?1)")
            .register_template("month", Arity::Exact(1), "extract(month from ?1)")
            .register_template("day", Arity::Exact(1), "extract(day from ?1)")
            .register_template("hour", Arity::Exact(1), "to_number(to_char(?1, 'HH24'))")
            .register_template("minute", Arity::Exact(1), "to_number(to_char(?1, 'MI'))")
            .register_template("second", Arity::Exact(1), "to_number(to_char(?1, 'SS'))")
            .register_standard("date_format", Arity::Exact(2), "to_char")
            .register_template("dayofweek", Arity::Exact(1), "to_number(to_char(?1, 'D'))")
            .register_template("dayofmonth", Arity::Exact(1), "extract(day from ?1)")
            .register_template("dayofyear", Arity::Exact(1), "to_number(to_char(?1, 'DDD'))")
            .register_infix("concat", " || ");

        Dialect {
            name: "oracle",
            capability: Capability::ORACLE,
            types,
            functions,
            duplicate_key: DuplicateKeyTranslator::new(&[
                r"ORA-00001: unique constraint \((?:[^.)]+\.)?(?P<name>[^)]+)\) violated",
            ]),
        }
    }
}
