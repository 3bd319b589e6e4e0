use pretty_assertions::assert_eq;
use quarry_core::{
    schema::db::{SqlColumn, TypeCode},
    stmt::Value,
};
use quarry_sql::Dialect;

fn type_name(dialect: &Dialect, code: TypeCode, length: Option<u32>) -> String {
    dialect.type_name(code, length, None, None).unwrap()
}

#[test]
fn resolves_dialects_by_name() {
    for (name, expect) in [
        ("MySQL", "mysql"),
        ("mariadb", "mariadb"),
        ("postgres", "postgresql"),
        ("PostgreSQL", "postgresql"),
        ("h2", "h2"),
        ("sqlite", "sqlite"),
        ("oracle", "oracle"),
        ("mssql", "sqlserver"),
        ("db2", "db2"),
        ("informix", "informix"),
    ] {
        assert_eq!(Dialect::from_name(name).unwrap().name, expect);
    }

    assert!(Dialect::from_name("access").unwrap_err().is_dialect());
}

#[test]
fn varchar_capacity_per_dialect() {
    let mysql = Dialect::mysql();
    assert_eq!(type_name(&mysql, TypeCode::VarChar, Some(100)), "varchar(100)");
    assert_eq!(type_name(&mysql, TypeCode::VarChar, Some(20_000)), "longtext");

    let oracle = Dialect::oracle();
    assert_eq!(type_name(&oracle, TypeCode::VarChar, Some(255)), "varchar2(255 char)");
    assert_eq!(type_name(&oracle, TypeCode::VarChar, Some(5_000)), "clob");

    let sqlserver = Dialect::sqlserver();
    assert_eq!(type_name(&sqlserver, TypeCode::VarChar, Some(300)), "nvarchar(300)");
    assert_eq!(type_name(&sqlserver, TypeCode::VarChar, Some(8_000)), "nvarchar(max)");

    let informix = Dialect::informix();
    assert_eq!(type_name(&informix, TypeCode::VarChar, Some(100)), "varchar(100)");
    assert_eq!(type_name(&informix, TypeCode::VarChar, Some(1_000)), "lvarchar(1000)");
    assert_eq!(type_name(&informix, TypeCode::VarChar, Some(40_000)), "text");
}

#[test]
fn vendor_type_names() {
    assert_eq!(type_name(&Dialect::sqlite(), TypeCode::BigInt, None), "integer");
    assert_eq!(type_name(&Dialect::sqlite(), TypeCode::Timestamp, None), "text");
    assert_eq!(type_name(&Dialect::postgresql(), TypeCode::Json, None), "jsonb");
    assert_eq!(type_name(&Dialect::h2(), TypeCode::Json, None), "json");
    assert_eq!(type_name(&Dialect::h2(), TypeCode::BigInt, None), "bigint");
    assert_eq!(type_name(&Dialect::oracle(), TypeCode::Boolean, None), "number(1,0)");
    assert_eq!(type_name(&Dialect::sqlserver(), TypeCode::Boolean, None), "bit");
    assert_eq!(type_name(&Dialect::db2(), TypeCode::Boolean, None), "smallint");
    assert_eq!(type_name(&Dialect::informix(), TypeCode::BigInt, None), "int8");

    assert_eq!(
        Dialect::mysql()
            .type_name(TypeCode::Decimal, None, Some(10), Some(2))
            .unwrap(),
        "decimal(10,2)"
    );
}

#[test]
fn registered_column_type_overrides() {
    let mut dialect = Dialect::postgresql();
    dialect.register_column_type(TypeCode::VarChar, Some(64), "varchar($l) collate \"C\"");

    assert_eq!(
        type_name(&dialect, TypeCode::VarChar, Some(32)),
        "varchar(32) collate \"C\""
    );
    assert_eq!(type_name(&dialect, TypeCode::VarChar, Some(65)), "varchar(65)");
}

#[test]
fn identity_columns_substitute_types() {
    let column = SqlColumn::new("id", TypeCode::BigInt).auto_increment();

    assert_eq!(Dialect::informix().column_type(&column).unwrap(), "SERIAL8");
    assert_eq!(Dialect::sqlite().column_type(&column).unwrap(), "INTEGER");
    assert_eq!(Dialect::mysql().column_type(&column).unwrap(), "bigint");
}

#[test]
fn quoted_identifiers_keep_their_case() {
    assert_eq!(Dialect::mysql().quote("User"), "`User`");
    assert_eq!(Dialect::postgresql().quote("userId"), "\"userId\"");
    assert_eq!(Dialect::oracle().quote("userId"), "\"userId\"");
    assert_eq!(Dialect::db2().quote("User"), "\"User\"");
    assert_eq!(Dialect::h2().quote("User"), "\"User\"");
    assert_eq!(Dialect::sqlserver().quote("User"), "[User]");
    assert_eq!(Dialect::informix().quote("User"), "user");
    assert_eq!(Dialect::sqlite().quote("a\"b"), "\"a\"\"b\"");
    assert_eq!(Dialect::sqlite().qualify("User", "name"), "\"User\".\"name\"");
}

#[test]
fn limit_strings() {
    let sql = "SELECT * FROM t";

    assert_eq!(Dialect::mysql().limit_string(sql, 0, 10, false), "SELECT * FROM t LIMIT 10");
    assert_eq!(
        Dialect::postgresql().limit_string(sql, 20, 10, false),
        "SELECT * FROM t LIMIT 10 OFFSET 20"
    );
    assert_eq!(
        Dialect::oracle().limit_string(sql, 20, 10, false),
        "SELECT * FROM t OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    assert_eq!(
        Dialect::sqlserver().limit_string(sql, 0, 10, false),
        "SELECT * FROM t ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    assert_eq!(
        Dialect::sqlserver().limit_string("SELECT * FROM t ORDER BY a ASC", 0, 10, true),
        "SELECT * FROM t ORDER BY a ASC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    assert_eq!(
        Dialect::db2().limit_string(sql, 5, 10, false),
        "SELECT * FROM t OFFSET 5 ROWS FETCH FIRST 10 ROWS ONLY"
    );
    assert_eq!(
        Dialect::informix().limit_string(sql, 5, 10, false),
        "SELECT SKIP 5 FIRST 10 * FROM t"
    );
    assert_eq!(
        Dialect::informix().limit_string(sql, 0, 10, false),
        "SELECT FIRST 10 * FROM t"
    );
}

#[test]
fn literals() {
    assert_eq!(Dialect::postgresql().literal(&Value::Bool(true)), "TRUE");
    assert_eq!(Dialect::sqlite().literal(&Value::Bool(true)), "1");
    assert_eq!(Dialect::oracle().literal(&Value::Bool(false)), "0");
    assert_eq!(Dialect::sqlite().literal(&Value::Null), "NULL");
    assert_eq!(Dialect::sqlite().literal(&Value::from("it's")), "'it''s'");
    assert_eq!(Dialect::mysql().literal(&Value::from("a\\b")), "'a\\\\b'");
    assert_eq!(Dialect::postgresql().literal(&Value::from("a\\b")), "'a\\b'");
    assert_eq!(
        Dialect::sqlite().literal(&Value::List(vec![Value::from(1), Value::from("x")])),
        "(1, 'x')"
    );
}

#[test]
fn functions() {
    let args = |args: &[&str]| args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();

    assert_eq!(
        Dialect::mysql().function_string("year", &args(&["`d`"])).unwrap(),
        "year(`d`)"
    );
    assert_eq!(
        Dialect::postgresql().function_string("YEAR", &args(&["\"d\""])).unwrap(),
        "extract(year from \"d\")"
    );
    assert_eq!(
        Dialect::sqlite().function_string("concat", &args(&["a", "b", "c"])).unwrap(),
        "(a || b || c)"
    );
    assert_eq!(
        Dialect::sqlite().function_string("date_format", &args(&["d", ":p0"])).unwrap(),
        "strftime(:p0, d)"
    );

    let err = Dialect::mysql().function_string("year", &args(&["a", "b"])).unwrap_err();
    assert!(err.is_dialect());

    let err = Dialect::mysql().function_string("soundex", &args(&["a"])).unwrap_err();
    assert!(err.is_dialect());
}

#[test]
fn registered_functions() {
    let mut dialect = Dialect::sqlite();
    dialect.register_function("soundex", quarry_sql::dialect::Arity::Exact(1), "soundex");

    assert_eq!(
        dialect.function_string("soundex", &["x".to_string()]).unwrap(),
        "soundex(x)"
    );
}

#[test]
fn duplicate_key_messages() {
    let cases = [
        (
            Dialect::mysql(),
            "Duplicate entry 'bob' for key 'user.uk_user_name'",
            "uk_user_name",
        ),
        (
            Dialect::mysql(),
            "Duplicate entry 'bob' for key 'uk_user_name'",
            "uk_user_name",
        ),
        (
            Dialect::postgresql(),
            "ERROR: duplicate key value violates unique constraint \"uk_user_name\"",
            "uk_user_name",
        ),
        (
            Dialect::sqlite(),
            "UNIQUE constraint failed: User.name",
            "User.name",
        ),
        (
            Dialect::sqlite(),
            "UNIQUE constraint failed: User.name: Error code 2067: A UNIQUE constraint failed",
            "User.name",
        ),
        (
            Dialect::oracle(),
            "ORA-00001: unique constraint (APP.UK_USER_NAME) violated",
            "UK_USER_NAME",
        ),
        (
            Dialect::sqlserver(),
            "Violation of UNIQUE KEY constraint 'uk_user_name'. Cannot insert duplicate key.",
            "uk_user_name",
        ),
    ];

    for (dialect, message, name) in cases {
        assert_eq!(
            dialect.translate_duplicate_key(message).as_deref(),
            Some(name),
            "{}",
            dialect.name
        );
    }

    assert_eq!(
        Dialect::sqlite().translate_duplicate_key("no such table: User"),
        None
    );
}

#[test]
fn existing_object_messages() {
    let dialect = Dialect::sqlite();

    for message in [
        "table \"Note\" already exists",
        "duplicate column name: title",
        "Duplicate column name 'title'",
        "ORA-01430: column being added already exists in table",
        "There is already an object named 'Note' in the database.",
    ] {
        assert!(dialect.reports_existing_object(message), "{message}");
    }

    assert!(!dialect.reports_existing_object("disk I/O error"));
    assert!(!dialect.reports_existing_object("no such table: Note"));
}
