use pretty_assertions::assert_eq;
use quarry_core::{
    schema::db::{
        ColumnDefault, SqlColumn, SqlForeignKey, SqlIndex, SqlSequence, SqlTable, SqlUniqueKey,
        TypeCode,
    },
    stmt::{Direction, Value},
};
use quarry_sql::{Dialect, Exporter};

fn user_table() -> SqlTable {
    let mut table = SqlTable::new("User");
    table
        .add_column(SqlColumn::new("id", TypeCode::BigInt).auto_increment())
        .unwrap();
    table
        .add_column(
            SqlColumn::new("name", TypeCode::VarChar)
                .length(50)
                .not_null()
                .unique(),
        )
        .unwrap();
    table
        .add_column(SqlColumn::new("age", TypeCode::Integer))
        .unwrap();
    table.set_primary_key(["id"]).unwrap();
    table
}

#[test]
fn sqlite_declares_identity_inline_and_unique_keys_as_indexes() {
    let dialect = Dialect::sqlite();
    let sql = dialect.table_exporter().sql_create_strings(&user_table()).unwrap();

    assert_eq!(
        sql,
        vec![
            "CREATE TABLE \"User\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"name\" varchar(50) NOT NULL, \"age\" integer)",
            "CREATE UNIQUE INDEX \"uk_user_name\" ON \"User\" (\"name\")",
        ]
    );
}

#[test]
fn sqlite_rejects_identity_outside_primary_key() {
    let dialect = Dialect::sqlite();
    let mut table = SqlTable::new("Counter");
    table
        .add_column(SqlColumn::new("code", TypeCode::VarChar).length(10))
        .unwrap();
    table
        .add_column(SqlColumn::new("seq", TypeCode::BigInt).auto_increment())
        .unwrap();
    table.set_primary_key(["code"]).unwrap();

    let err = dialect.table_exporter().sql_create_strings(&table).unwrap_err();
    assert!(err.is_dialect());
}

#[test]
fn mysql_comments_are_inline() {
    let dialect = Dialect::mysql();
    let mut table = user_table();
    table.comment = Some("people".to_string());
    table.columns[2].comment = Some("years".to_string());

    let sql = dialect.table_exporter().sql_create_strings(&table).unwrap();
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE `User` (`id` bigint AUTO_INCREMENT NOT NULL, \
             `name` varchar(50) NOT NULL, `age` integer COMMENT 'years', \
             PRIMARY KEY (`id`), CONSTRAINT `uk_user_name` UNIQUE (`name`)) COMMENT='people'"
        ]
    );
}

#[test]
fn postgresql_comments_follow_create() {
    let dialect = Dialect::postgresql();
    let mut table = user_table();
    table.comment = Some("people".to_string());
    table.columns[2].comment = Some("years".to_string());

    let sql = dialect.table_exporter().sql_create_strings(&table).unwrap();
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE \"User\" (\"id\" int8 GENERATED BY DEFAULT AS IDENTITY NOT NULL, \
             \"name\" varchar(50) NOT NULL, \"age\" int4, \
             PRIMARY KEY (\"id\"), CONSTRAINT \"uk_user_name\" UNIQUE (\"name\"))",
            "COMMENT ON TABLE \"User\" IS 'people'",
            "COMMENT ON COLUMN \"User\".\"age\" IS 'years'",
        ]
    );
}

#[test]
fn drop_table() {
    let table = user_table();

    assert_eq!(
        Dialect::postgresql().table_exporter().sql_drop_strings(&table).unwrap(),
        vec!["DROP TABLE IF EXISTS \"User\" CASCADE"]
    );
    assert_eq!(
        Dialect::oracle().table_exporter().sql_drop_strings(&table).unwrap(),
        vec!["DROP TABLE \"User\" CASCADE CONSTRAINTS"]
    );
    assert_eq!(
        Dialect::mysql().table_exporter().sql_drop_strings(&table).unwrap(),
        vec!["DROP TABLE IF EXISTS `User`"]
    );
}

#[test]
fn column_defaults() {
    let dialect = Dialect::sqlite();
    let columns = dialect.column_exporter("User");

    let active = SqlColumn::new("active", TypeCode::Boolean)
        .not_null()
        .default(ColumnDefault::Value(Value::Bool(true)));
    assert_eq!(
        columns.sql_create_strings(&active).unwrap(),
        vec!["ALTER TABLE \"User\" ADD COLUMN \"active\" boolean DEFAULT 1 NOT NULL"]
    );

    let created = SqlColumn::new("created", TypeCode::Timestamp)
        .default(ColumnDefault::CurrentTimestamp);
    assert_eq!(
        columns.sql_create_strings(&created).unwrap(),
        vec!["ALTER TABLE \"User\" ADD COLUMN \"created\" text DEFAULT CURRENT_TIMESTAMP"]
    );
}

#[test]
fn alter_column_per_dialect() {
    let column = SqlColumn::new("name", TypeCode::VarChar).length(100).not_null();

    assert_eq!(
        Dialect::mysql().column_exporter("User").sql_alter_strings(&column).unwrap(),
        vec!["ALTER TABLE `User` MODIFY COLUMN `name` varchar(100) NOT NULL"]
    );
    assert_eq!(
        Dialect::oracle().column_exporter("User").sql_alter_strings(&column).unwrap(),
        vec!["ALTER TABLE \"User\" MODIFY (\"name\" varchar2(100 char) NOT NULL)"]
    );
    let sqlserver = Dialect::sqlserver().column_exporter("User").sql_alter_strings(&column).unwrap();
    assert_eq!(sqlserver.len(), 2);
    assert!(sqlserver[0].contains("sys.default_constraints"));
    assert_eq!(sqlserver[1], "ALTER TABLE [User] ALTER COLUMN [name] nvarchar(100) NOT NULL");
    assert_eq!(
        Dialect::postgresql().column_exporter("User").sql_alter_strings(&column).unwrap(),
        vec![
            "ALTER TABLE \"User\" ALTER COLUMN \"name\" TYPE varchar(100)",
            "ALTER TABLE \"User\" ALTER COLUMN \"name\" SET NOT NULL",
            "ALTER TABLE \"User\" ALTER COLUMN \"name\" DROP DEFAULT",
        ]
    );
    assert_eq!(
        Dialect::db2().column_exporter("User").sql_alter_strings(&column).unwrap()[0],
        "ALTER TABLE \"User\" ALTER COLUMN \"name\" SET DATA TYPE varchar(100)"
    );

    let err = Dialect::sqlite()
        .column_exporter("User")
        .sql_alter_strings(&column)
        .unwrap_err();
    assert!(err.is_dialect());
}

#[test]
fn sqlserver_alter_replaces_the_default_constraint() {
    let dialect = Dialect::sqlserver();
    let column = SqlColumn::new("age", TypeCode::Integer)
        .default(ColumnDefault::Value(Value::I64(18)));

    let sql = dialect.column_exporter("User").sql_alter_strings(&column).unwrap();
    assert_eq!(sql.len(), 3);
    assert!(sql[0].contains("OBJECT_ID('[User]')"));
    assert!(sql[0].contains("c.name = 'age'"));
    assert_eq!(sql[1], "ALTER TABLE [User] ALTER COLUMN [age] int NULL");
    assert_eq!(sql[2], "ALTER TABLE [User] ADD DEFAULT 18 FOR [age]");
}

#[test]
fn oracle_adds_and_drops_parenthesized() {
    let dialect = Dialect::oracle();
    let column = SqlColumn::new("age", TypeCode::Integer);
    let columns = dialect.column_exporter("User");

    let add = columns.sql_create_strings(&column).unwrap();
    assert_eq!(add.len(), 1);
    assert!(add[0].starts_with("ALTER TABLE \"User\" ADD (\"age\" "), "{}", add[0]);
    assert!(add[0].ends_with(')'));

    assert_eq!(
        columns.sql_drop_strings(&column).unwrap(),
        vec!["ALTER TABLE \"User\" DROP (\"age\")"]
    );
}

#[test]
fn sqlserver_drops_default_constraint_before_column() {
    let dialect = Dialect::sqlserver();
    let column = SqlColumn::new("age", TypeCode::Integer);

    let sql = dialect.column_exporter("User").sql_drop_strings(&column).unwrap();
    assert_eq!(sql.len(), 2);
    assert!(sql[0].contains("sys.default_constraints"));
    assert!(sql[0].contains("OBJECT_ID('[User]')"));
    assert_eq!(sql[1], "ALTER TABLE [User] DROP COLUMN [age]");
}

#[test]
fn indexes() {
    let index = SqlIndex::new("idx_user_name_age", "User")
        .column("name", Direction::Asc)
        .column("age", Direction::Desc);

    assert_eq!(
        Dialect::sqlite().index_exporter().sql_create_strings(&index).unwrap(),
        vec!["CREATE INDEX \"idx_user_name_age\" ON \"User\" (\"name\" ASC, \"age\" DESC)"]
    );
    assert_eq!(
        Dialect::sqlite().index_exporter().sql_drop_strings(&index).unwrap(),
        vec!["DROP INDEX IF EXISTS \"idx_user_name_age\""]
    );
    assert_eq!(
        Dialect::mysql().index_exporter().sql_drop_strings(&index).unwrap(),
        vec!["DROP INDEX `idx_user_name_age` ON `User`"]
    );
    assert_eq!(
        Dialect::oracle()
            .index_exporter()
            .sql_create_strings(&index.clone().unique())
            .unwrap(),
        vec!["CREATE UNIQUE INDEX \"idx_user_name_age\" ON \"User\" (\"name\" ASC, \"age\" DESC)"]
    );
}

#[test]
fn unique_keys() {
    let key = SqlUniqueKey::for_column("User", "name");

    assert_eq!(
        Dialect::postgresql().unique_key_exporter().sql_create_strings(&key).unwrap(),
        vec!["ALTER TABLE \"User\" ADD CONSTRAINT \"uk_user_name\" UNIQUE (\"name\")"]
    );
    assert_eq!(
        Dialect::mysql().unique_key_exporter().sql_drop_strings(&key).unwrap(),
        vec!["ALTER TABLE `User` DROP INDEX `uk_user_name`"]
    );
    assert_eq!(
        Dialect::sqlite().unique_key_exporter().sql_create_strings(&key).unwrap(),
        vec!["CREATE UNIQUE INDEX \"uk_user_name\" ON \"User\" (\"name\")"]
    );
    assert_eq!(
        Dialect::sqlite().unique_key_exporter().sql_drop_strings(&key).unwrap(),
        vec!["DROP INDEX IF EXISTS \"uk_user_name\""]
    );
}

#[test]
fn foreign_keys() {
    let key = SqlForeignKey {
        name: "fk_order_user".to_string(),
        table: "Order".to_string(),
        columns: vec!["user_id".to_string()],
        referenced_table: "User".to_string(),
        referenced_columns: vec!["id".to_string()],
        cascade_delete: true,
    };

    assert_eq!(
        Dialect::mysql().foreign_key_exporter().sql_create_strings(&key).unwrap(),
        vec![
            "ALTER TABLE `Order` ADD CONSTRAINT `fk_order_user` FOREIGN KEY (`user_id`) \
             REFERENCES `User` (`id`) ON DELETE CASCADE"
        ]
    );
    assert_eq!(
        Dialect::mysql().foreign_key_exporter().sql_drop_strings(&key).unwrap(),
        vec!["ALTER TABLE `Order` DROP FOREIGN KEY `fk_order_user`"]
    );

    let err = Dialect::sqlite()
        .foreign_key_exporter()
        .sql_create_strings(&key)
        .unwrap_err();
    assert!(err.is_dialect());
}

#[test]
fn sequences() {
    let mut sequence = SqlSequence::new("order_no");
    sequence.start = 1000;
    sequence.increment = 5;

    assert_eq!(
        Dialect::postgresql().sequence_exporter().sql_create_strings(&sequence).unwrap(),
        vec!["CREATE SEQUENCE \"order_no\" START WITH 1000 INCREMENT BY 5"]
    );
    assert_eq!(
        Dialect::postgresql().sequence_exporter().sql_next_value_strings(&sequence),
        vec!["SELECT nextval('\"order_no\"')"]
    );
    assert_eq!(
        Dialect::oracle().sequence_exporter().sql_next_value_strings(&sequence),
        vec!["SELECT \"order_no\".NEXTVAL FROM dual"]
    );
    assert_eq!(
        Dialect::sqlserver().sequence_exporter().sql_next_value_strings(&sequence),
        vec!["SELECT NEXT VALUE FOR [order_no]"]
    );

    let sqlite = Dialect::sqlite();
    assert_eq!(
        sqlite.sequence_exporter().sql_create_strings(&sequence).unwrap(),
        vec![
            "CREATE TABLE \"order_no\" (\"next_val\" integer NOT NULL)",
            "INSERT INTO \"order_no\" (\"next_val\") VALUES (1000)",
        ]
    );
    assert_eq!(
        sqlite.sequence_exporter().sql_next_value_strings(&sequence),
        vec![
            "SELECT \"next_val\" FROM \"order_no\"",
            "UPDATE \"order_no\" SET \"next_val\" = \"next_val\" + 5 WHERE \"next_val\" = :p0",
        ]
    );
    assert_eq!(
        sqlite.sequence_exporter().sql_drop_strings(&sequence).unwrap(),
        vec!["DROP TABLE IF EXISTS \"order_no\""]
    );
}
