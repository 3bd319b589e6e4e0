use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{
        app::{EntityDefinition, Field, RelationField},
        ModelRegistry,
    },
    stmt::{Join, Projection, Query, QueryCall, Row, Sort, Value},
};
use quarry_sql::{Dialect, QueryCompiler};
use serde_json::json;

fn models() -> ModelRegistry {
    let models = ModelRegistry::new();
    models.insert(
        EntityDefinition::new("User")
            .field(Field::id("id"))
            .field(Field::string("name"))
            .field(Field::int("age"))
            .field(Field::string("status"))
            .field(Field::relation(
                "orders",
                RelationField::many("Order", "id", "userId"),
            )),
    );
    models.insert(
        EntityDefinition::new("Order")
            .field(Field::id("id"))
            .field(Field::long("userId"))
            .field(Field::int("total"))
            .field(Field::relation("user", RelationField::one("User", "userId", "id"))),
    );
    models.insert(
        EntityDefinition::new("Tag")
            .field(Field::id("id"))
            .field(Field::string("label")),
    );
    models
}

#[test]
fn select_with_filter_sort_and_page() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("User")
        .filter(json!({">": [{"field": "age"}, 18]}))
        .sort(Sort::new().asc("name"))
        .page(2, 10);

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();

    assert_eq!(
        compiled.statement.sql,
        "SELECT \"id\", \"name\", \"age\", \"status\" FROM \"User\" \
         WHERE \"age\" > :p0 ORDER BY \"name\" ASC LIMIT 10 OFFSET 10"
    );
    assert_eq!(compiled.statement.params.get("p0"), Some(&Value::I64(18)));
    assert_eq!(compiled.entity.name, "User");
    assert!(compiled.relations.is_empty());
}

#[test]
fn pagination_without_order_on_sqlserver() {
    let dialect = Dialect::sqlserver();
    let models = models();
    let query = Query::new("User").page(1, 10);

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();
    assert_eq!(
        compiled.statement.sql,
        "SELECT [id], [name], [age], [status] FROM [User] \
         ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn projected_relations_select_their_local_field() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("User")
        .projection(Projection::new().field("name").field("orders"))
        .nested(true);

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();

    assert_eq!(
        compiled.statement.sql,
        "SELECT \"name\" AS \"name\", \"id\" AS \"id\" FROM \"User\""
    );
    assert_eq!(compiled.relations, vec!["orders".to_string()]);
    assert_eq!(compiled.hidden, vec!["id".to_string()]);
}

#[test]
fn relations_are_skipped_unless_nested() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("User").projection(Projection::new().field("name").field("orders"));

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();

    assert_eq!(compiled.statement.sql, "SELECT \"name\" AS \"name\" FROM \"User\"");
    assert!(compiled.relations.is_empty());
    assert!(compiled.hidden.is_empty());
}

#[test]
fn join_keys_come_from_declared_relation() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("Order")
        .join(Join::inner("User").alias("u"))
        .projection(Projection::new().field("total").field("u.name"))
        .filter(json!({"==": [{"field": "u.status"}, "ACTIVE"]}));

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();

    assert_eq!(
        compiled.statement.sql,
        "SELECT \"Order\".\"total\" AS \"total\", \"u\".\"name\" AS \"name\" \
         FROM \"Order\" INNER JOIN \"User\" \"u\" ON \"Order\".\"userId\" = \"u\".\"id\" \
         WHERE \"u\".\"status\" = :p0"
    );
}

#[test]
fn join_filters_are_inlined() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("Order").join(
        Join::left("User").filter(json!({"==": [{"field": "status"}, "ACTIVE"]})),
    );

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();

    assert_eq!(
        compiled.statement.sql,
        "SELECT \"Order\".\"id\" AS \"id\", \"Order\".\"userId\" AS \"userId\", \
         \"Order\".\"total\" AS \"total\" FROM \"Order\" \
         LEFT JOIN \"User\" ON \"Order\".\"userId\" = \"User\".\"id\" \
         AND (\"User\".\"status\" = 'ACTIVE')"
    );
    assert!(compiled.statement.params.is_empty());
}

#[test]
fn explicit_join_keys() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("User")
        .join(Join::inner("Tag").alias("t").on("name", "label"))
        .projection(Projection::new().field("id"));

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();
    assert_eq!(
        compiled.statement.sql,
        "SELECT \"User\".\"id\" AS \"id\" FROM \"User\" \
         INNER JOIN \"Tag\" \"t\" ON \"User\".\"name\" = \"t\".\"label\""
    );
}

#[test]
fn unresolvable_joins_fail() {
    let dialect = Dialect::sqlite();
    let models = models();
    let compiler = QueryCompiler::new(&dialect, &models);

    let err = compiler
        .compile(&Query::new("User").join(Join::inner("Tag")))
        .unwrap_err();
    assert!(err.is_sql_execution());

    let err = compiler
        .compile(
            &Query::new("Order")
                .join(Join::inner("User").alias("u"))
                .join(Join::left("User").alias("u")),
        )
        .unwrap_err();
    assert!(err.is_sql_execution());

    let err = compiler
        .compile(
            &Query::new("Order")
                .join(Join::inner("User").alias("u"))
                .filter(json!({"==": [{"field": "x.name"}, "bob"]})),
        )
        .unwrap_err();
    assert!(err.is_sql_execution());

    let err = compiler.compile(&Query::new("Nope")).unwrap_err();
    assert!(err.is_sql_execution());
}

#[test]
fn aggregates_with_group_by() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("Order")
        .projection(
            Projection::new()
                .field("userId")
                .call("spent", QueryCall::sum("total"))
                .call("n", QueryCall::count_all()),
        )
        .group_by(["userId"])
        .sort(Sort::new().desc("spent"));

    let compiled = QueryCompiler::new(&dialect, &models).compile(&query).unwrap();

    assert_eq!(
        compiled.statement.sql,
        "SELECT \"userId\" AS \"userId\", sum(\"total\") AS \"spent\", count(*) AS \"n\" \
         FROM \"Order\" GROUP BY \"userId\" ORDER BY \"spent\" DESC"
    );
}

#[test]
fn ungrouped_fields_are_rejected() {
    let dialect = Dialect::sqlite();
    let models = models();
    let query = Query::new("Order")
        .projection(
            Projection::new()
                .field("userId")
                .field("total")
                .call("n", QueryCall::count_all()),
        )
        .group_by(["userId"]);

    let err = QueryCompiler::new(&dialect, &models).compile(&query).unwrap_err();
    assert!(err.is_ungrouped_field());
}

#[test]
fn counts() {
    let dialect = Dialect::sqlite();
    let models = models();
    let compiler = QueryCompiler::new(&dialect, &models);

    let count = compiler
        .compile_count(
            &Query::new("User")
                .filter(json!({">": [{"field": "age"}, 18]}))
                .sort(Sort::new().asc("name"))
                .page(3, 5),
        )
        .unwrap();
    assert_eq!(count.sql, "SELECT COUNT(*) FROM \"User\" WHERE \"age\" > :p0");
    assert_eq!(count.params.len(), 1);

    let count = compiler
        .compile_count(&Query::new("Order").group_by(["userId"]))
        .unwrap();
    assert_eq!(
        count.sql,
        "SELECT COUNT(*) FROM (SELECT \"userId\" FROM \"Order\" GROUP BY \"userId\") q"
    );
}

#[test]
fn mutations() {
    let dialect = Dialect::sqlite();
    let models = models();
    let compiler = QueryCompiler::new(&dialect, &models);
    let user = models.get("User").unwrap();

    let row: Row = [
        ("name".to_string(), Value::from("bob")),
        ("age".to_string(), Value::from(18)),
    ]
    .into_iter()
    .collect();

    let insert = compiler.compile_insert(&user, &row).unwrap();
    assert_eq!(
        insert.sql,
        "INSERT INTO \"User\" (\"name\", \"age\") VALUES (:p0, :p1)"
    );
    assert_eq!(insert.params.get("p0"), Some(&Value::from("bob")));

    let insert = compiler.compile_insert(&user, &Row::new()).unwrap();
    assert_eq!(insert.sql, "INSERT INTO \"User\" DEFAULT VALUES");

    let update = compiler.compile_update(&user, &Value::I64(7), &row).unwrap();
    assert_eq!(
        update.sql,
        "UPDATE \"User\" SET \"name\" = :p0, \"age\" = :p1 WHERE \"id\" = :p2"
    );
    assert_eq!(update.params.get("p2"), Some(&Value::I64(7)));

    assert!(compiler
        .compile_update(&user, &Value::I64(7), &Row::new())
        .unwrap_err()
        .is_sql_execution());

    let delete = compiler.compile_delete_by_id(&user, &Value::I64(7)).unwrap();
    assert_eq!(delete.sql, "DELETE FROM \"User\" WHERE \"id\" = :p0");

    let order = models.get("Order").unwrap();
    let delete = compiler
        .compile_delete(&order, "userId", &Value::I64(7))
        .unwrap();
    assert_eq!(delete.sql, "DELETE FROM \"Order\" WHERE \"userId\" = :p0");

    let bad: Row = [("orders".to_string(), Value::Null)].into_iter().collect();
    assert!(compiler.compile_insert(&user, &bad).unwrap_err().is_sql_execution());
}
