use pretty_assertions::assert_eq;
use quarry_core::schema::app::*;
use quarry_core::stmt::Direction;

const USER: &str = r#"{
    "name": "User",
    "comment": "registered users",
    "fields": [
        { "name": "id", "type": "ID" },
        { "name": "name", "type": "STRING", "length": 64, "nullable": false },
        { "name": "email", "type": "STRING", "unique": true },
        { "name": "age", "type": "INT", "defaultValue": 18 },
        { "name": "balance", "type": "FLOAT", "precision": 10, "scale": 2 },
        { "name": "status", "type": "ENUM", "values": ["ACTIVE", "BLOCKED"] },
        { "name": "createdAt", "type": "DATETIME", "generatedValue": "NOW" },
        { "name": "roleId", "type": "LONG" },
        { "name": "role", "type": "RELATION", "from": "Role", "localField": "roleId", "foreignField": "id" },
        { "name": "posts", "type": "RELATION", "from": "Post", "localField": "id", "foreignField": "userId", "multiple": true, "cascadeDelete": true }
    ],
    "indexes": [
        { "fields": [{ "name": "name" }, { "name": "age", "direction": "DESC" }] }
    ]
}"#;

#[test]
fn parses_field_types() {
    let user = EntityDefinition::from_json(USER).unwrap();

    assert_eq!(user.name, "User");
    assert_eq!(user.comment.as_deref(), Some("registered users"));
    assert_eq!(user.fields.len(), 10);

    let name = user.get_field("name").unwrap();
    assert_eq!(name.ty, FieldType::String { length: Some(64) });
    assert!(!name.nullable);

    assert!(user.get_field("email").unwrap().unique);
    assert_eq!(
        user.get_field("age").unwrap().default,
        Some(DefaultValue::Literal(serde_json::json!(18)))
    );
    assert_eq!(
        user.get_field("balance").unwrap().ty,
        FieldType::Float {
            precision: Some(10),
            scale: Some(2)
        }
    );
    assert_eq!(
        user.get_field("createdAt").unwrap().generated_value(),
        Some(GeneratedValue::Now)
    );
}

#[test]
fn identity_defaults_to_auto_increment() {
    let user = EntityDefinition::from_json(USER).unwrap();
    let id = user.id_field().unwrap();

    assert!(id.is_id());
    assert!(!id.nullable);
    assert_eq!(id.generated_value(), Some(GeneratedValue::AutoIncrement));
}

#[test]
fn relations_are_not_columns() {
    let user = EntityDefinition::from_json(USER).unwrap();

    let columns: Vec<_> = user.columns().map(|field| field.name.as_str()).collect();
    assert_eq!(
        columns,
        ["id", "name", "email", "age", "balance", "status", "createdAt", "roleId"]
    );

    let posts = user.relation_to("post").unwrap();
    assert!(posts.multiple);
    assert!(posts.cascade_delete);
    assert_eq!(posts.foreign_field, "userId");

    let role = user.relation_to("Role").unwrap();
    assert!(!role.multiple);
}

#[test]
fn indexes_receive_derived_names() {
    let user = EntityDefinition::from_json(USER).unwrap();
    let index = &user.indexes[0];

    assert_eq!(index.model_name, "User");
    assert!(index.name.starts_with("idx_user_"));
    assert_eq!(index.fields[1].direction, Direction::Desc);

    // Same content, same name
    let again = EntityDefinition::from_json(USER).unwrap();
    assert_eq!(again.indexes[0].name, index.name);
}

#[test]
fn field_lookup_falls_back_to_case_insensitive() {
    let user = EntityDefinition::from_json(USER).unwrap();
    assert_eq!(user.get_field("CREATEDAT").unwrap().name, "createdAt");
    assert!(user.get_field("missing").is_none());
}

#[test]
fn rejects_duplicate_fields() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [
            { "name": "a", "type": "INT" },
            { "name": "A", "type": "LONG" }
        ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn rejects_second_identity() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [
            { "name": "id", "type": "ID" },
            { "name": "other", "type": "ID" }
        ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn rejects_relation_without_target() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [ { "name": "owner", "type": "RELATION" } ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn rejects_relation_with_partial_target() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [
            { "name": "owner", "type": "RELATION", "from": "User", "localField": "ownerId" }
        ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn rejects_default_and_generated_together() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [
            { "name": "id", "type": "ID" },
            { "name": "code", "type": "STRING", "defaultValue": "x", "generatedValue": "UUID" }
        ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn malformed_documents_are_not_schema_errors() {
    let err = EntityDefinition::from_json(r#"{ "name": "T", "fields": [ "#).unwrap_err();

    assert!(!err.is_invalid_schema());
}

#[test]
fn rejects_auto_increment_on_strings() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [
            { "name": "code", "type": "STRING", "generatedValue": "AUTO_INCREMENT" }
        ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn rejects_index_over_relation() {
    let err = EntityDefinition::from_json(
        r#"{ "name": "T", "fields": [
            { "name": "id", "type": "ID" },
            { "name": "self", "type": "RELATION", "from": "T", "localField": "id", "foreignField": "id" }
        ], "indexes": [ { "fields": [ { "name": "self" } ] } ] }"#,
    )
    .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn builder_matches_document() {
    let built = EntityDefinition::new("Role")
        .field(Field::id("id"))
        .field(Field::string("title").unique())
        .field(Field::relation(
            "users",
            RelationField::many("User", "id", "roleId"),
        ));

    built.validate().unwrap();

    let json = serde_json::to_string(&built).unwrap();
    let parsed = EntityDefinition::from_json(&json).unwrap();
    assert_eq!(parsed, built);
}
