use pretty_assertions::assert_eq;
use quarry_core::schema::{app::*, db::*};
use quarry_core::stmt::Value;

fn article() -> EntityDefinition {
    EntityDefinition::new("Article")
        .comment("blog articles")
        .field(Field::id("id"))
        .field(Field::string("slug").unique())
        .field(Field::new("title", FieldType::String { length: Some(120) }).nullable(false))
        .field(Field::new("views", FieldType::Int).default_value(serde_json::json!(0)))
        .field(Field::new(
            "price",
            FieldType::Float {
                precision: Some(8),
                scale: None,
            },
        ))
        .field(Field::new("ratio", FieldType::Float { precision: None, scale: None }))
        .field(Field::new("published", FieldType::Boolean))
        .field(Field::new("createdAt", FieldType::DateTime).generated(GeneratedValue::Now))
        .field(Field::new(
            "state",
            FieldType::Enum {
                values: vec!["DRAFT".into(), "PUBLISHED".into()],
            },
        ))
        .field(Field::long("authorId"))
        .field(Field::relation(
            "author",
            RelationField::one("User", "authorId", "id"),
        ))
        .index(IndexDefinition::new("Article", ["authorId", "createdAt"]))
}

#[test]
fn maps_entity_to_table() {
    let table = SqlTable::from_entity(&article()).unwrap();

    assert_eq!(table.name, "Article");
    assert_eq!(table.comment.as_deref(), Some("blog articles"));
    assert_eq!(table.columns.len(), 10);
    assert!(table.column("author").is_none());

    let pk = table.primary_key.as_ref().unwrap();
    assert_eq!(pk.columns, ["id"]);

    let id = table.column("id").unwrap();
    assert_eq!(id.type_code, TypeCode::BigInt);
    assert!(id.auto_increment);
    assert!(id.primary_key);
    assert!(!id.nullable);
}

#[test]
fn maps_column_types() {
    let table = SqlTable::from_entity(&article()).unwrap();

    let slug = table.column("slug").unwrap();
    assert_eq!(slug.type_code, TypeCode::VarChar);
    assert_eq!(slug.length, Some(255));
    assert!(slug.unique);

    let title = table.column("TITLE").unwrap();
    assert_eq!(title.length, Some(120));
    assert!(!title.nullable);

    let price = table.column("price").unwrap();
    assert_eq!(price.type_code, TypeCode::Decimal);
    assert_eq!((price.precision, price.scale), (Some(8), Some(0)));

    assert_eq!(table.column("ratio").unwrap().type_code, TypeCode::Double);
    assert_eq!(table.column("published").unwrap().type_code, TypeCode::Boolean);

    let state = table.column("state").unwrap();
    assert_eq!(state.type_code, TypeCode::VarChar);
    assert_eq!(state.length, Some(9));
}

#[test]
fn maps_defaults() {
    let table = SqlTable::from_entity(&article()).unwrap();

    assert_eq!(
        table.column("views").unwrap().default,
        Some(ColumnDefault::Value(Value::I64(0)))
    );
    assert_eq!(
        table.column("createdAt").unwrap().default,
        Some(ColumnDefault::CurrentTimestamp)
    );
}

#[test]
fn maps_generated_identities() {
    let uuid = SqlColumn::from_field(&Field::id("id").generated(GeneratedValue::Uuid))
        .unwrap()
        .unwrap();
    assert_eq!((uuid.type_code, uuid.length), (TypeCode::VarChar, Some(36)));
    assert!(!uuid.auto_increment);

    let ulid = SqlColumn::from_field(&Field::id("id").generated(GeneratedValue::Ulid))
        .unwrap()
        .unwrap();
    assert_eq!((ulid.type_code, ulid.length), (TypeCode::Char, Some(26)));
}

#[test]
fn unique_columns_imply_unique_keys() {
    let table = SqlTable::from_entity(&article()).unwrap();
    let keys = table.all_unique_keys();

    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].columns, ["slug"]);
    assert_eq!(keys[0].table, "Article");
}

#[test]
fn maps_indexes() {
    let table = SqlTable::from_entity(&article()).unwrap();

    assert_eq!(table.indexes.len(), 1);
    let index = &table.indexes[0];
    assert_eq!(index.table, "Article");
    assert!(!index.unique);
    assert_eq!(
        index.columns.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
        ["authorId", "createdAt"]
    );
}

#[test]
fn column_diff_ignores_unique_flag() {
    let table = SqlTable::from_entity(&article()).unwrap();
    let slug = table.column("slug").unwrap();

    let mut changed = slug.clone();
    changed.unique = false;
    assert!(!slug.has_diff(&changed));

    changed.length = Some(64);
    assert!(slug.has_diff(&changed));
}
