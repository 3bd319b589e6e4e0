use super::{ColumnDefault, SqlColumn, SqlIndex, SqlTable, TypeCode};
use crate::{
    schema::app::{DefaultValue, EntityDefinition, Field, FieldType, GeneratedValue, IndexDefinition},
    stmt::Value,
    Result,
};

/// Length of string columns that declare none.
const DEFAULT_STRING_LENGTH: u32 = 255;

const UUID_LENGTH: u32 = 36;

const ULID_LENGTH: u32 = 26;

impl SqlTable {
    /// Maps an entity to its physical table. Relation fields are skipped; the
    /// identity field becomes the primary key.
    pub fn from_entity(entity: &EntityDefinition) -> Result<SqlTable> {
        let mut table = SqlTable::new(&entity.name);
        table.comment = entity.comment.clone();

        for field in entity.columns() {
            if let Some(column) = SqlColumn::from_field(field)? {
                table.add_column(column)?;
            }
        }

        if let Some(id) = entity.id_field() {
            table.set_primary_key([id.name.clone()])?;
        }

        table.indexes = entity
            .indexes
            .iter()
            .map(|index| SqlIndex::from_definition(index, &entity.name))
            .collect();

        Ok(table)
    }
}

impl SqlColumn {
    /// Maps a field to a column, or `None` for relation fields.
    pub fn from_field(field: &Field) -> Result<Option<SqlColumn>> {
        let mut column = match &field.ty {
            FieldType::Id => match field.generated_value() {
                Some(GeneratedValue::Uuid) => {
                    SqlColumn::new(&field.name, TypeCode::VarChar).length(UUID_LENGTH)
                }
                Some(GeneratedValue::Ulid) => {
                    SqlColumn::new(&field.name, TypeCode::Char).length(ULID_LENGTH)
                }
                _ => SqlColumn::new(&field.name, TypeCode::BigInt).auto_increment(),
            },
            FieldType::String { length } => SqlColumn::new(&field.name, TypeCode::VarChar)
                .length(length.unwrap_or(DEFAULT_STRING_LENGTH)),
            FieldType::Int => SqlColumn::new(&field.name, TypeCode::Integer),
            FieldType::Long => {
                let column = SqlColumn::new(&field.name, TypeCode::BigInt);
                match field.generated_value() {
                    Some(GeneratedValue::AutoIncrement) => column.auto_increment(),
                    _ => column,
                }
            }
            FieldType::Float {
                precision: Some(precision),
                scale,
            } => SqlColumn::new(&field.name, TypeCode::Decimal)
                .precision(*precision, scale.unwrap_or(0)),
            FieldType::Float { precision: None, .. } => {
                SqlColumn::new(&field.name, TypeCode::Double)
            }
            FieldType::Boolean => SqlColumn::new(&field.name, TypeCode::Boolean),
            FieldType::DateTime => SqlColumn::new(&field.name, TypeCode::Timestamp),
            FieldType::Date => SqlColumn::new(&field.name, TypeCode::Date),
            FieldType::Time => SqlColumn::new(&field.name, TypeCode::Time),
            FieldType::Json => SqlColumn::new(&field.name, TypeCode::Json),
            FieldType::Enum { values } => {
                let longest = values.iter().map(|value| value.len()).max().unwrap_or(1);
                SqlColumn::new(&field.name, TypeCode::VarChar).length(longest.max(1) as u32)
            }
            FieldType::Relation(_) => return Ok(None),
        };

        column.nullable = field.nullable && !field.is_id();
        column.unique = field.unique;
        column.comment = field.comment.clone();
        column.default = match &field.default {
            Some(DefaultValue::Literal(value)) => Some(ColumnDefault::Value(Value::from_json(value)?)),
            Some(DefaultValue::Generated(GeneratedValue::Now)) => {
                Some(ColumnDefault::CurrentTimestamp)
            }
            _ => None,
        };

        Ok(Some(column))
    }
}

impl SqlIndex {
    pub fn from_definition(index: &IndexDefinition, table: &str) -> SqlIndex {
        SqlIndex {
            name: index.name.clone(),
            table: table.to_string(),
            unique: index.unique,
            columns: index
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.direction))
                .collect(),
        }
    }
}
