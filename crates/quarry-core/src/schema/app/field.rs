use super::RelationField;
use crate::{Error, Result};

use serde::{Deserialize, Serialize};

/// A field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldDoc", into = "FieldDoc")]
pub struct Field {
    pub name: String,

    pub ty: FieldType,

    pub nullable: bool,

    pub unique: bool,

    pub comment: Option<String>,

    pub default: Option<DefaultValue>,
}

/// The closed set of logical field types.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// The identity field. Generated by auto-increment unless the field's
    /// default names another generator.
    Id,
    String {
        length: Option<u32>,
    },
    Int,
    Long,
    Float {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Boolean,
    DateTime,
    Date,
    Time,
    Json,
    Enum {
        values: Vec<String>,
    },
    Relation(RelationField),
}

/// Discriminant of [`FieldType`], used as a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldKind {
    #[serde(alias = "Id", alias = "id")]
    Id,
    #[serde(alias = "String", alias = "string")]
    String,
    #[serde(alias = "Int", alias = "int", alias = "INTEGER", alias = "Integer")]
    Int,
    #[serde(alias = "Long", alias = "long")]
    Long,
    #[serde(alias = "Float", alias = "float")]
    Float,
    #[serde(alias = "Boolean", alias = "boolean")]
    Boolean,
    #[serde(alias = "DateTime", alias = "datetime")]
    DateTime,
    #[serde(alias = "Date", alias = "date")]
    Date,
    #[serde(alias = "Time", alias = "time")]
    Time,
    #[serde(alias = "Json", alias = "json")]
    Json,
    #[serde(alias = "Enum", alias = "enum")]
    Enum,
    #[serde(alias = "Relation", alias = "relation")]
    Relation,
}

/// Default of a field: a literal, or a value produced when a row is inserted.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(serde_json::Value),
    Generated(GeneratedValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratedValue {
    AutoIncrement,
    Uuid,
    Ulid,
    Now,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Field {
        let nullable = !matches!(ty, FieldType::Id);
        Field {
            name: name.into(),
            ty,
            nullable,
            unique: false,
            comment: None,
            default: None,
        }
    }

    pub fn id(name: impl Into<String>) -> Field {
        Field::new(name, FieldType::Id)
    }

    pub fn string(name: impl Into<String>) -> Field {
        Field::new(name, FieldType::String { length: None })
    }

    pub fn int(name: impl Into<String>) -> Field {
        Field::new(name, FieldType::Int)
    }

    pub fn long(name: impl Into<String>) -> Field {
        Field::new(name, FieldType::Long)
    }

    pub fn relation(name: impl Into<String>, relation: RelationField) -> Field {
        Field::new(name, FieldType::Relation(relation))
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(DefaultValue::Literal(value));
        self
    }

    pub fn generated(mut self, generated: GeneratedValue) -> Self {
        self.default = Some(DefaultValue::Generated(generated));
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.ty.kind()
    }

    pub fn is_id(&self) -> bool {
        matches!(self.ty, FieldType::Id)
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.ty, FieldType::Relation(_))
    }

    pub fn as_relation(&self) -> Option<&RelationField> {
        match &self.ty {
            FieldType::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    /// The generator that fills this field on insert, if any.
    pub fn generated_value(&self) -> Option<GeneratedValue> {
        match (&self.default, &self.ty) {
            (Some(DefaultValue::Generated(generated)), _) => Some(*generated),
            (_, FieldType::Id) => Some(GeneratedValue::AutoIncrement),
            _ => None,
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_schema("field name must not be empty"));
        }

        match (&self.ty, self.generated_value()) {
            (FieldType::Id, Some(GeneratedValue::Now)) => Err(Error::invalid_schema(format!(
                "identity field `{}` cannot be generated from NOW",
                self.name
            ))),
            (FieldType::Int | FieldType::Long | FieldType::Id, _) => Ok(()),
            (_, Some(GeneratedValue::AutoIncrement)) => Err(Error::invalid_schema(format!(
                "AUTO_INCREMENT requires an integer field; field=`{}`",
                self.name
            ))),
            (FieldType::Enum { values }, _) if values.is_empty() => Err(Error::invalid_schema(
                format!("enum field `{}` declares no values", self.name),
            )),
            _ => Ok(()),
        }
    }
}

impl FieldType {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::Id => FieldKind::Id,
            FieldType::String { .. } => FieldKind::String,
            FieldType::Int => FieldKind::Int,
            FieldType::Long => FieldKind::Long,
            FieldType::Float { .. } => FieldKind::Float,
            FieldType::Boolean => FieldKind::Boolean,
            FieldType::DateTime => FieldKind::DateTime,
            FieldType::Date => FieldKind::Date,
            FieldType::Time => FieldKind::Time,
            FieldType::Json => FieldKind::Json,
            FieldType::Enum { .. } => FieldKind::Enum,
            FieldType::Relation(_) => FieldKind::Relation,
        }
    }
}

/// Wire form of a field in the schema description document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDoc {
    name: String,

    #[serde(rename = "type")]
    kind: FieldKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nullable: Option<bool>,

    #[serde(default)]
    unique: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_value: Option<GeneratedValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    precision: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    foreign_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiple: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cascade_delete: Option<bool>,
}

impl TryFrom<FieldDoc> for Field {
    type Error = Error;

    fn try_from(doc: FieldDoc) -> Result<Field> {
        let ty = match doc.kind {
            FieldKind::Id => FieldType::Id,
            FieldKind::String => FieldType::String { length: doc.length },
            FieldKind::Int => FieldType::Int,
            FieldKind::Long => FieldType::Long,
            FieldKind::Float => FieldType::Float {
                precision: doc.precision,
                scale: doc.scale,
            },
            FieldKind::Boolean => FieldType::Boolean,
            FieldKind::DateTime => FieldType::DateTime,
            FieldKind::Date => FieldType::Date,
            FieldKind::Time => FieldType::Time,
            FieldKind::Json => FieldType::Json,
            FieldKind::Enum => FieldType::Enum { values: doc.values },
            FieldKind::Relation => match (doc.from, doc.local_field, doc.foreign_field) {
                (Some(from), Some(local_field), Some(foreign_field)) => {
                    FieldType::Relation(RelationField {
                        from,
                        local_field,
                        foreign_field,
                        multiple: doc.multiple.unwrap_or(false),
                        cascade_delete: doc.cascade_delete.unwrap_or(false),
                    })
                }
                _ => {
                    return Err(Error::invalid_schema(format!(
                        "relation field `{}` must declare from/localField/foreignField",
                        doc.name
                    )))
                }
            },
        };

        let default = match (doc.generated_value, doc.default_value) {
            (Some(_), Some(_)) => {
                return Err(Error::invalid_schema(format!(
                    "field `{}` declares both defaultValue and generatedValue",
                    doc.name
                )))
            }
            (Some(generated), None) => Some(DefaultValue::Generated(generated)),
            (None, Some(literal)) => Some(DefaultValue::Literal(literal)),
            (None, None) => None,
        };

        let mut field = Field::new(doc.name, ty);
        if let Some(nullable) = doc.nullable {
            field.nullable = nullable;
        }
        field.unique = doc.unique;
        field.comment = doc.comment;
        field.default = default;
        Ok(field)
    }
}

impl From<Field> for FieldDoc {
    fn from(field: Field) -> FieldDoc {
        let kind = field.kind();
        let (default_value, generated_value) = match field.default {
            Some(DefaultValue::Literal(value)) => (Some(value), None),
            Some(DefaultValue::Generated(generated)) => (None, Some(generated)),
            None => (None, None),
        };

        let mut doc = FieldDoc {
            name: field.name,
            kind,
            nullable: Some(field.nullable),
            unique: field.unique,
            comment: field.comment,
            default_value,
            generated_value,
            length: None,
            precision: None,
            scale: None,
            values: vec![],
            from: None,
            local_field: None,
            foreign_field: None,
            multiple: None,
            cascade_delete: None,
        };

        match field.ty {
            FieldType::String { length } => doc.length = length,
            FieldType::Float { precision, scale } => {
                doc.precision = precision;
                doc.scale = scale;
            }
            FieldType::Enum { values } => doc.values = values,
            FieldType::Relation(relation) => {
                doc.from = Some(relation.from);
                doc.local_field = Some(relation.local_field);
                doc.foreign_field = Some(relation.foreign_field);
                doc.multiple = Some(relation.multiple);
                doc.cascade_delete = Some(relation.cascade_delete);
            }
            _ => {}
        }

        doc
    }
}
