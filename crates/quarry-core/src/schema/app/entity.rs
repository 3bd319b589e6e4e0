use super::{Field, FieldType, IndexDefinition, RelationField};
use crate::{Error, Result};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A logical table definition: ordered fields and indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub fields: Vec<Field>,

    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>) -> EntityDefinition {
        EntityDefinition {
            name: name.into(),
            comment: None,
            fields: vec![],
            indexes: vec![],
        }
    }

    /// Parses and validates an entity from its JSON schema description.
    ///
    /// Well-formed JSON that does not describe an entity is an invalid schema.
    pub fn from_json(json: &str) -> Result<EntityDefinition> {
        let mut entity: EntityDefinition = serde_json::from_str(json).map_err(|err| {
            if err.is_data() {
                Error::invalid_schema(err.to_string())
            } else {
                Error::from(err)
            }
        })?;
        entity.normalize();
        entity.validate()?;
        Ok(entity)
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn index(mut self, mut index: IndexDefinition) -> Self {
        index.normalize(&self.name);
        self.indexes.push(index);
        self
    }

    /// Looks up a field by name, falling back to a case-insensitive match.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|field| field.name.eq_ignore_ascii_case(name))
            })
    }

    pub fn id_field(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.is_id())
    }

    /// Fields that map to physical columns, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| !field.is_relation())
    }

    /// Relation fields, in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = (&Field, &RelationField)> + '_ {
        self.fields
            .iter()
            .filter_map(|field| field.as_relation().map(|relation| (field, relation)))
    }

    /// The first relation field whose target is `entity`.
    pub fn relation_to(&self, entity: &str) -> Option<&RelationField> {
        self.relations()
            .map(|(_, relation)| relation)
            .find(|relation| relation.from.eq_ignore_ascii_case(entity))
    }

    /// Fills in index model names and derived index names.
    pub fn normalize(&mut self) {
        for index in &mut self.indexes {
            index.normalize(&self.name);
        }
    }

    /// Checks the structural invariants of the definition.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_schema("entity name must not be empty"));
        }

        let mut names = HashSet::new();
        let mut identity = None;

        for field in &self.fields {
            field
                .check()
                .map_err(|err| err.context(crate::err!("entity `{}`", self.name)))?;

            if !names.insert(field.name.to_ascii_lowercase()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate field `{}` in entity `{}`",
                    field.name, self.name
                )));
            }

            if let FieldType::Id = field.ty {
                if let Some(previous) = identity.replace(&field.name) {
                    return Err(Error::invalid_schema(format!(
                        "entity `{}` declares more than one identity field: `{}` and `{}`",
                        self.name, previous, field.name
                    )));
                }
            }
        }

        for (field, relation) in self.relations() {
            match self.get_field(&relation.local_field) {
                Some(local) if !local.is_relation() => {}
                _ => {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` references unknown local field `{}`",
                        self.name, field.name, relation.local_field
                    )))
                }
            }
        }

        for index in &self.indexes {
            if index.fields.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "index `{}` on `{}` has no fields",
                    index.name, self.name
                )));
            }
            for index_field in &index.fields {
                match self.get_field(&index_field.name) {
                    Some(field) if !field.is_relation() => {}
                    _ => {
                        return Err(Error::invalid_schema(format!(
                            "index `{}` references unknown field `{}` of `{}`",
                            index.name, index_field.name, self.name
                        )))
                    }
                }
            }
        }

        Ok(())
    }
}
