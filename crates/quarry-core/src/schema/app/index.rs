use super::content_hash;
use crate::stmt::Direction;

use serde::{Deserialize, Serialize};

/// A declared index over one or more fields of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    /// Entity the index belongs to. Filled in from the enclosing entity when
    /// the index is loaded from a schema description.
    #[serde(default)]
    pub model_name: String,

    /// Explicit name, or empty to derive one from the index content
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub unique: bool,

    pub fields: Vec<IndexField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    pub name: String,

    #[serde(default)]
    pub direction: Direction,
}

impl IndexDefinition {
    /// Creates an index whose name is derived from its content.
    pub fn new<I, S>(model_name: impl Into<String>, fields: I) -> IndexDefinition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = IndexDefinition {
            model_name: model_name.into(),
            name: String::new(),
            unique: false,
            fields: fields
                .into_iter()
                .map(|name| IndexField {
                    name: name.into(),
                    direction: Direction::Asc,
                })
                .collect(),
        };
        index.name = index.derived_name();
        index
    }

    /// Marks the index unique, re-deriving the name unless one was set
    /// explicitly.
    pub fn unique(mut self) -> Self {
        let derived = self.name == self.derived_name();
        self.unique = true;
        if derived {
            self.name = self.derived_name();
        }
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// `idx_<model>_<hash>` or `uk_<model>_<hash>`, where the hash covers the
    /// model, the uniqueness flag and the ordered field/direction list.
    pub fn derived_name(&self) -> String {
        let prefix = if self.unique { "uk" } else { "idx" };
        let mut parts = vec![self.model_name.as_str(), prefix];
        for field in &self.fields {
            parts.push(&field.name);
            parts.push(field.direction.as_sql());
        }
        let hash = content_hash(&parts);
        format!(
            "{prefix}_{}_{:08x}",
            self.model_name.to_ascii_lowercase(),
            hash as u32
        )
    }

    /// Fills in the model name and, if missing, the derived name.
    pub(crate) fn normalize(&mut self, model_name: &str) {
        if self.model_name.is_empty() {
            self.model_name = model_name.to_string();
        }
        if self.name.is_empty() {
            self.name = self.derived_name();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names_are_stable_and_content_sensitive() {
        let a = IndexDefinition::new("User", ["name", "age"]);
        let b = IndexDefinition::new("User", ["name", "age"]);
        let c = IndexDefinition::new("User", ["age", "name"]);

        assert_eq!(a.name, b.name);
        assert_ne!(a.name, c.name);
        assert!(a.name.starts_with("idx_user_"));
    }

    #[test]
    fn unique_rederives_only_derived_names() {
        let derived = IndexDefinition::new("User", ["email"]).unique();
        assert!(derived.name.starts_with("uk_user_"));

        let named = IndexDefinition::new("User", ["email"])
            .named("user_email")
            .unique();
        assert_eq!(named.name, "user_email");
    }
}
