use serde::{Deserialize, Serialize};

/// A logical reference to another entity, resolved at query time.
///
/// Relations never produce a physical column. `local_field` names a column of
/// the declaring entity, `foreign_field` a column of the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationField {
    /// Target entity
    pub from: String,

    pub local_field: String,

    pub foreign_field: String,

    /// `true` for 1:N, `false` for 1:1
    #[serde(default)]
    pub multiple: bool,

    /// Delete matching target rows when a declaring row is deleted
    #[serde(default)]
    pub cascade_delete: bool,
}

impl RelationField {
    pub fn one(
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> RelationField {
        RelationField {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            multiple: false,
            cascade_delete: false,
        }
    }

    pub fn many(
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> RelationField {
        RelationField {
            multiple: true,
            ..RelationField::one(from, local_field, foreign_field)
        }
    }

    pub fn cascade_delete(mut self) -> Self {
        self.cascade_delete = true;
        self
    }
}
