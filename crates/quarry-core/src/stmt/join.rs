/// A join from the primary entity to another entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub ty: JoinType,

    /// Name of the joined entity
    pub from: String,

    /// Alias under which later clauses reference the joined entity
    pub alias: String,

    /// Field of the primary entity. When both keys are `None` the compiler
    /// resolves them from a relation field targeting `from`.
    pub local_field: Option<String>,

    /// Field of the joined entity
    pub foreign_field: Option<String>,

    /// Extra JSON-logic condition added to the `ON` clause
    pub filter: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl Join {
    pub fn inner(from: impl Into<String>) -> Join {
        Join::new(JoinType::Inner, from.into())
    }

    pub fn left(from: impl Into<String>) -> Join {
        Join::new(JoinType::Left, from.into())
    }

    fn new(ty: JoinType, from: String) -> Join {
        Join {
            ty,
            alias: from.clone(),
            from,
            local_field: None,
            foreign_field: None,
            filter: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn on(mut self, local_field: impl Into<String>, foreign_field: impl Into<String>) -> Self {
        self.local_field = Some(local_field.into());
        self.foreign_field = Some(foreign_field.into());
        self
    }

    pub fn filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}
