use super::Direction;

/// Ordered list of sort terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sort {
    pub fields: Vec<SortField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortField {
    /// A field, `alias.field`, or a projection alias
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn new() -> Sort {
        Sort::default()
    }

    pub fn asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push(SortField {
            field: field.into(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push(SortField {
            field: field.into(),
            direction: Direction::Desc,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
