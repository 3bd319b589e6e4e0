use crate::stmt::Direction;

/// A physical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlIndex {
    pub name: String,
    pub table: String,
    pub unique: bool,
    pub columns: Vec<(String, Direction)>,
}

impl SqlIndex {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> SqlIndex {
        SqlIndex {
            name: name.into(),
            table: table.into(),
            unique: false,
            columns: vec![],
        }
    }

    pub fn column(mut self, name: impl Into<String>, direction: Direction) -> Self {
        self.columns.push((name.into(), direction));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
