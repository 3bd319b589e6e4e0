/// A sequence, native or emulated with a seed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSequence {
    pub name: String,
    pub start: i64,
    pub increment: i64,
}

impl SqlSequence {
    pub fn new(name: impl Into<String>) -> SqlSequence {
        SqlSequence {
            name: name.into(),
            start: 1,
            increment: 1,
        }
    }
}
