/// A unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlUniqueKey {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
}

impl SqlUniqueKey {
    /// The key implied by a single unique column: `uk_<table>_<column>`.
    pub fn for_column(table: &str, column: &str) -> SqlUniqueKey {
        SqlUniqueKey {
            name: format!(
                "uk_{}_{}",
                table.to_ascii_lowercase(),
                column.to_ascii_lowercase()
            ),
            table: table.to_string(),
            columns: vec![column.to_string()],
        }
    }
}
