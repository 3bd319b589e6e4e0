/// A foreign key constraint. Only produced when explicitly modeled; relation
/// fields do not create foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlForeignKey {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub cascade_delete: bool,
}
