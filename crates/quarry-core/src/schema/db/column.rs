use super::TypeCode;
use crate::stmt::Value;

/// A physical column.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumn {
    pub name: String,

    pub type_code: TypeCode,

    /// Character length or binary size
    pub length: Option<u32>,

    pub precision: Option<u32>,

    pub scale: Option<u32>,

    pub nullable: bool,

    pub unique: bool,

    /// Set by [`super::SqlTable::set_primary_key`]; forces `nullable = false`.
    pub primary_key: bool,

    pub auto_increment: bool,

    pub default: Option<ColumnDefault>,

    pub comment: Option<String>,
}

/// A column default rendered into DDL.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    Value(Value),
    CurrentTimestamp,
}

impl SqlColumn {
    pub fn new(name: impl Into<String>, type_code: TypeCode) -> SqlColumn {
        SqlColumn {
            name: name.into(),
            type_code,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            unique: false,
            primary_key: false,
            auto_increment: false,
            default: None,
            comment: None,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// True if the two columns differ in an attribute that needs an
    /// `ALTER COLUMN`: type, length, precision, scale, nullability, comment or
    /// default.
    pub fn has_diff(&self, other: &SqlColumn) -> bool {
        self.type_code != other.type_code
            || self.length != other.length
            || self.precision != other.precision
            || self.scale != other.scale
            || self.nullable != other.nullable
            || self.comment != other.comment
            || self.default != other.default
    }
}
