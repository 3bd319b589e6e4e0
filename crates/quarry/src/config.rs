use quarry_core::stmt::Page;
use serde::Deserialize;

/// Nesting levels a query expands relation fields to when not configured.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Configuration for a [`SessionFactory`](crate::SessionFactory).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Dialect name, as accepted by [`Dialect::from_name`](crate::Dialect::from_name)
    pub dialect: String,

    /// Log and continue past DDL errors during schema operations
    pub failsafe: bool,

    /// Page size used by [`Session::page`](crate::Session::page)
    pub default_page_size: u64,

    /// Relation nesting levels expanded by nested queries
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: "sqlite".to_string(),
            failsafe: false,
            default_page_size: Page::DEFAULT_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = dialect.into();
        self
    }

    pub fn failsafe(mut self, failsafe: bool) -> Self {
        self.failsafe = failsafe;
        self
    }

    pub fn default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
