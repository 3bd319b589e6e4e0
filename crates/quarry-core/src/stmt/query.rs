use super::{Join, Page, Projection, Sort};

/// A structured read request against one primary entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Name of the primary entity
    pub entity: String,

    /// JSON-logic filter document
    pub filter: Option<serde_json::Value>,

    /// Projected calls. `None` selects every column of the primary entity.
    pub projection: Option<Projection>,

    pub joins: Vec<Join>,

    pub group_by: Vec<String>,

    pub sort: Sort,

    /// `None` returns every matching row.
    pub page: Option<Page>,

    /// When true, relation fields are expanded after the rows are read.
    pub nested_query_enabled: bool,
}

impl Query {
    pub fn new(entity: impl Into<String>) -> Query {
        Query {
            entity: entity.into(),
            filter: None,
            projection: None,
            joins: vec![],
            group_by: vec![],
            sort: Sort::default(),
            page: None,
            nested_query_enabled: false,
        }
    }

    pub fn filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, number: u64, size: u64) -> Self {
        self.page = Some(Page::new(number, size));
        self
    }

    pub fn nested(mut self, enabled: bool) -> Self {
        self.nested_query_enabled = enabled;
        self
    }
}
