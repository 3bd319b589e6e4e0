use quarry_core::driver::Params;

/// SQL text with its named bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

impl Statement {
    pub fn new(sql: String, params: Params) -> Statement {
        tracing::debug!(%sql, params = params.len(), "compiled statement");
        Statement { sql, params }
    }
}
