use quarry_core::{driver::Params, stmt::Value};

/// Collects bind parameters for one statement.
///
/// Placeholders are named `p0`, `p1`, ... in the order values are pushed, so
/// every occurrence of a literal gets its own name even when the same
/// sub-expression appears twice.
#[derive(Debug, Default)]
pub struct Bindings {
    params: Params,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    /// Stores `value` and returns its placeholder, e.g. `:p3`.
    pub fn push(&mut self, value: Value) -> String {
        let name = format!("p{}", self.params.len());
        let placeholder = format!(":{name}");
        self.params.insert(name, value);
        placeholder
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}
