use super::QueryCall;

use indexmap::IndexMap;

/// Ordered `alias -> call` list of projected expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    calls: IndexMap<String, QueryCall>,
}

impl Projection {
    pub fn new() -> Projection {
        Projection::default()
    }

    /// Projects a field under its own name. For `alias.field` references the
    /// output label is the part after the dot.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let label = match name.rsplit_once('.') {
            Some((_, field)) => field.to_string(),
            None => name.clone(),
        };
        self.calls.insert(label, QueryCall::Field(name));
        self
    }

    pub fn call(mut self, alias: impl Into<String>, call: QueryCall) -> Self {
        self.calls.insert(alias.into(), call);
        self
    }

    pub fn get(&self, alias: &str) -> Option<&QueryCall> {
        self.calls.get(alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryCall)> {
        self.calls.iter()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// True if any projected call is a plain reference to `field`.
    pub fn references_field(&self, field: &str) -> bool {
        self.calls
            .values()
            .any(|call| matches!(call, QueryCall::Field(name) if name == field))
    }
}

impl<S: Into<String>> FromIterator<(S, QueryCall)> for Projection {
    fn from_iter<T: IntoIterator<Item = (S, QueryCall)>>(iter: T) -> Self {
        Projection {
            calls: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
