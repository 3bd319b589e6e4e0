use super::Value;

use indexmap::IndexMap;

/// A result row: column label to value, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Row {
        Row::default()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Looks up a column ignoring ASCII case. Some backends fold unquoted
    /// labels to upper or lower case.
    pub fn get_ignore_case(&self, column: &str) -> Option<&Value> {
        self.columns.get(column).or_else(|| {
            self.columns
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) -> Option<Value> {
        self.columns.insert(column.into(), value)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.shift_remove(column)
    }

    pub fn remove_ignore_case(&mut self, column: &str) -> Option<Value> {
        if self.columns.contains_key(column) {
            return self.columns.shift_remove(column);
        }
        let index = self
            .columns
            .keys()
            .position(|name| name.eq_ignore_ascii_case(column))?;
        self.columns.shift_remove_index(index).map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.columns.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.columns.iter_mut()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.columns
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Row {
            columns: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folded_labels_are_removed_by_declared_name() {
        let mut row: Row = [
            ("ID".to_string(), Value::I64(1)),
            ("USERID".to_string(), Value::I64(7)),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.remove_ignore_case("userId"), Some(Value::I64(7)));
        assert_eq!(row.remove_ignore_case("userId"), None);
        assert_eq!(row.len(), 1);
        assert!(row.contains("ID"));
    }
}
