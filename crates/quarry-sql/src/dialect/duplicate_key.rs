use regex::Regex;

/// Extracts the violated constraint name from a driver's duplicate-key
/// message.
///
/// Each pattern must capture the name in a group called `name`.
#[derive(Debug, Clone, Default)]
pub struct DuplicateKeyTranslator {
    patterns: Vec<Regex>,
}

impl DuplicateKeyTranslator {
    pub fn new(patterns: &[&str]) -> DuplicateKeyTranslator {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::error!(%pattern, %err, "invalid duplicate-key pattern");
                    None
                }
            })
            .collect();

        DuplicateKeyTranslator { patterns }
    }

    /// The constraint name, if `message` reports a duplicate key.
    pub fn translate(&self, message: &str) -> Option<String> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures(message)
                .and_then(|captures| captures.name("name"))
                .map(|name| name.as_str().to_string())
        })
    }
}
