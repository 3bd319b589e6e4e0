use regex::Regex;
use std::sync::LazyLock;

/// Driver messages reporting that a table, column or index being created is
/// already there, across the supported vendors.
static EXISTING_OBJECT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let pattern = r"(?i)already exists|duplicate column|duplicate key name|already an object named|column names in each table must be unique|already used by an existing object|ORA-0(1430|0955|1408)|SQLSTATE=4271[01]";
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::error!(%err, "invalid existing-object pattern");
            None
        }
    }
});

pub(super) fn reports_existing_object(message: &str) -> bool {
    EXISTING_OBJECT
        .as_ref()
        .is_some_and(|regex| regex.is_match(message))
}
