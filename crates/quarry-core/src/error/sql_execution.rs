use super::Error;

/// Error when a query is assembled from inconsistent parts.
///
/// Typical causes are a join whose keys cannot be resolved, a reference to an
/// unregistered join alias, or a query against an unknown entity.
#[derive(Debug)]
pub(super) struct SqlExecutionError {
    message: Box<str>,
}

impl std::error::Error for SqlExecutionError {}

impl core::fmt::Display for SqlExecutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "sql execution error: {}", self.message)
    }
}

impl Error {
    /// Creates a query configuration error.
    pub fn sql_execution(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::SqlExecution(SqlExecutionError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a query configuration error.
    pub fn is_sql_execution(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::SqlExecution(_)))
    }
}
