use super::Error;

/// Error raised by a SQL dialect.
///
/// This occurs when:
/// - No native type name is registered for a type code
/// - A function is unknown to the dialect or called with the wrong arity
/// - A DDL request cannot be expressed by the dialect (altering a column on
///   SQLite, dropping a foreign key where constraints are immutable)
#[derive(Debug)]
pub(super) struct DialectError {
    message: Box<str>,
}

impl std::error::Error for DialectError {}

impl core::fmt::Display for DialectError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "dialect error: {}", self.message)
    }
}

impl Error {
    /// Creates a dialect error.
    pub fn dialect(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Dialect(DialectError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or its cause chain, is a dialect error.
    pub fn is_dialect(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Dialect(_)))
    }
}
