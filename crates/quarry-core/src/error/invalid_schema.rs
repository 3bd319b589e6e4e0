use super::Error;

/// Error when an entity definition is invalid.
///
/// This occurs when:
/// - An entity declares more than one identity field
/// - Two fields share a name (compared case-insensitively)
/// - An index references an unknown field or a relation field
/// - A relation points at a field that does not exist
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
