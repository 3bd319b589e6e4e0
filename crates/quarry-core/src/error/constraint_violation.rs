use super::Error;

/// Error when the database rejects a write because of a unique constraint.
///
/// Drivers report duplicate keys with vendor-specific messages. A dialect
/// translates those messages into the logical constraint name carried here.
#[derive(Debug)]
pub(super) struct ConstraintViolation {
    constraint: Box<str>,
}

impl std::error::Error for ConstraintViolation {}

impl core::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "constraint violation: duplicate key for `{}`",
            self.constraint
        )
    }
}

impl Error {
    /// Creates a constraint violation error for the named constraint.
    pub fn constraint_violation(constraint: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConstraintViolation(ConstraintViolation {
            constraint: constraint.into().into(),
        }))
    }

    /// Returns `true` if this error is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::ConstraintViolation(_)))
    }

    /// Returns the violated constraint name, if this is a constraint violation.
    pub fn constraint_name(&self) -> Option<&str> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::ConstraintViolation(err) => Some(&*err.constraint),
            _ => None,
        })
    }
}
