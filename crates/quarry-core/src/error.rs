mod adhoc;
mod constraint_violation;
mod dialect;
mod driver_operation_failed;
mod expression_calculator;
mod invalid_schema;
mod record_not_found;
mod sql_execution;
mod type_conversion;
mod ungrouped_field;

use adhoc::AdhocError;
use constraint_violation::ConstraintViolation;
use dialect::DialectError;
use driver_operation_failed::DriverOperationFailed;
use expression_calculator::ExpressionCalculatorError;
use invalid_schema::InvalidSchema;
use record_not_found::RecordNotFoundError;
use sql_execution::SqlExecutionError;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use ungrouped_field::UngroupedFieldError;

/// Return early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Quarry.
///
/// The error is a single pointer wide and cheap to clone. Each error carries a
/// kind and, optionally, the error that caused it. Use [`Error::context`] to
/// wrap an error with a higher-level description.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }

        if let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) {
            if inner.cause.is_none() {
                inner.cause = Some(self);
                return err;
            }
        }

        // The consequent is shared or already has a cause; rebuild it so the
        // chain stays linear.
        Error {
            inner: Some(Arc::new(ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError::new(err.kind().to_string())),
                cause: Some(self),
            })),
        }
    }

    /// Returns the innermost error of the chain.
    pub fn root(&self) -> &Error {
        let mut root = self;
        for err in self.chain() {
            root = err;
        }
        root
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns true if this error, or any error in its cause chain, satisfies
    /// the predicate.
    fn any(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }

    #[doc(hidden)]
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(args)))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::DriverOperationFailed(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    ConstraintViolation(ConstraintViolation),
    Dialect(DialectError),
    DriverOperationFailed(DriverOperationFailed),
    ExpressionCalculator(ExpressionCalculatorError),
    InvalidSchema(InvalidSchema),
    RecordNotFound(RecordNotFoundError),
    SqlExecution(SqlExecutionError),
    TypeConversion(TypeConversionError),
    UngroupedField(UngroupedFieldError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            ConstraintViolation(err) => core::fmt::Display::fmt(err, f),
            Dialect(err) => core::fmt::Display::fmt(err, f),
            DriverOperationFailed(err) => core::fmt::Display::fmt(err, f),
            ExpressionCalculator(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            SqlExecution(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UngroupedField(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown quarry error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        assert_eq!(
            core::mem::size_of::<usize>(),
            core::mem::size_of::<Error>()
        );
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("root cause");
        let chained = root.context(err!("middle context")).context(err!("top context"));
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
        assert_eq!(chained.root().to_string(), "root cause");
    }

    #[test]
    fn context_preserves_predicates() {
        let err = Error::dialect("no type mapping for code BLOB")
            .context(err!("creating table `user`"));
        assert!(err.is_dialect());
        assert!(!err.is_expression_calculator());
    }

    #[test]
    fn anyhow_bridge() {
        let our_err: Error = anyhow::anyhow!("something failed").into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn record_not_found_with_context() {
        let err = Error::record_not_found("entity=User id=7").context(err!("update failed"));
        assert_eq!(
            err.to_string(),
            "update failed: record not found: entity=User id=7"
        );
    }

    #[test]
    fn constraint_violation_carries_name() {
        let err = Error::constraint_violation("uk_user_email");
        assert_eq!(err.constraint_name(), Some("uk_user_email"));
        assert_eq!(
            err.to_string(),
            "constraint violation: duplicate key for `uk_user_email`"
        );
    }
}
