use super::Error;

/// Error when a database driver operation fails.
///
/// This wraps errors from the underlying driver library: connection failures,
/// statement execution errors, and DDL failures.
#[derive(Debug)]
pub(super) struct DriverOperationFailed {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverOperationFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DriverOperationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a driver operation failure.
    pub fn driver_operation_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::DriverOperationFailed(
            DriverOperationFailed {
                inner: Box::new(err),
            },
        ))
    }

    /// Returns `true` if this error is a driver operation failure.
    pub fn is_driver_operation_failed(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::DriverOperationFailed(_)))
    }

    /// Returns the driver's message when this is a driver failure.
    pub fn driver_message(&self) -> Option<String> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::DriverOperationFailed(err) => Some(err.to_string()),
            _ => None,
        })
    }
}
