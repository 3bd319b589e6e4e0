use super::Error;

/// Error when a filter expression cannot be compiled.
///
/// Raised for a missing or unparseable document, an unknown operator, or an
/// operand combination with no defined SQL semantics.
#[derive(Debug)]
pub(super) struct ExpressionCalculatorError {
    message: Box<str>,
}

impl std::error::Error for ExpressionCalculatorError {}

impl core::fmt::Display for ExpressionCalculatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid filter expression: {}", self.message)
    }
}

impl Error {
    /// Creates a filter expression error.
    pub fn expression_calculator(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ExpressionCalculator(
            ExpressionCalculatorError {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a filter expression error.
    pub fn is_expression_calculator(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::ExpressionCalculator(_)))
    }
}
