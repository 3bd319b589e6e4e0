use super::Error;

/// Error when a grouped query projects a field that is neither aggregated nor
/// listed in the group-by clause.
#[derive(Debug)]
pub(super) struct UngroupedFieldError {
    field: Box<str>,
}

impl std::error::Error for UngroupedFieldError {}

impl core::fmt::Display for UngroupedFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "field `{}` must appear in the group by clause or be used in an aggregate function",
            self.field
        )
    }
}

impl Error {
    /// Creates an ungrouped field error.
    pub fn ungrouped_field(field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UngroupedField(UngroupedFieldError {
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an ungrouped field error.
    pub fn is_ungrouped_field(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UngroupedField(_)))
    }
}
