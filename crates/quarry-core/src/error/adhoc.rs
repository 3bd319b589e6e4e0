/// An error built from a format string with `err!` or `bail!`.
#[derive(Debug)]
pub(super) struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    pub(super) fn new(message: String) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(super) fn from_args(args: core::fmt::Arguments<'_>) -> Self {
        match args.as_str() {
            Some(message) => Self::new(message.to_string()),
            None => Self::new(args.to_string()),
        }
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
