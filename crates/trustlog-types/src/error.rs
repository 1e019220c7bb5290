use std::fmt;

/// Result type for trustlog-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A textual or numeric code does not name any variant of a closed type
    InvalidValue { field: &'static str, value: String },
}

impl Error {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Error::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidValue { field, value } => {
                write!(f, "invalid {}: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for Error {}
