use std::fmt::{self, Display};
use std::io;

/// Provides `SirError` and maps other errors to
/// convert to a `SirError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SirError {
    /// A constructor, configuration call, or config file was given a value outside its
    /// documented range. Never clamped.
    InvalidArgument(String),
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    ReportError(String),
}

impl SirError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        SirError::InvalidArgument(message.into())
    }
}

impl From<io::Error> for SirError {
    fn from(error: io::Error) -> Self {
        SirError::IoError(error)
    }
}

impl From<serde_json::Error> for SirError {
    fn from(error: serde_json::Error) -> Self {
        SirError::JsonError(error)
    }
}

impl From<csv::Error> for SirError {
    fn from(error: csv::Error) -> Self {
        SirError::CsvError(error)
    }
}

impl std::error::Error for SirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SirError::IoError(error) => Some(error),
            SirError::JsonError(error) => Some(error),
            SirError::CsvError(error) => Some(error),
            SirError::InvalidArgument(_) | SirError::ReportError(_) => None,
        }
    }
}

impl Display for SirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SirError::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            SirError::IoError(error) => write!(f, "io error: {error}"),
            SirError::JsonError(error) => write!(f, "could not parse config: {error}"),
            SirError::CsvError(error) => write!(f, "could not write report: {error}"),
            SirError::ReportError(message) => write!(f, "report error: {message}"),
        }
    }
}
