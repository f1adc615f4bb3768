// Error taxonomy shared by the adapters, the orchestrator and the validator

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The text does not parse under the attempted grammar.
    #[error("Parse error: {0}")]
    Format(String),

    /// A parsed tree could not be written out in the target format.
    #[error("Render error: {0}")]
    Render(String),

    #[error("Could not determine the input format. Perhaps it's malformed?")]
    AmbiguousFormat,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    SpecLoad(#[from] SpecLoadError),
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub(crate) fn render(msg: impl Into<String>) -> Self {
        Error::Render(msg.into())
    }

    /// Format errors are the only ones the orchestrator may recover from.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

/// The document is well formed but does not match the resource specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The resource specification could not be read or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load resource specification from {source_name}: {reason}")]
pub struct SpecLoadError {
    pub source_name: String,
    pub reason: String,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Format(format!("invalid JSON: {}", err))
    }
}

impl From<serde_yml::Error> for Error {
    fn from(err: serde_yml::Error) -> Self {
        Error::Format(format!("invalid YAML: {}", err))
    }
}
