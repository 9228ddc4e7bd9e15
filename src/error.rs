use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised by variant generation, matching and match persistence.
///
/// A duplicate key on insert is not an error; sinks report it as
/// [`crate::sink::InsertOutcome::Duplicate`].
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl LinkError {
    pub fn empty_name() -> Self {
        LinkError::InvalidInput {
            reason: "name is empty".into(),
        }
    }
}

impl From<sqlx::Error> for LinkError {
    fn from(e: sqlx::Error) -> Self {
        LinkError::Persistence(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Csv(e.to_string())
    }
}
