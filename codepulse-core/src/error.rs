//! Error types for codepulse-core

use thiserror::Error;

/// Main error type for the codepulse-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Usage export could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Date range with inverted or otherwise unusable bounds
    #[error("invalid date range: {0}")]
    InvalidRange(String),
}

/// Failure to turn an export blob into a [`RawImport`](crate::import::RawImport).
///
/// Recovered by the loader, which substitutes demo data.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Not JSON at all
    #[error("export is not valid JSON (line {line}, column {column}): {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Valid JSON that does not match the export shape
    #[error("export does not match the expected shape (line {line}, column {column}): {message}")]
    Schema {
        line: usize,
        column: usize,
        message: String,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        let message = err.to_string();
        match err.classify() {
            serde_json::error::Category::Data => ParseError::Schema {
                line,
                column,
                message,
            },
            _ => ParseError::Syntax {
                line,
                column,
                message,
            },
        }
    }
}

/// Result type alias for codepulse-core
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_classification() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(ParseError::from(err), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_schema_error_classification() {
        let err = serde_json::from_str::<Vec<u32>>("{\"a\": 1}").unwrap_err();
        assert!(matches!(ParseError::from(err), ParseError::Schema { .. }));
    }

    #[test]
    fn test_import_failure_converts_to_error() {
        let err: Error = crate::import::parse_import("[1,").unwrap_err().into();
        assert!(matches!(err, Error::Parse(ParseError::Syntax { .. })));
        assert!(err.to_string().starts_with("export is not valid JSON"));
    }
}
