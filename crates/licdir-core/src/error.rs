//! Error types for licdir

use thiserror::Error;

/// Result type alias using licdir's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Licdir error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Contractor with license '{0}' not found.")]
    ContractorNotFound(String),

    // Input errors (E100-E199)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown search type '{0}'. Valid types: smart, name, license, city.")]
    UnknownSearchType(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ContractorNotFound(_) => "E001",
            Self::InvalidInput(_) => "E100",
            Self::UnknownSearchType(_) => "E101",
            Self::DatabaseError(_) => "E400",
            Self::ConfigError(_) => "E600",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let not_found = Error::ContractorNotFound("996518".to_string());
        assert_eq!(not_found.code(), "E001");
        assert_eq!(
            not_found.to_string(),
            "Contractor with license '996518' not found."
        );

        assert_eq!(Error::InvalidInput("bad".to_string()).code(), "E100");
        assert_eq!(Error::UnknownSearchType("fuzzy".to_string()).code(), "E101");
        assert_eq!(Error::ConfigError("bad key".to_string()).code(), "E600");
    }
}
