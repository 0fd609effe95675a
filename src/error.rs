//! Unified error handling for the ride-profile library.
//!
//! Profile construction itself never fails: degenerate tracks resolve to empty
//! profiles. Errors only come from the edges of the library, where caller
//! supplied configuration is validated or JSON is decoded and encoded.

use std::fmt;

/// Unified error type for ride-profile operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A configuration value is out of range
    InvalidConfig { field: String, message: String },
    /// Input data (e.g. a JSON point list) could not be decoded
    InvalidInput { message: String },
    /// Output data could not be encoded
    Serialization { message: String },
}

impl ProfileError {
    pub(crate) fn invalid_config(field: &str, message: impl Into<String>) -> Self {
        ProfileError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn serialization(err: serde_json::Error) -> Self {
        ProfileError::Serialization {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InvalidConfig { field, message } => {
                write!(f, "Invalid configuration '{}': {}", field, message)
            }
            ProfileError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ProfileError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ProfileError::Serialization {
                message: err.to_string(),
            }
        } else {
            ProfileError::InvalidInput {
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for ride-profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProfileError::invalid_config("weight", "must be positive, got -3");
        assert!(err.to_string().contains("weight"));
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn test_from_json_error() {
        let parse: std::result::Result<Vec<f64>, _> = serde_json::from_str("[1, 2");
        let err: ProfileError = parse.unwrap_err().into();
        assert!(matches!(err, ProfileError::InvalidInput { .. }));
    }
}
