//! Error types for the chroma_profile library

use thiserror::Error;

/// Result type alias for chroma_profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Error types for color profiling operations
///
/// Conditions the engine recovers from locally — fewer distinct colors than
/// the requested `k`, or hitting the iteration cap before convergence — are
/// not errors; they are reported through [`ProfileMetadata`] flags so a
/// degraded result is never mistaken for a clean one.
///
/// [`ProfileMetadata`]: crate::profile::ProfileMetadata
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Input pixel sequence was empty
    #[error("Empty input: {context}")]
    EmptyInput { context: String },

    /// Declared dimensions do not match the pixel count
    #[error("Dimension mismatch: {width}x{height} declared but {pixel_count} pixels supplied")]
    DimensionMismatch {
        width: u32,
        height: u32,
        pixel_count: usize,
    },

    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value} ({reason})")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Failed to load configuration: {message}")]
    ConfigLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ProfileError {
    /// Create an empty-input error with context
    pub fn empty_input(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a config load error with source context
    pub fn config_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Configuration errors are recoverable by correcting the config and
    /// retrying; input errors are terminal for that call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProfileError::InvalidParameter { .. } | ProfileError::ConfigLoadError { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ProfileError::EmptyInput { .. } => {
                "No pixels to analyze. Please supply a non-empty image.".to_string()
            }
            ProfileError::DimensionMismatch { .. } => {
                "Image dimensions do not match the pixel data. Please check the decoder output."
                    .to_string()
            }
            ProfileError::InvalidParameter { parameter, .. } => {
                format!(
                    "Configuration value for '{}' is out of range. Please adjust and retry.",
                    parameter
                )
            }
            ProfileError::ConfigLoadError { .. } => {
                "Could not load the configuration file. Please check the path and JSON syntax."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_display() {
        let err = ProfileError::empty_input("pixel buffer");
        assert!(err.to_string().contains("pixel buffer"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_parameter_recoverable() {
        let err = ProfileError::invalid_parameter("max_iterations", 0, "must be at least 1");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn test_user_messages_non_empty() {
        let errors = vec![
            ProfileError::empty_input("input"),
            ProfileError::DimensionMismatch {
                width: 4,
                height: 4,
                pixel_count: 15,
            },
            ProfileError::invalid_parameter("k", 0, "must be positive"),
            ProfileError::config_load(
                "read failed",
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            ),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
