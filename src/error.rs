//! Error types and handling for the `cnweather` application

use thiserror::Error;

/// Main error type for the `cnweather` application
#[derive(Error, Debug)]
pub enum CnWeatherError {
    /// Network failure, DNS failure or timeout while reading a page
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The forecast site answered with a non-success status
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// An expected container or element is missing from the page
    #[error("Page structure mismatch: {message}")]
    StructuralMismatch { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Region dataset or selection errors
    #[error("Region error: {message}")]
    Region { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Chart or JSON output could not be produced
    #[error("Output error: {message}")]
    Output { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Region dataset decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl CnWeatherError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new unexpected status error
    pub fn unexpected_status<S: Into<String>>(status: u16, url: S) -> Self {
        Self::UnexpectedStatus {
            status,
            url: url.into(),
        }
    }

    /// Create a new structural mismatch error
    pub fn structural<S: Into<String>>(message: S) -> Self {
        Self::StructuralMismatch {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new region error
    pub fn region<S: Into<String>>(message: S) -> Self {
        Self::Region {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new output error
    pub fn output<S: Into<String>>(message: S) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CnWeatherError::Transport { .. } => {
                "Unable to reach the forecast site. Please check your internet connection."
                    .to_string()
            }
            CnWeatherError::UnexpectedStatus { status, .. } => {
                format!("The forecast site answered with HTTP {status}.")
            }
            CnWeatherError::StructuralMismatch { .. } => {
                "The forecast page has an unexpected layout. The region code may be invalid."
                    .to_string()
            }
            CnWeatherError::Config { message } => format!("Configuration error: {message}"),
            CnWeatherError::Region { message } => message.clone(),
            CnWeatherError::Validation { message } => format!("Invalid input: {message}"),
            CnWeatherError::Output { .. } => {
                "Failed to format the forecast for output.".to_string()
            }
            CnWeatherError::Io { .. } => {
                "File operation failed. Please check the region data path.".to_string()
            }
            CnWeatherError::Json { .. } => {
                "The region data file is not valid JSON.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for CnWeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CnWeatherError::transport(format!("request timed out: {err}"))
        } else {
            CnWeatherError::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let transport_err = CnWeatherError::transport("connection refused");
        assert!(matches!(transport_err, CnWeatherError::Transport { .. }));

        let status_err = CnWeatherError::unexpected_status(500, "https://example.com");
        assert!(matches!(
            status_err,
            CnWeatherError::UnexpectedStatus { status: 500, .. }
        ));

        let structural_err = CnWeatherError::structural("no 7d container");
        assert!(matches!(
            structural_err,
            CnWeatherError::StructuralMismatch { .. }
        ));
    }

    #[test]
    fn test_display_includes_details() {
        let err = CnWeatherError::unexpected_status(404, "https://example.com/x.shtml");
        assert_eq!(
            err.to_string(),
            "Unexpected HTTP status 404 from https://example.com/x.shtml"
        );
    }

    #[test]
    fn test_user_messages() {
        let transport_err = CnWeatherError::transport("test");
        assert!(transport_err.user_message().contains("Unable to reach"));

        let status_err = CnWeatherError::unexpected_status(503, "u");
        assert!(status_err.user_message().contains("503"));

        let validation_err = CnWeatherError::validation("empty region code");
        assert!(validation_err.user_message().contains("empty region code"));

        let output_err = CnWeatherError::output("serializer failed");
        assert!(output_err.user_message().contains("output"));
        assert!(!output_err.user_message().contains("region data"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CnWeatherError = io_err.into();
        assert!(matches!(err, CnWeatherError::Io { .. }));
    }
}
