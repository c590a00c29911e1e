use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("One-time code request failed: {message}")]
    CodeRequestError { message: String },

    #[error("One-time code confirmation failed: {message}")]
    ConfirmError { message: String },

    #[error("Session fetch failed for {location}: {message}")]
    SessionFetchError { location: String, message: String },

    #[error("Invalid age filter {value}: only 18 and 45 are supported")]
    InvalidAgeError { value: u32 },

    #[error("Location lookup failed: {message}")]
    MetadataError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Input error: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Configuration,
    Input,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WatchError::CodeRequestError { .. } | WatchError::ConfirmError { .. } => {
                ErrorCategory::Authentication
            }
            WatchError::ApiError(_)
            | WatchError::SessionFetchError { .. }
            | WatchError::MetadataError { .. } => ErrorCategory::Network,
            WatchError::InvalidAgeError { .. }
            | WatchError::ConfigValidationError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            WatchError::InputError { .. } => ErrorCategory::Input,
            WatchError::IoError(_) | WatchError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單輪查詢失敗，下一輪會重試
            WatchError::SessionFetchError { .. } => ErrorSeverity::Low,
            WatchError::ApiError(_) | WatchError::MetadataError { .. } => ErrorSeverity::Medium,
            WatchError::CodeRequestError { .. }
            | WatchError::ConfirmError { .. }
            | WatchError::InputError { .. }
            | WatchError::InvalidAgeError { .. }
            | WatchError::ConfigValidationError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::MissingConfigError { .. } => ErrorSeverity::High,
            WatchError::IoError(_) | WatchError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether the next polling round may succeed without user action.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WatchError::SessionFetchError { .. } | WatchError::ApiError(_)
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Authentication => {
                "Check the phone number and enter the newest one-time code before it expires"
            }
            ErrorCategory::Network => {
                "Check network connectivity and the api.base_url setting; the API may be rate limiting"
            }
            ErrorCategory::Configuration => {
                "Fix the configuration file; min_age must be 18 or 45 and every location needs a name and id"
            }
            ErrorCategory::Input => "Enter a non-empty value at the prompt",
            ErrorCategory::Internal => "Re-run with --verbose and report the log output",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WatchError::CodeRequestError { .. } => {
                "Could not request a one-time code for this phone number".to_string()
            }
            WatchError::ConfirmError { .. } => {
                "The one-time code was not accepted, no session token was issued".to_string()
            }
            WatchError::InvalidAgeError { value } => {
                format!("Age filter {} is not supported, use 18 or 45", value)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_are_fatal() {
        let err = WatchError::ConfirmError {
            message: "401 Unauthorized".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_session_fetch_error_is_transient() {
        let err = WatchError::SessionFetchError {
            location: "Agra".to_string(),
            message: "timed out".to_string(),
        };
        assert!(err.is_transient());
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.to_string().contains("Agra"));
    }

    #[test]
    fn test_invalid_age_message() {
        let err = WatchError::InvalidAgeError { value: 30 };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().contains("30"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err: WatchError = io_err.into();
        assert!(matches!(err, WatchError::IoError(_)));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
