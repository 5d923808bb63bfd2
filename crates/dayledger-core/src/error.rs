//! Schedule error types.

use thiserror::Error;

/// Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors that can occur while building a schedule.
///
/// The engine components themselves (rule generation, timeline merge, gap
/// filling) are total; errors only arise at the request boundary, while
/// validating configuration, or from the calendar provider.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The requested date range is malformed or inverted.
    #[error("invalid date range: {message}")]
    InvalidDateRange { message: String },

    /// The schedule configuration violates an invariant.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The calendar provider could not be reached or queried.
    #[error("calendar provider unavailable: {message}")]
    ProviderUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ScheduleError {
    /// Creates an invalid date range error.
    pub fn invalid_date_range(message: impl Into<String>) -> Self {
        Self::InvalidDateRange {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a provider unavailable error wrapping the underlying cause.
    pub fn provider_unavailable<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ProviderUnavailable {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDateRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_messages() {
        let err = ScheduleError::invalid_date_range("from is after to");
        assert_eq!(err.to_string(), "invalid date range: from is after to");

        let err = ScheduleError::invalid_config("rule 'Lunch' ends before it starts");
        assert!(err.to_string().starts_with("invalid configuration:"));
    }

    #[test]
    fn provider_unavailable_keeps_source() {
        let io_err = std::io::Error::other("connection refused");
        let err = ScheduleError::provider_unavailable(io_err);
        assert!(err.to_string().contains("connection refused"));
        assert!(err.source().is_some());
        assert!(!err.is_client_error());
    }

    #[test]
    fn client_error_classification() {
        assert!(ScheduleError::invalid_date_range("x").is_client_error());
        assert!(!ScheduleError::invalid_config("x").is_client_error());
    }
}
