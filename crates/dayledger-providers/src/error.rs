//! Error types for calendar provider operations.

use std::fmt;
use thiserror::Error;

/// Broad category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The calendar source could not be reached or read.
    NetworkError,
    /// The source answered with data that could not be parsed.
    InvalidResponse,
    /// The calendar source does not exist.
    NotFound,
    /// The provider is missing settings or was built for an unsupported kind.
    ConfigurationError,
    /// Unexpected state inside the provider.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if retrying the same fetch may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported by a calendar provider.
///
/// Carries a code for classification, the name of the provider that raised
/// it and, optionally, the underlying I/O or parse error.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Classifies an I/O failure on a calendar source.
    pub fn from_io(err: std::io::Error, what: &str) -> Self {
        let base = match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(format!("{} does not exist", what)),
            _ => Self::network(format!("failed to read {}: {}", what, err)),
        };
        base.with_source(err)
    }

    /// Sets the provider name.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// Copies code, message and provider; the source is not cloneable.
    pub fn duplicate(&self) -> Self {
        Self {
            code: self.code,
            message: self.message.clone(),
            provider: self.provider.clone(),
            source: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn only_network_errors_retry() {
        assert!(ProviderErrorCode::NetworkError.is_retryable());
        assert!(!ProviderErrorCode::InvalidResponse.is_retryable());
        assert!(!ProviderErrorCode::NotFound.is_retryable());
        assert!(!ProviderErrorCode::ConfigurationError.is_retryable());
    }

    #[test]
    fn display_includes_provider_and_code() {
        let err = ProviderError::invalid_response("expected an array").with_provider("json");
        assert_eq!(err.to_string(), "[json] invalid_response: expected an array");

        let err = ProviderError::internal("boom");
        assert_eq!(err.to_string(), "internal_error: boom");
    }

    #[test]
    fn from_io_classifies_missing_files() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ProviderError::from_io(missing, "calendar.json");
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert!(err.source().is_some());

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ProviderError::from_io(denied, "calendar.json");
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
        assert!(err.is_retryable());
    }

    #[test]
    fn duplicate_drops_source() {
        let err = ProviderError::network("down")
            .with_provider("ics")
            .with_source(std::io::Error::other("reset"));
        let copy = err.duplicate();
        assert_eq!(copy.code(), err.code());
        assert_eq!(copy.message(), "down");
        assert_eq!(copy.provider(), Some("ics"));
        assert!(copy.source().is_none());
    }
}
