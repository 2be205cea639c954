//! Error types for availability provider operations.
//!
//! Adapters absorb the quirks of each upstream booking system and report
//! failures as a [`ProviderError`]. The orchestrator turns these into the
//! human-readable `error` string of an availability result, so the message
//! should read well on its own.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credentials were rejected by the upstream API.
    AuthenticationFailed,
    /// Connection failed, DNS resolution failed, etc.
    NetworkError,
    /// The call did not finish before its deadline.
    Timeout,
    /// Too many requests.
    RateLimited,
    /// Upstream returned a 5xx status.
    ServerError,
    /// Upstream returned something we could not understand.
    InvalidResponse,
    /// Upstream has no such site or resource.
    NotFound,
    /// The provider config is missing or invalid for this adapter.
    ConfigurationError,
    /// No adapter is registered for the provider type.
    UnsupportedProvider,
    /// Unexpected state, bug.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if this error is transient and the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::Timeout | Self::RateLimited | Self::ServerError
        )
    }

    /// Returns the snake_case name of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
            Self::UnsupportedProvider => "unsupported_provider",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised by an availability provider or the registry.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Provider type that raised the error (e.g. "acme_booking").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Timeout, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
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

    /// Creates the error reported for an unknown or unregistered provider type.
    pub fn unsupported(provider_type: &str) -> Self {
        Self::new(
            ProviderErrorCode::UnsupportedProvider,
            format!("Provider type not supported: {provider_type}"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the provider type for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
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

    /// Returns the human-readable message, without code or provider prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_codes() {
        assert!(ProviderErrorCode::NetworkError.is_retryable());
        assert!(ProviderErrorCode::Timeout.is_retryable());
        assert!(ProviderErrorCode::RateLimited.is_retryable());
        assert!(ProviderErrorCode::ServerError.is_retryable());
        assert!(!ProviderErrorCode::ConfigurationError.is_retryable());
        assert!(!ProviderErrorCode::UnsupportedProvider.is_retryable());
    }

    #[test]
    fn unsupported_message() {
        let err = ProviderError::unsupported("legacy_api");
        assert_eq!(err.code(), ProviderErrorCode::UnsupportedProvider);
        assert_eq!(err.message(), "Provider type not supported: legacy_api");
    }

    #[test]
    fn display_includes_provider_and_code() {
        let err = ProviderError::rate_limited("slow down").with_provider("acme_booking");
        assert_eq!(err.to_string(), "[acme_booking] rate_limited: slow down");
        assert_eq!(err.provider(), Some("acme_booking"));
        assert_eq!(err.message(), "slow down");
    }

    #[test]
    fn source_is_kept() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset by peer");
        let err = ProviderError::network("connection dropped").with_source(io_err);
        assert!(err.source().is_some());
        assert!(err.is_retryable());
    }
}
