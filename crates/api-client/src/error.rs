//! Construction-time errors
//!
//! `ApiError` covers everything that can go wrong *before* a request is sent:
//! building the client, resolving configuration, joining URLs. Once a call is
//! in flight every outcome, failures included, is an [`Outcome`](crate::Outcome).

use thiserror::Error;

/// Result type alias for client construction and configuration
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a client could not be built
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client could not be built
    #[error("could not build HTTP client: {0}")]
    Request(#[from] reqwest::Error),

    /// Malformed JSON
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Inconsistent or out-of-range setting
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Required variable absent or blank
    #[error("{0} is not set")]
    MissingEnvVar(String),

    /// URL that does not parse or is not http(s)
    #[error("invalid URL {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Invalid setting with a description
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Required environment variable absent
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// URL that failed to parse or has the wrong scheme
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Whether this error means the client was never usable
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingEnvVar(_) | Self::InvalidUrl(_)
        )
    }
}

/// Errors reported by session and redirect capabilities
///
/// These never reach the caller of a request; the pipeline logs them and
/// carries on with the normalized failure it was already building.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Clearing the stored session failed
    #[error("Sign-out failed: {0}")]
    SignOut(String),

    /// Redirecting to the re-authentication page failed
    #[error("Redirect failed: {0}")]
    Redirect(String),

    /// IO error from a file-backed session store
    #[error("Session store IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(ApiError::missing_env("STOREFRONT_API_URL").is_configuration());
        assert!(ApiError::config("timeout cannot be zero").is_configuration());
        assert!(ApiError::invalid_url("nope").is_configuration());

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ApiError::from(json).is_configuration());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::missing_env("STOREFRONT_API_URL");
        assert_eq!(
            err.to_string(),
            "STOREFRONT_API_URL is not set"
        );

        let err = SessionError::SignOut("token file locked".into());
        assert_eq!(err.to_string(), "Sign-out failed: token file locked");
    }
}
