//! Session capabilities
//!
//! The client does not own any authentication state. It only holds two
//! capabilities supplied by its host: one that ends the current session, and
//! one that sends the user to the re-authentication page. Both are invoked
//! fire-and-forget from the error interceptor.

use crate::error::SessionError;
use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

/// Ends the current user's session
///
/// Several in-flight requests may fail with 401 at once, so implementations
/// must tolerate concurrent and repeated calls.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Clear authentication state and perform any host-specific cleanup
    async fn sign_out(&self) -> Result<(), SessionError>;
}

/// Navigates the hosting context to another location
#[async_trait]
pub trait Redirector: Send + Sync {
    /// Navigate to `url`; with `replace` the current history entry is replaced
    async fn redirect(&self, url: &Url, replace: bool) -> Result<(), SessionError>;
}

/// Session handle for hosts without a session
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSession;

#[async_trait]
impl SessionHandle for NoopSession {
    async fn sign_out(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Redirector that only records the request in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRedirector;

#[async_trait]
impl Redirector for LoggingRedirector {
    async fn redirect(&self, url: &Url, replace: bool) -> Result<(), SessionError> {
        info!(url = %url, replace, "Re-authentication required");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_capabilities_succeed() {
        assert!(NoopSession.sign_out().await.is_ok());

        let url = Url::parse("https://shop.test/login").unwrap();
        assert!(LoggingRedirector.redirect(&url, true).await.is_ok());
    }
}
