//! Response and error interceptors
//!
//! Every transport result passes through exactly one of these stages before it
//! reaches the caller:
//!
//! - [`Interceptors::on_success`] keeps the payload and drops the envelope.
//! - [`Interceptors::on_error`] first dispatches status-driven side effects
//!   (401 ends the session, 403 redirects to re-authentication), then
//!   classifies the failure body into a [`NormalizedError`].
//!
//! Side effects run on their own task. The error returned to the caller is
//! decided without waiting for them.

use crate::outcome::{NormalizedError, Outcome};
use crate::session::{Redirector, SessionHandle};
use crate::transport::{TransportFailure, TransportResponse};
use reqwest::Url;
use serde_json::{Map, Value};
use std::sync::Arc;
use storefront_telemetry::{pipeline, Counter};
use tracing::{debug, warn};

/// Status that ends the current session
pub const STATUS_UNAUTHENTICATED: u16 = 401;
/// Status that sends the user to re-authenticate
pub const STATUS_UNAUTHORIZED: u16 = 403;

/// Side effect triggered by a failure status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// End the current session
    SignOut,
    /// Navigate to the re-authentication page, replacing history
    Redirect,
}

impl SideEffect {
    /// Side effect for a failure status, if any
    #[must_use]
    pub fn for_status(status: Option<u16>) -> Option<Self> {
        match status {
            Some(STATUS_UNAUTHENTICATED) => Some(Self::SignOut),
            Some(STATUS_UNAUTHORIZED) => Some(Self::Redirect),
            _ => None,
        }
    }
}

/// Success and error interceptors bound to a host's session capabilities
#[derive(Clone)]
pub struct Interceptors {
    session: Arc<dyn SessionHandle>,
    redirector: Arc<dyn Redirector>,
    reauth_url: Url,
}

impl Interceptors {
    /// Bind interceptors to session capabilities and a re-authentication URL
    pub fn new(
        session: Arc<dyn SessionHandle>,
        redirector: Arc<dyn Redirector>,
        reauth_url: Url,
    ) -> Self {
        Self {
            session,
            redirector,
            reauth_url,
        }
    }

    /// Re-authentication URL used for 403 redirects
    #[must_use]
    pub fn reauth_url(&self) -> &Url {
        &self.reauth_url
    }

    /// Success stage: keep only the payload
    #[must_use]
    pub fn on_success(&self, response: TransportResponse) -> Outcome<Value> {
        Outcome::Success(response.data)
    }

    /// Error stage: dispatch side effects, then normalize the failure
    pub fn on_error(&self, request_id: &str, failure: &TransportFailure) -> Outcome<Value> {
        debug!(
            request_id = %request_id,
            status = ?failure.status(),
            kind = %failure.kind,
            response = ?failure.response,
            "Request failed"
        );

        if let Some(effect) = SideEffect::for_status(failure.status()) {
            self.dispatch(request_id, effect);
        }

        Outcome::Failure(classify_failure(failure))
    }

    fn dispatch(&self, request_id: &str, effect: SideEffect) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(request_id = %request_id, ?effect, "No async runtime, side effect skipped");
            return;
        };

        let request_id = request_id.to_string();
        match effect {
            SideEffect::SignOut => {
                pipeline().incr(Counter::SignOut);
                let session = Arc::clone(&self.session);
                runtime.spawn(async move {
                    if let Err(e) = session.sign_out().await {
                        warn!(request_id = %request_id, error = %e, "Sign-out after 401 failed");
                    }
                });
            }
            SideEffect::Redirect => {
                pipeline().incr(Counter::Redirect);
                let redirector = Arc::clone(&self.redirector);
                let url = self.reauth_url.clone();
                runtime.spawn(async move {
                    if let Err(e) = redirector.redirect(&url, true).await {
                        warn!(request_id = %request_id, url = %url, error = %e, "Redirect after 403 failed");
                    }
                });
            }
        }
    }
}

/// Normalize a transport failure
///
/// A structured body is passed through unchanged. Anything else becomes the
/// `UNEXPECTED_SERVER_ERROR` sentinel, with the response envelope as details
/// or `{}` when there was no response at all.
#[must_use]
pub fn classify_failure(failure: &TransportFailure) -> NormalizedError {
    match failure.response {
        Some(ref response) => match response.data {
            Some(ref body) if has_structured_body(body) => NormalizedError::Passthrough(body.clone()),
            _ => NormalizedError::unexpected(response.envelope()),
        },
        None => NormalizedError::unexpected(Value::Object(Map::new())),
    }
}

/// Whether an error body carries content worth handing to the caller
///
/// `null`, `false`, `0` and the empty string count as no body. Any other
/// string, whitespace included, is passed through.
#[must_use]
pub fn has_structured_body(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
