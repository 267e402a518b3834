//! Request pipeline
//!
//! [`StorefrontClient`] merges each [`RequestDescriptor`] over the shared
//! configuration, hands it to the transport, and routes the result through the
//! interceptors. `execute` never returns `Err` and never panics: every outcome,
//! including malformed requests and network failures, comes back as an
//! [`Outcome`].

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::interceptor::Interceptors;
use crate::outcome::{NormalizedError, Outcome};
use crate::request::RequestDescriptor;
use crate::session::{LoggingRedirector, NoopSession, Redirector, SessionHandle};
use crate::transport::{FailureKind, HttpTransport, Transport, TransportFailure, TransportRequest};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_telemetry::{pipeline, Counter, RequestTimer};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Code for request bodies that could not be serialized
pub const INVALID_REQUEST_BODY: &str = "INVALID_REQUEST_BODY";

const CLIENT_USER_AGENT: &str = concat!("storefront-api-client/", env!("CARGO_PKG_VERSION"));

/// Storefront API client
///
/// Cheap to clone; clones share configuration, transport and session
/// capabilities.
#[derive(Clone)]
pub struct StorefrontClient {
    config: Arc<ClientConfig>,
    base_url: Url,
    default_headers: HeaderMap,
    transport: Arc<dyn Transport>,
    interceptors: Interceptors,
}

/// Builder for clients with custom transport or session capabilities
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    session: Arc<dyn SessionHandle>,
    redirector: Arc<dyn Redirector>,
}

impl ClientBuilder {
    /// Start from a configuration with the default transport and capabilities
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            session: Arc::new(NoopSession),
            redirector: Arc::new(LoggingRedirector),
        }
    }

    /// Use a custom transport
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a session handle for 401 sign-out
    #[must_use]
    pub fn session(mut self, session: Arc<dyn SessionHandle>) -> Self {
        self.session = session;
        self
    }

    /// Use a redirector for 403 re-authentication
    #[must_use]
    pub fn redirector(mut self, redirector: Arc<dyn Redirector>) -> Self {
        self.redirector = redirector;
        self
    }

    /// Validate the configuration and build the client
    pub fn build(self) -> ApiResult<StorefrontClient> {
        self.config.validate()?;

        let base_url = self.config.base_url()?;
        let reauth_url = self.config.reauth_url()?;
        let default_headers = default_headers(&self.config)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        Ok(StorefrontClient {
            config: Arc::new(self.config),
            base_url,
            default_headers,
            transport,
            interceptors: Interceptors::new(self.session, self.redirector, reauth_url),
        })
    }
}

impl StorefrontClient {
    /// Create a client from environment configuration
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a client with a specific configuration and default capabilities
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        ClientBuilder::new(config).build()
    }

    /// Start building a client
    #[must_use]
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL request paths are joined onto
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Re-authentication URL used for 403 redirects
    #[must_use]
    pub fn reauth_url(&self) -> &Url {
        self.interceptors.reauth_url()
    }

    /// Execute a request and normalize the result
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Outcome<Value> {
        let request_id = Uuid::new_v4().to_string();
        pipeline().incr(Counter::RequestsTotal);

        let request = match self.prepare(&request_id, descriptor) {
            Ok(request) => request,
            Err(failure) => {
                pipeline().incr(Counter::RequestsFailure);
                return self.interceptors.on_error(&request_id, &failure);
            }
        };

        let url = request.url.clone();
        let timer = RequestTimer::start();
        let result = self.transport.send(request).await;
        let elapsed = timer.finish();

        match result {
            Ok(response) => {
                pipeline().incr(Counter::RequestsSuccess);
                debug!(
                    request_id = %request_id,
                    url = %url,
                    status = response.status,
                    elapsed_ms = elapsed.as_millis(),
                    "Request succeeded"
                );
                self.interceptors.on_success(response)
            }
            Err(failure) => {
                pipeline().incr(Counter::RequestsFailure);
                debug!(
                    request_id = %request_id,
                    url = %url,
                    elapsed_ms = elapsed.as_millis(),
                    error = %failure,
                    "Request failed"
                );
                self.interceptors.on_error(&request_id, &failure)
            }
        }
    }

    /// Execute a request and decode the payload into `T`
    pub async fn execute_as<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Outcome<T> {
        self.execute(descriptor).await.decode()
    }

    /// Execute a request and report how long it took
    pub async fn execute_timed(&self, descriptor: RequestDescriptor) -> (Outcome<Value>, Duration) {
        let start = Instant::now();
        let outcome = self.execute(descriptor).await;
        (outcome, start.elapsed())
    }

    /// GET a path and decode the payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Outcome<T> {
        self.execute_as(RequestDescriptor::get(path)).await
    }

    /// POST a JSON body to a path and decode the payload
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Outcome<T> {
        match RequestDescriptor::post(path).with_json(body) {
            Ok(descriptor) => self.execute_as(descriptor).await,
            Err(e) => Outcome::Failure(NormalizedError::Synthesized {
                code: INVALID_REQUEST_BODY.to_string(),
                details: serde_json::json!({ "reason": e.to_string() }),
            }),
        }
    }

    /// Merge a descriptor over the client defaults
    fn prepare(
        &self,
        request_id: &str,
        descriptor: RequestDescriptor,
    ) -> Result<TransportRequest, TransportFailure> {
        let mut url = self
            .base_url
            .join(descriptor.relative_path())
            .map_err(|e| invalid_request(format!("cannot join path '{}': {e}", descriptor.path)))?;

        if !descriptor.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                descriptor
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        let mut headers = self.default_headers.clone();
        let request_id_value = HeaderValue::from_str(request_id)
            .map_err(|e| invalid_request(format!("invalid request id: {e}")))?;
        headers.insert(X_REQUEST_ID, request_id_value);

        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid_request(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| invalid_request(format!("invalid value for header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        Ok(TransportRequest {
            request_id: request_id.to_string(),
            method: descriptor.method,
            url,
            headers,
            body: descriptor.body,
        })
    }
}

fn invalid_request(message: String) -> TransportFailure {
    TransportFailure::without_response(FailureKind::Request, message)
}

fn default_headers(config: &ClientConfig) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(config.response_type.accept()));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    if let Some(ref token) = config.access_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::config("access token is not a valid header value"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
