//! Transport boundary
//!
//! The pipeline never talks to `reqwest` directly; it goes through the
//! [`Transport`] trait so the interceptors can be exercised against any
//! HTTP-capable backend. A transport reports every non-2xx status as a
//! [`TransportFailure`] carrying the response, and every network-level
//! problem as a failure without one.

use crate::config::{ClientConfig, ResponseType};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Fully merged request, ready to be sent
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Correlation id, also sent as `X-Request-ID`
    pub request_id: String,
    /// HTTP method
    pub method: Method,
    /// Absolute URL including query
    pub url: Url,
    /// Final header set
    pub headers: HeaderMap,
    /// JSON body
    pub body: Option<Value>,
}

/// Successful (2xx) response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase
    pub status_text: String,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Decoded body; `Null` when the body was empty
    pub data: Value,
}

/// Response attached to a failed call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase
    pub status_text: String,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Decoded body, absent when the body was empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl FailureResponse {
    /// Bare failure response with a status and nothing else
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: reason_phrase(status),
            headers: BTreeMap::new(),
            data: None,
        }
    }

    /// Attach a body
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Shallow copy of the response envelope as a JSON object
    #[must_use]
    pub fn envelope(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Value::Object(map),
            _ => Value::Object(Map::new()),
        }
    }
}

/// Category of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Server answered with a non-2xx status
    Status,
    /// Connection could not be established
    Connect,
    /// Request timed out
    Timeout,
    /// Response body could not be read
    Body,
    /// Anything else the HTTP stack reported
    Request,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Body => "body",
            Self::Request => "request",
        };
        f.write_str(name)
    }
}

/// Failed call, with or without a response
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} failure: {message}")]
pub struct TransportFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable description
    pub message: String,
    /// Server response, when one was received
    pub response: Option<FailureResponse>,
}

impl TransportFailure {
    /// Failure caused by a non-2xx response
    #[must_use]
    pub fn from_response(response: FailureResponse) -> Self {
        Self {
            kind: FailureKind::Status,
            message: format!("server responded with status {}", response.status),
            response: Some(response),
        }
    }

    /// Failure without any response
    pub fn without_response(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
        }
    }

    /// Status code of the attached response
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            FailureKind::Timeout
        } else if e.is_connect() {
            FailureKind::Connect
        } else if e.is_body() || e.is_decode() {
            FailureKind::Body
        } else {
            FailureKind::Request
        };
        Self::without_response(kind, e.to_string())
    }
}

/// HTTP-capable transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request; non-2xx statuses come back as `Err`
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
    response_type: ResponseType,
}

impl HttpTransport {
    /// Build a transport honouring the configured timeout and encoding
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let inner = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            response_type: config.response_type,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = header_map_to_btree(response.headers());

        if status.is_success() {
            let text = response.text().await?;
            return Ok(TransportResponse {
                status: status.as_u16(),
                status_text: reason_phrase(status.as_u16()),
                headers,
                data: decode_body(self.response_type, &text).unwrap_or(Value::Null),
            });
        }

        // The status is already known; an unreadable error body must not hide it.
        let data = match response.text().await {
            Ok(text) => decode_body(self.response_type, &text),
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "Error body unreadable");
                None
            }
        };
        Err(TransportFailure::from_response(FailureResponse {
            status: status.as_u16(),
            status_text: reason_phrase(status.as_u16()),
            headers,
            data,
        }))
    }
}

/// Decode a raw body according to the expected encoding
///
/// Empty bodies decode to `None`. JSON that fails to parse is kept as a
/// string rather than dropped.
#[must_use]
pub fn decode_body(response_type: ResponseType, text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match response_type {
        ResponseType::Json => Some(
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
        ),
        ResponseType::Text => Some(Value::String(text.to_string())),
    }
}

fn header_map_to_btree(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(ResponseType::Json, ""), None);
        assert_eq!(decode_body(ResponseType::Json, "  \n"), Some(json!("  \n")));
        assert_eq!(
            decode_body(ResponseType::Json, r#"{"id":1}"#),
            Some(json!({"id": 1}))
        );
        assert_eq!(
            decode_body(ResponseType::Json, "<html>Bad Gateway</html>"),
            Some(json!("<html>Bad Gateway</html>"))
        );
        assert_eq!(
            decode_body(ResponseType::Text, r#"{"id":1}"#),
            Some(json!(r#"{"id":1}"#))
        );
    }

    #[test]
    fn test_failure_envelope() {
        let response = FailureResponse::new(403).with_header("x-trace", "abc");
        assert_eq!(
            response.envelope(),
            json!({
                "status": 403,
                "statusText": "Forbidden",
                "headers": {"x-trace": "abc"}
            })
        );

        let with_data = FailureResponse::new(500).with_data(json!(""));
        assert_eq!(with_data.envelope()["data"], json!(""));
    }

    #[test]
    fn test_failure_status() {
        let failure = TransportFailure::from_response(FailureResponse::new(401));
        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.status(), Some(401));

        let failure = TransportFailure::without_response(FailureKind::Timeout, "30s elapsed");
        assert_eq!(failure.status(), None);
        assert_eq!(failure.to_string(), "timeout failure: 30s elapsed");
    }

    fn get(url: Url) -> TransportRequest {
        TransportRequest {
            request_id: "req-1".to_string(),
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    async fn send_to(raw: &'static str) -> Result<TransportResponse, TransportFailure> {
        let url = testing::serve(vec![raw]).await;
        let transport = HttpTransport::new(&ClientConfig::new(url.as_str())).unwrap();
        transport.send(get(url)).await
    }

    #[tokio::test]
    async fn test_http_success_decodes_body() {
        let response = send_to(testing::OK_JSON).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.data, json!({"id": 1}));
        assert_eq!(response.headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_http_error_status_keeps_headers_and_body() {
        let failure = send_to(testing::UNAUTHORIZED_JSON).await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::Status);
        let response = failure.response.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(response.headers["x-trace"], "t-401");
        assert_eq!(response.data, Some(json!({"code": "X"})));
    }

    #[tokio::test]
    async fn test_http_empty_error_bodies_are_absent() {
        let forbidden = send_to(testing::FORBIDDEN_EMPTY).await.unwrap_err();
        assert_eq!(forbidden.status(), Some(403));
        assert_eq!(forbidden.response.unwrap().data, None);

        let server_error = send_to(testing::SERVER_ERROR_EMPTY).await.unwrap_err();
        let response = server_error.response.unwrap();
        assert_eq!(response.status, 500);
        assert!(response.envelope().get("data").is_none());
    }

    #[tokio::test]
    async fn test_http_truncated_error_body_keeps_status() {
        let failure = send_to(testing::UNAUTHORIZED_TRUNCATED).await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.status(), Some(401));
        assert_eq!(failure.response.unwrap().data, None);
    }

    #[test]
    fn test_http_transport_builds() {
        let transport = HttpTransport::new(&ClientConfig::development());
        assert!(transport.is_ok());
    }
}
