//! Normalized call results
//!
//! Every request resolves to an [`Outcome`]: either the response payload or a
//! [`NormalizedError`]. Callers never see transport-level envelopes and never
//! receive both sides at once.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Sentinel code for failures without a structured error body
pub const UNEXPECTED_SERVER_ERROR: &str = "UNEXPECTED_SERVER_ERROR";

/// Code for successful responses whose payload does not match the expected model
pub const INVALID_RESPONSE_BODY: &str = "INVALID_RESPONSE_BODY";

/// Uniform error shape handed to every caller
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedError {
    /// Error body from the server, untouched
    Passthrough(Value),
    /// Error built locally because the server gave nothing usable
    Synthesized {
        /// Fixed error code
        code: String,
        /// Context for the failure
        details: Value,
    },
}

impl NormalizedError {
    /// Sentinel error wrapping the raw failure envelope
    #[must_use]
    pub fn unexpected(details: Value) -> Self {
        Self::Synthesized {
            code: UNEXPECTED_SERVER_ERROR.to_string(),
            details,
        }
    }

    /// Error for a payload that failed to decode into the requested type
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::Synthesized {
            code: INVALID_RESPONSE_BODY.to_string(),
            details: json!({ "reason": reason.into() }),
        }
    }

    /// Error code, if the error carries one
    ///
    /// Passthrough bodies are inspected for a string `code` field.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Passthrough(body) => body.get("code").and_then(Value::as_str),
            Self::Synthesized { code, .. } => Some(code),
        }
    }

    /// Error details, if the error carries any
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Passthrough(body) => body.get("details"),
            Self::Synthesized { details, .. } => Some(details),
        }
    }

    /// Whether this is the sentinel for unstructured failures
    #[must_use]
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Synthesized { code, .. } if code == UNEXPECTED_SERVER_ERROR)
    }

    /// JSON representation as callers see it
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Passthrough(body) => body.clone(),
            Self::Synthesized { code, details } => json!({ "code": code, "details": details }),
        }
    }
}

impl Serialize for NormalizedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "server error"),
        }?;
        if let Some(message) = self
            .to_value()
            .get("message")
            .and_then(Value::as_str)
        {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for NormalizedError {}

/// Result of a single pipeline call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Response payload
    Success(T),
    /// Normalized failure
    Failure(NormalizedError),
}

impl<T> Outcome<T> {
    /// Whether the call succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the call failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrow the payload
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Borrow the error
    #[must_use]
    pub fn error(&self) -> Option<&NormalizedError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    /// Positional `(data, error)` pair; exactly one side is `Some`
    pub fn into_pair(self) -> (Option<T>, Option<NormalizedError>) {
        match self {
            Self::Success(data) => (Some(data), None),
            Self::Failure(err) => (None, Some(err)),
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, NormalizedError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(err) => Err(err),
        }
    }

    /// Transform the payload, leaving failures alone
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success(data) => Outcome::Success(f(data)),
            Self::Failure(err) => Outcome::Failure(err),
        }
    }
}

impl Outcome<Value> {
    /// Decode the payload into a typed model
    ///
    /// A payload that does not match `T` becomes an `INVALID_RESPONSE_BODY`
    /// failure.
    pub fn decode<T: DeserializeOwned>(self) -> Outcome<T> {
        match self {
            Self::Success(data) => match serde_json::from_value(data) {
                Ok(typed) => Outcome::Success(typed),
                Err(e) => Outcome::Failure(NormalizedError::invalid_body(e.to_string())),
            },
            Self::Failure(err) => Outcome::Failure(err),
        }
    }
}

impl<T> From<Result<T, NormalizedError>> for Outcome<T> {
    fn from(result: Result<T, NormalizedError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err),
        }
    }
}
