//! Configuration for the storefront API client
//!
//! The configuration is resolved once at process start, validated, and then
//! shared read-only by every request the client makes.

use crate::error::{ApiError, ApiResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable holding the API base origin (required)
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
/// Environment variable holding the re-authentication origin
pub const ENV_AUTH_URL: &str = "STOREFRONT_AUTH_URL";
/// Environment variable overriding the login path on the auth origin
pub const ENV_LOGIN_PATH: &str = "STOREFRONT_LOGIN_PATH";
/// Environment variable holding the bearer token for authenticated calls
pub const ENV_ACCESS_TOKEN: &str = "STOREFRONT_ACCESS_TOKEN";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "STOREFRONT_TIMEOUT_SECS";
/// Environment variable selecting the expected response encoding
pub const ENV_RESPONSE_TYPE: &str = "STOREFRONT_RESPONSE_TYPE";
/// Environment variable selecting the deployment environment
pub const ENV_ENVIRONMENT: &str = "STOREFRONT_ENV";

const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deployment the client talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    Development,
    /// Pre-release deployment
    Staging,
    /// Live storefront
    #[default]
    Production,
}

impl Environment {
    /// Parse an environment name, falling back to production
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Default request timeout for this environment
    #[must_use]
    pub fn default_timeout(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(10),
            Self::Staging | Self::Production => DEFAULT_TIMEOUT,
        }
    }
}

/// Expected encoding of response bodies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Bodies are parsed as JSON; unparseable text is kept as a string
    #[default]
    Json,
    /// Bodies are kept as plain text
    Text,
}

impl ResponseType {
    /// Parse a response type name
    pub fn parse(value: &str) -> ApiResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(ApiError::config(format!(
                "unsupported response type '{other}' (expected json or text)"
            ))),
        }
    }

    /// `Accept` header value matching this encoding
    #[must_use]
    pub fn accept(self) -> &'static str {
        match self {
            Self::Json => "application/json, text/plain, */*",
            Self::Text => "text/plain, */*",
        }
    }
}

/// Everything a client needs before its first request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base origin every request path is joined onto
    pub api_url: String,
    /// Origin of the authentication service used for re-login
    pub auth_url: String,
    /// Path of the login page on `auth_url`
    pub login_path: String,
    /// Bearer token sent with every request
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Expected response encoding
    pub response_type: ResponseType,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Deployment preset
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl ClientConfig {
    /// Create a production configuration for the given API origin
    ///
    /// The auth origin defaults to the API origin.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            auth_url: api_url.clone(),
            api_url,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            access_token: None,
            response_type: ResponseType::Json,
            timeout: DEFAULT_TIMEOUT,
            environment: Environment::Production,
        }
    }

    /// Load from the process environment
    ///
    /// - `STOREFRONT_API_URL`: API base origin (required)
    /// - `STOREFRONT_AUTH_URL`: re-authentication origin (defaults to the API origin)
    /// - `STOREFRONT_LOGIN_PATH`: login page path (default `/login`)
    /// - `STOREFRONT_ACCESS_TOKEN`: bearer token
    /// - `STOREFRONT_TIMEOUT_SECS`: request timeout in seconds
    /// - `STOREFRONT_RESPONSE_TYPE`: `json` or `text`
    /// - `STOREFRONT_ENV`: development/staging/production
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get(ENV_API_URL).ok_or_else(|| ApiError::missing_env(ENV_API_URL))?;
        let environment = get(ENV_ENVIRONMENT)
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    ApiError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))
                })?,
            None => environment.default_timeout(),
        };

        let response_type = match get(ENV_RESPONSE_TYPE) {
            Some(raw) => ResponseType::parse(&raw)?,
            None => ResponseType::default(),
        };

        let config = Self {
            auth_url: get(ENV_AUTH_URL).unwrap_or_else(|| api_url.clone()),
            api_url,
            login_path: get(ENV_LOGIN_PATH).unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            access_token: get(ENV_ACCESS_TOKEN),
            response_type,
            timeout,
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create development configuration (local API on port 8080)
    #[must_use]
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            timeout: Environment::Development.default_timeout(),
            ..Self::new("http://localhost:8080")
        }
    }

    /// Replace the API origin
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Replace the re-authentication origin
    #[must_use]
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Replace the login path
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Authenticate requests with a bearer token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Expect a different response encoding
    #[must_use]
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL with a trailing slash, ready for joining request paths
    pub fn base_url(&self) -> ApiResult<Url> {
        let mut raw = self.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        parse_http_url("api_url", &raw)
    }

    /// Full URL of the re-authentication page
    pub fn reauth_url(&self) -> ApiResult<Url> {
        let origin = self.auth_url.trim().trim_end_matches('/');
        let path = self.login_path.trim();
        let joined = if path.starts_with('/') {
            format!("{origin}{path}")
        } else {
            format!("{origin}/{path}")
        };
        parse_http_url("auth_url", &joined)
    }

    /// Check the URLs resolve and the timeout is usable
    pub fn validate(&self) -> ApiResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ApiError::config("api_url cannot be empty"));
        }

        self.base_url()?;
        self.reauth_url()?;

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

fn parse_http_url(field: &str, raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw).map_err(|e| ApiError::invalid_url(format!("{field} '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::invalid_url(format!(
            "{field} '{raw}': scheme must be http or https, got {scheme}"
        ))),
    }
}
