//! Request pipeline for the storefront API
//!
//! This crate wraps outbound HTTP calls to the storefront backend and
//! normalizes every result the same way, so callers deal with one shape for
//! success and one for failure.
//!
//! # Features
//!
//! - **Environment-based configuration**: API and auth origins, token and timeout from env vars
//! - **Uniform results**: every call returns an [`Outcome`], `Success(payload)` or `Failure(NormalizedError)`
//! - **Session handling**: 401 signs the user out, 403 redirects to re-authentication
//! - **Pluggable transport**: `reqwest` by default, any [`Transport`] for tests or other hosts
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//! - **Typed models**: products, orders, carts, search and navigation types
//!
//! # Example
//!
//! ```rust,no_run
//! use storefront_api_client::models::{ShopSearchOptions, ShopSearchResponse};
//! use storefront_api_client::{Outcome, RequestDescriptor, StorefrontClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fails fast when STOREFRONT_API_URL is missing or invalid
//!     let client = StorefrontClient::new()?;
//!
//!     let options = ShopSearchOptions::new("en").with_query("sneakers");
//!     let request = RequestDescriptor::get("search").with_query_pairs(options.to_query());
//!
//!     match client.execute_as::<ShopSearchResponse>(request).await {
//!         Outcome::Success(results) => println!("{} products", results.total_count),
//!         Outcome::Failure(err) => eprintln!("search failed: {err}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
#[allow(missing_docs)]
pub mod models;
pub mod outcome;
pub mod request;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{ClientBuilder, StorefrontClient};
pub use config::{ClientConfig, Environment, ResponseType};
pub use error::{ApiError, ApiResult, SessionError};
pub use outcome::{NormalizedError, Outcome, UNEXPECTED_SERVER_ERROR};
pub use request::RequestDescriptor;
pub use session::{LoggingRedirector, NoopSession, Redirector, SessionHandle};
pub use transport::{HttpTransport, Transport, TransportFailure, TransportResponse};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::StorefrontClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::outcome::{NormalizedError, Outcome};
    pub use crate::request::RequestDescriptor;
    pub use crate::session::{Redirector, SessionHandle};
}
