//! Rust client for the Job Finder HTTP API.
//!
//! Every request function is stateless: it takes a payload (and a token
//! where the endpoint is authenticated) and returns the parsed body or an
//! [`ApiError`] carrying the server's message.
//!
//! ```no_run
//! use jobfinder_api::{ApiClient, ApiConfig, LoginRequest};
//!
//! # async fn run() -> jobfinder_api::Result<()> {
//! let client = ApiClient::new(ApiConfig::from_env())?;
//! let response = client
//!     .login(&LoginRequest {
//!         email: "dev@example.com".into(),
//!         password: "hunter2".into(),
//!     })
//!     .await?;
//! println!("token: {:?}", response.token);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod request;
mod types;

pub use client::ApiClient;
pub use config::{API_URL_ENV, ApiConfig, AuthScheme, DEFAULT_API_URL, normalize_base_url};
pub use error::{ApiError, FailureKind, Result};
pub use request::{ApiRequest, HttpMethod};
pub use types::*;
