//! HTTP client for the Job Finder API.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{ApiConfig, AuthScheme, normalize_base_url};
use crate::error::{ApiError, Result};
use crate::request::ApiRequest;
use crate::types::*;

const SESSION_EXPIRED: &str = "Session expired";

/// Job Finder API client.
///
/// Holds no session state: authenticated calls take the token explicitly.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    auth_scheme: AuthScheme,
    http: Client,
}

impl ApiClient {
    /// Build a client. Fails with [`ApiError::NotConfigured`] when the base
    /// URL is blank, before any request is made.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(Self {
            base_url,
            auth_scheme: config.auth_scheme,
            http,
        })
    }

    /// Build a client from `PUBLIC_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth_scheme
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url)
    }

    fn authorize(&self, builder: RequestBuilder, token: &str) -> Result<RequestBuilder> {
        if token.trim().is_empty() {
            return Err(ApiError::MissingToken);
        }
        let (name, value) = self.auth_scheme.header(token);
        Ok(builder.header(name, value))
    }

    async fn check_response(response: Response, fallback: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.map_err(ApiError::Http)?;
        let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_default();
        let message = parsed.into_message();

        if status.as_u16() == 401 {
            warn!(status = status.as_u16(), "request rejected as unauthorized");
            return Err(ApiError::Unauthorized {
                message: message.unwrap_or_else(|| SESSION_EXPIRED.to_string()),
            });
        }

        warn!(status = status.as_u16(), message = ?message, "request failed");
        Err(ApiError::Api {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| fallback.to_string()),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await.map_err(ApiError::Http)?;
        Ok(serde_json::from_str(&body)?)
    }

    // ---------- Auth (no token) ----------

    /// Create an account.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let url = self.url("users/signup");
        debug!(%url, email = %request.email, "signing up");
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;
        let response = Self::check_response(response, "Signup failed").await?;
        Self::read_json(response).await
    }

    /// Exchange credentials for a token and user record.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let url = self.url("users/login");
        debug!(%url, email = %request.email, "logging in");
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;
        let response = Self::check_response(response, "Login failed").await?;
        Self::read_json(response).await
    }

    // ---------- Users ----------

    /// Fetch the current user as a raw JSON object, ready to merge over a
    /// stored record.
    pub async fn current_user(&self, token: &str) -> Result<Map<String, Value>> {
        let url = self.url("users/me");
        let builder = self.authorize(self.http.get(&url), token)?;
        let response = builder.send().await?;
        let response = Self::check_response(response, "Failed to fetch current user").await?;
        let body: Value = Self::read_json(response).await?;
        Ok(into_object(unwrap_envelope(body, "user")))
    }

    // ---------- Subscriptions ----------

    pub async fn subscription_status(&self, token: &str) -> Result<Subscription> {
        let url = self.url("users/subscription");
        let builder = self.authorize(self.http.get(&url), token)?;
        let response = builder.send().await?;
        let response =
            Self::check_response(response, "Failed to fetch subscription status").await?;
        let body: Value = Self::read_json(response).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "subscription"))?)
    }

    /// Start or change a paid plan.
    pub async fn subscribe(&self, token: &str, request: &SubscribeRequest) -> Result<Subscription> {
        let url = self.url("users/subscribe");
        debug!(%url, plan = %request.plan, months = request.months, "subscribing");
        let builder = self.authorize(self.http.post(&url).json(request), token)?;
        let response = builder.send().await?;
        let response = Self::check_response(response, "Failed to subscribe").await?;
        let body: Value = Self::read_json(response).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "subscription"))?)
    }

    // ---------- Generic ----------

    /// Send an arbitrary authenticated request. Non-success statuses come
    /// back as errors; a 401 is always [`ApiError::Unauthorized`].
    ///
    /// The session token always wins: a caller header with the auth
    /// header's name is dropped.
    pub async fn send_authorized(&self, request: &ApiRequest, token: &str) -> Result<Response> {
        let url = self.url(&request.path);
        let (auth_header, _) = self.auth_scheme.header("");
        let mut builder = self.http.request(request.method.to_reqwest(), &url);
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case(auth_header) {
                debug!(header = %name, "ignoring caller-supplied auth header");
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder, token)?;
        debug!(method = ?request.method, %url, "sending authorized request");
        let response = builder.send().await?;
        Self::check_response(response, "Request failed").await
    }
}
