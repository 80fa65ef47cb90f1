//! # API Client
//!
//! HTTP client for the backoffice REST API.

use std::time::Duration;

use beatdesk_types::ProblemDetails;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

const JSON: &str = "application/json";

/// Per-request options: query parameters, extra headers and a JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds query parameters from a serializable struct.
    ///
    /// Fields that serialize to `null` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialization`] if `params` does not serialize.
    pub fn with_query(mut self, params: &impl Serialize) -> ApiResult<Self> {
        match serde_json::to_value(params)? {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::Null => {}
                        Value::String(s) => self.query.push((key, s)),
                        other => self.query.push((key, other.to_string())),
                    }
                }
            }
            Value::Null => {}
            other => {
                return Err(ApiError::Serialization(serde::ser::Error::custom(format!(
                    "query parameters must be an object, got {}",
                    other
                ))))
            }
        }
        Ok(self)
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialization`] if `body` does not serialize.
    pub fn with_json(mut self, body: &impl Serialize) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Adds a header. Caller headers override the defaults.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// HTTP client for the backoffice API.
///
/// Cheap to clone; clones share the connection pool and the session.
///
/// # Examples
///
/// ```rust,ignore
/// use beatdesk_client::{ApiClient, Session};
/// use beatdesk_types::CatalogFilters;
///
/// let client = ApiClient::new("http://localhost:8080/api")?.with_session(Session::in_memory());
/// let page = client.list_catalog(&CatalogFilters::search("Weeknd")).await?;
/// println!("{} matches", page.total_elements);
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Session,
}

impl ApiClient {
    /// Creates a client with default settings and an in-memory session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let config = ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        };
        Self::from_config(&config, Session::in_memory())
    }

    /// Creates a client from configuration, sharing `session`.
    ///
    /// # Errors
    ///
    /// * [`ApiError::InvalidUrl`] - `base_url` is not an absolute URL
    /// * [`ApiError::Network`] - the HTTP client could not be built
    pub fn from_config(config: &ClientConfig, session: Session) -> ApiResult<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    /// Replaces the session context.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session context.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn headers(&self, options: &RequestOptions) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }
        if !headers.contains_key(AUTHORIZATION) {
            if let Some(token) = self.session.token() {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::InvalidHeader(format!("authorization: {}", e)))?;
                headers.insert(AUTHORIZATION, value);
            }
        }
        Ok(headers)
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` targets
    /// accept `204 No Content`.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - the request never produced a response
    /// * [`ApiError::Request`] - the backend answered with a non-2xx status
    /// * [`ApiError::InvalidResponse`] - the body did not decode into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let url = self.url(endpoint);
        let headers = self.headers(&options)?;
        tracing::debug!(%method, %url, "Sending request");

        let mut builder = self.http.request(method.clone(), &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let res = builder.send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            let problem = serde_json::from_str::<ProblemDetails>(&text)
                .ok()
                .filter(|p| !p.is_empty());
            if status.as_u16() == 401 {
                tracing::warn!(%url, "Backend rejected the session token");
                self.session.expire();
            } else {
                tracing::debug!(%method, %url, status = status.as_u16(), "Request failed");
            }
            return Err(ApiError::Request {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                problem,
            });
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Checks if the backend is reachable and healthy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the request fails.
    pub async fn health(&self) -> ApiResult<bool> {
        let res = self.http.get(self.url("/health")).send().await?;
        Ok(res.status().is_success())
    }
}
