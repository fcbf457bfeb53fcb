//! HTTP request wrapper for the workouts REST API.
//!
//! DESIGN
//! ======
//! `ApiClient` is a thin, cloneable wrapper around one `reqwest::Client`.
//! Each call:
//! - fails fast with an offline error when the connectivity probe says so
//! - sends `Content-Type: application/json` plus the session's bearer token
//! - is bounded by the configured timeout (30s by default); expiry drops the
//!   in-flight future and resolves as a timeout
//! - returns parsed JSON on 2xx, `{}` when the body is not JSON
//!
//! ERROR HANDLING
//! ==============
//! Callers only ever see [`RequestError`], whose message has been through
//! [`classify`](crate::error::classify). Any 401 clears the session before
//! the error is built, whichever request triggered it. Every failure is
//! recorded once as an [`ErrorReport`]: at warn level, or at debug level
//! when the request lists the status as expected.

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::diagnostics::ErrorReport;
use crate::error::{ApiError, ErrorContext, NetworkFailure, RequestError};
use crate::store::session::Session;

// =============================================================================
// CONNECTIVITY
// =============================================================================

/// Reports whether the host currently has a network connection.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Probe for hosts where connectivity cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Shared online/offline switch, flipped by whatever watches the network.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag(Arc<AtomicBool>);

impl ConnectivityFlag {
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self(Arc::new(AtomicBool::new(online)))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// One call against the API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub context: Option<ErrorContext>,
    /// Failure statuses the caller handles itself; reported at debug level.
    pub expected_statuses: Vec<u16>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_owned(),
            body: None,
            headers: HeaderMap::new(),
            context: None,
            expected_statuses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_expected_status(mut self, status: u16) -> Self {
        self.expected_statuses.push(status);
        self
    }

    /// Whether a failure with `status` is one the caller has said it handles.
    #[must_use]
    pub fn expects(&self, status: Option<u16>) -> bool {
        status.is_some_and(|s| self.expected_statuses.contains(&s))
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Session,
    connectivity: Arc<dyn Connectivity>,
}

impl ApiClient {
    /// Build a client over `session` using `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Unexpected(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, config, session, connectivity: Arc::new(AlwaysOnline) })
    }

    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue `req` and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns a classified [`RequestError`] for offline state, transport
    /// failure, timeout, or a non-2xx response.
    pub async fn request(&self, req: ApiRequest) -> Result<Value, RequestError> {
        let url = self.config.endpoint(&req.path);
        match self.execute(&req, &url).await {
            Ok(data) => Ok(data),
            Err(source) => {
                let err = RequestError::new(source, req.context);
                let report = ErrorReport::new(&err, req.method.as_str(), &url, req.context);
                if req.expects(err.status()) {
                    report.emit_expected();
                } else {
                    report.emit();
                }
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str, context: Option<ErrorContext>) -> Result<Value, RequestError> {
        self.request(with_optional_context(ApiRequest::new(Method::GET, path), context)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post(&self, path: &str, body: Value, context: Option<ErrorContext>) -> Result<Value, RequestError> {
        self.request(with_optional_context(ApiRequest::new(Method::POST, path).with_body(body), context)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put(&self, path: &str, body: Value, context: Option<ErrorContext>) -> Result<Value, RequestError> {
        self.request(with_optional_context(ApiRequest::new(Method::PUT, path).with_body(body), context)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch(&self, path: &str, body: Value, context: Option<ErrorContext>) -> Result<Value, RequestError> {
        self.request(with_optional_context(ApiRequest::new(Method::PATCH, path).with_body(body), context)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str, context: Option<ErrorContext>) -> Result<Value, RequestError> {
        self.request(with_optional_context(ApiRequest::new(Method::DELETE, path), context)).await
    }

    async fn execute(&self, req: &ApiRequest, url: &str) -> Result<Value, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::Network(NetworkFailure::Offline));
        }

        let mut builder = self
            .http
            .request(req.method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .headers(req.headers.clone());
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let call = async {
            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(transport_error)?;
            Ok::<_, ApiError>((status, bytes))
        };
        let (status, bytes) = tokio::time::timeout(self.config.request_timeout, call)
            .await
            .map_err(|_| ApiError::Timeout)??;

        tracing::debug!(method = %req.method, %url, status = status.as_u16(), "api response");

        let data = parse_body(&bytes);
        if status.is_success() {
            return Ok(data);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.session.logout();
            return Err(ApiError::session_expired());
        }
        Err(http_status_error(status.as_u16(), data))
    }
}

fn with_optional_context(req: ApiRequest, context: Option<ErrorContext>) -> ApiRequest {
    match context {
        Some(ctx) => req.with_context(ctx),
        None => req,
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(NetworkFailure::Unreachable(error.to_string()))
}

/// JSON body, or an empty object when the body is empty or not JSON.
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn http_status_error(status: u16, payload: Value) -> ApiError {
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned);
    ApiError::HttpStatus { status, message, payload }
}
