//! Structured diagnostic records for failed requests.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorContext, RequestError};

/// One failed request, as recorded for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'static str>,
    /// Underlying error detail, which may differ from the user-facing message.
    pub detail: String,
}

impl ErrorReport {
    #[must_use]
    pub fn new(error: &RequestError, method: &str, url: &str, context: Option<ErrorContext>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: error.message.clone(),
            kind: error.source.kind(),
            status: error.status(),
            method: method.to_owned(),
            url: url.to_owned(),
            context: context.map(ErrorContext::as_str),
            detail: error.source.to_string(),
        }
    }

    /// Log this report at warn level with every field attached.
    pub fn emit(&self) {
        tracing::warn!(
            kind = self.kind,
            status = ?self.status,
            method = %self.method,
            url = %self.url,
            context = ?self.context,
            detail = %self.detail,
            "request failed: {}",
            self.message
        );
    }

    /// Log at debug level, for failures the caller turns into a normal result.
    pub fn emit_expected(&self) {
        tracing::debug!(
            kind = self.kind,
            status = ?self.status,
            method = %self.method,
            url = %self.url,
            context = ?self.context,
            "request failed as expected: {}",
            self.message
        );
    }
}
