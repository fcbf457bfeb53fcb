//! Error taxonomy and user-facing message classification.
//!
//! DESIGN
//! ======
//! Every failure in the request pipeline is an [`ApiError`]. The HTTP
//! wrapper never hands a raw `ApiError` to callers: it runs [`classify`]
//! first and returns a [`RequestError`] carrying the final message while
//! keeping the source error attached for programmatic branching.
//!
//! PRECEDENCE
//! ==========
//! `classify` is first-match-wins over: transport failure, offline state,
//! timeout, errors that already carry a human message, context-specific
//! status overrides, generic status messages, and finally the error's own
//! message or a fallback. Context overrides require an exact
//! (context, status) match and never shadow the first three conditions.

use serde_json::Value;

pub const MSG_UNREACHABLE: &str = "Não foi possível conectar ao servidor. Verifique sua conexão.";
pub const MSG_OFFLINE: &str = "Sem conexão com a internet. Verifique sua rede.";
pub const MSG_TIMEOUT: &str = "Requisição demorou muito. Tente novamente.";
pub const MSG_SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";
pub const MSG_UNEXPECTED: &str = "Ocorreu um erro inesperado. Tente novamente.";

// =============================================================================
// CONTEXT
// =============================================================================

/// Logical operation that produced an error, used to pick specialized messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    Login,
    Register,
    Workout,
}

impl ErrorContext {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Workout => "workout",
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// Why the network could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The transport itself failed (DNS, refused connection, TLS).
    Unreachable(String),
    /// The connectivity probe reported no network before sending.
    Offline,
}

/// Every failure the request pipeline can produce, one variant per kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Client-side input rejected before any network call.
    #[error("{message}")]
    Validation { message: String, fields: Vec<String> },

    /// The server rejected the session (HTTP 401).
    #[error("{message}")]
    Authentication { message: String },

    #[error("network failure: {0:?}")]
    Network(NetworkFailure),

    /// The request exceeded its time bound and was cancelled.
    #[error("request timed out")]
    Timeout,

    /// Well-formed response with a non-2xx status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    HttpStatus { status: u16, message: Option<String>, payload: Value },

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// Session-expired error raised for every 401 response.
    #[must_use]
    pub fn session_expired() -> Self {
        Self::Authentication { message: MSG_SESSION_EXPIRED.to_owned() }
    }

    /// Status code attached to this error, when one applies.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(400),
            Self::Authentication { .. } => Some(401),
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Network(_) | Self::Timeout | Self::Unexpected(_) => None,
        }
    }

    /// Short machine-readable kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Authentication { .. } => "authentication",
            Self::Network(NetworkFailure::Unreachable(_)) => "network_unreachable",
            Self::Network(NetworkFailure::Offline) => "network_offline",
            Self::Timeout => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Map an error and optional operation context to one user-facing message.
#[must_use]
pub fn classify(error: &ApiError, context: Option<ErrorContext>) -> String {
    match error {
        ApiError::Network(NetworkFailure::Unreachable(_)) => MSG_UNREACHABLE.to_owned(),
        ApiError::Network(NetworkFailure::Offline) => MSG_OFFLINE.to_owned(),
        ApiError::Timeout => MSG_TIMEOUT.to_owned(),
        ApiError::Validation { message, .. } | ApiError::Authentication { message } => message.clone(),
        ApiError::HttpStatus { status, message, .. } => context
            .and_then(|ctx| context_status_message(ctx, *status))
            .or_else(|| status_message(*status))
            .map(str::to_owned)
            .or_else(|| message.clone().filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| MSG_UNEXPECTED.to_owned()),
        ApiError::Unexpected(message) if !message.trim().is_empty() => message.clone(),
        ApiError::Unexpected(_) => MSG_UNEXPECTED.to_owned(),
    }
}

/// Operation-specific message for an exact (context, status) pair.
#[must_use]
pub fn context_status_message(context: ErrorContext, status: u16) -> Option<&'static str> {
    match (context, status) {
        (ErrorContext::Login, 401) => Some("Email ou senha incorretos."),
        (ErrorContext::Login, 404) => Some("Usuário não encontrado."),
        (ErrorContext::Login, 422) => Some("Email ou senha inválidos."),
        (ErrorContext::Register, 409) => Some("Este email ou usuário já está cadastrado."),
        (ErrorContext::Register, 422) => Some("Senha deve ter no mínimo 8 caracteres com letras e números."),
        (ErrorContext::Workout, 404) => Some("Treino não encontrado."),
        (ErrorContext::Workout, 403) => Some("Você não tem permissão para editar este treino."),
        _ => None,
    }
}

/// Generic message for well-known HTTP status codes.
#[must_use]
pub fn status_message(status: u16) -> Option<&'static str> {
    let message = match status {
        400 => "Dados inválidos. Verifique as informações enviadas.",
        401 => MSG_SESSION_EXPIRED,
        403 => "Você não tem permissão para realizar esta ação.",
        404 => "Recurso não encontrado.",
        408 => "Tempo de requisição esgotado. Tente novamente.",
        409 => "Conflito de dados. Este recurso já existe.",
        422 => "Dados inválidos. Verifique os campos.",
        429 => "Muitas tentativas. Aguarde alguns instantes.",
        500 => "Erro no servidor. Tente novamente mais tarde.",
        502 => "Servidor temporariamente indisponível.",
        503 => "Serviço em manutenção. Tente novamente em breve.",
        _ => return None,
    };
    Some(message)
}

// =============================================================================
// CLASSIFIED ERROR
// =============================================================================

/// A failed request as surfaced to callers: the classified message plus the
/// original error for branching (e.g. sending the user to login on 401).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
    pub source: ApiError,
}

impl RequestError {
    #[must_use]
    pub fn new(source: ApiError, context: Option<ErrorContext>) -> Self {
        let message = classify(&source, context);
        Self { message, source }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.source, ApiError::Authentication { .. })
    }
}

impl From<ApiError> for RequestError {
    fn from(source: ApiError) -> Self {
        Self::new(source, None)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
