//! Login, registration and logout against the auth endpoints.
//!
//! Credentials are validated locally first; an invalid form never reaches
//! the network. A successful login stores the returned token in the
//! client's [`Session`](crate::store::session::Session).

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use serde_json::Value;

use crate::error::{ApiError, ErrorContext, RequestError};
use crate::net::http::ApiClient;
use crate::net::types::{Credentials, Registration, token_from};

pub const MSG_MISSING_TOKEN: &str = "Resposta do servidor sem token de acesso.";

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in and adopt the returned token.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad form, a classified request error
    /// for a failed call, or an unexpected error when no token comes back.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, RequestError> {
        let ctx = Some(ErrorContext::Login);
        credentials.validate().map_err(|e| RequestError::new(e, ctx))?;

        let path = self.client.config().auth_routes.login_path();
        let body = self.client.post(path, credentials.to_body(), ctx).await?;
        let token = self.adopt_token(&body, ctx)?;
        tracing::info!(email = %credentials.email.trim(), "logged in");
        Ok(token)
    }

    /// Create an account, then log in with the same credentials unless the
    /// registration response already carries a token.
    ///
    /// # Errors
    ///
    /// See [`AuthApi::login`].
    pub async fn register(&self, registration: &Registration) -> Result<String, RequestError> {
        let ctx = Some(ErrorContext::Register);
        registration.validate().map_err(|e| RequestError::new(e, ctx))?;

        let path = self.client.config().auth_routes.register_path();
        let body = self.client.post(path, registration.to_body(), ctx).await?;
        tracing::info!(email = %registration.email.trim(), "account registered");

        if token_from(&body).is_some() {
            return self.adopt_token(&body, ctx);
        }
        self.login(&registration.credentials()).await
    }

    pub fn logout(&self) {
        self.client.session().logout();
    }

    fn adopt_token(&self, body: &Value, ctx: Option<ErrorContext>) -> Result<String, RequestError> {
        let token =
            token_from(body).ok_or_else(|| RequestError::new(ApiError::Unexpected(MSG_MISSING_TOKEN.into()), ctx))?;
        self.client.session().login(token);
        Ok(token.to_owned())
    }
}
