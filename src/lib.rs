//! Client pipeline for the workouts REST API.
//!
//! DESIGN
//! ======
//! Requests flow through one wrapper, [`net::http::ApiClient`], which owns
//! auth headers, timeouts, offline detection and session expiry. Failures
//! come back as [`error::RequestError`]: one classified, user-facing
//! message plus the original [`error::ApiError`] for branching.
//!
//! Forms are checked with the declarative rules in [`validation`] before
//! anything is sent. [`retry::retry_with_backoff`] is opt-in per call.
//!
//! MODULES
//! =======
//! - `config`: env-driven client configuration
//! - `error`: error taxonomy and message classification
//! - `validation`: field rules and the built-in login/register/workout forms
//! - `retry`: exponential backoff for transient failures
//! - `diagnostics`: structured records of failed requests
//! - `net`: HTTP wrapper, wire types, auth and workout endpoints
//! - `store`: persisted session and the cached workout list

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod net;
pub mod retry;
pub mod store;
pub mod validation;

#[cfg(test)]
mod test_helpers;

pub use config::ClientConfig;
pub use error::{ApiError, ErrorContext, RequestError, classify};
pub use net::auth::AuthApi;
pub use net::http::{ApiClient, ApiRequest};
pub use net::types::{Credentials, Registration, Workout, WorkoutDraft, WorkoutPayload};
pub use net::workouts::WorkoutsApi;
pub use retry::{RetryPolicy, retry_with_backoff};
pub use store::session::Session;
pub use store::workouts::WorkoutList;
