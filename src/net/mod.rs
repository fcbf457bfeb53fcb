//! Everything that talks to the remote API.

pub mod auth;
pub mod http;
pub mod types;
pub mod workouts;
