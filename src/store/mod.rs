//! Client-side state: the persisted session and the cached workout list.

pub mod session;
pub mod workouts;
