//! Wire types shared by the auth and workout endpoints.
//!
//! DESIGN
//! ======
//! The API has shipped two naming schemes for the same workout fields:
//! `id`/`name` and the legacy `_id`/`title`. `Workout` always exposes the
//! canonical names; deserialization accepts either scheme and normalizes.
//! Outgoing payloads always use the canonical names.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ApiError;
use crate::validation::{FormValidation, as_number, login_rules, register_rules, validate_form, workout_rules};

// =============================================================================
// WORKOUT
// =============================================================================

/// A workout as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkout")]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Minutes.
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Deserialize)]
struct RawWorkout {
    id: Option<Value>,
    #[serde(rename = "_id")]
    legacy_id: Option<Value>,
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    duration: Option<Value>,
    date: Option<String>,
}

impl TryFrom<RawWorkout> for Workout {
    type Error = String;

    fn try_from(raw: RawWorkout) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.legacy_id)
            .and_then(|v| id_string(&v))
            .ok_or_else(|| "workout is missing an id".to_owned())?;
        let name = raw.name.or(raw.title).unwrap_or_default();
        let duration = match raw.duration {
            Some(v) => minutes(&v).ok_or_else(|| format!("invalid workout duration: {v}"))?,
            None => 0,
        };
        Ok(Self {
            id,
            name,
            description: raw.description.unwrap_or_default(),
            duration,
            date: raw.date.filter(|d| !d.trim().is_empty()),
        })
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whole, non-negative minutes from a number or numeric string.
fn minutes(value: &Value) -> Option<u32> {
    let n = as_number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(n as u32)
}

impl Workout {
    /// Best-effort parse of an API value into a workout.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Build the local view of a workout after an update the server did not echo back.
    #[must_use]
    pub fn from_payload(id: &str, payload: &WorkoutPayload) -> Self {
        Self {
            id: id.to_owned(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            duration: payload.duration,
            date: payload.date.clone(),
        }
    }
}

// =============================================================================
// WORKOUT FORM
// =============================================================================

/// Workout form input exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutDraft {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub date: Option<String>,
}

/// Validated body for create/update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutPayload {
    pub name: String,
    pub description: String,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl WorkoutDraft {
    /// Prefill a draft from an existing workout, as an edit form would.
    #[must_use]
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            name: workout.name.clone(),
            description: workout.description.clone(),
            duration: workout.duration.to_string(),
            date: workout.date.clone(),
        }
    }

    #[must_use]
    pub fn to_form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        form.insert("name".into(), Value::String(self.name.clone()));
        form.insert("description".into(), Value::String(self.description.clone()));
        form.insert("duration".into(), Value::String(self.duration.clone()));
        form.insert("date".into(), self.date.clone().map_or(Value::Null, Value::String));
        form
    }

    #[must_use]
    pub fn check(&self) -> FormValidation {
        validate_form(&self.to_form(), &workout_rules())
    }

    /// Validate and coerce into a request payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the first failing field.
    pub fn validate(&self) -> Result<WorkoutPayload, ApiError> {
        self.check().into_result()?;
        let duration = minutes(&Value::String(self.duration.clone()))
            .ok_or_else(|| ApiError::Validation {
                message: crate::validation::MSG_DURATION_NOT_INTEGER.to_owned(),
                fields: vec!["duration".to_owned()],
            })?;
        Ok(WorkoutPayload {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            duration,
            date: self.date.as_ref().map(|d| d.trim().to_owned()).filter(|d| !d.is_empty()),
        })
    }
}

// =============================================================================
// AUTH FORMS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self { email: email.to_owned(), password: password.to_owned() }
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the first failing field.
    pub fn validate(&self) -> Result<(), ApiError> {
        let form = text_form(&[("email", self.email.as_str()), ("password", self.password.as_str())]);
        validate_form(&form, &login_rules()).into_result()
    }

    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({ "email": self.email.trim(), "password": self.password })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the first failing field.
    pub fn validate(&self) -> Result<(), ApiError> {
        let form = text_form(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ]);
        validate_form(&form, &register_rules()).into_result()
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), &self.password)
    }

    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({ "name": self.name.trim(), "email": self.email.trim(), "password": self.password })
    }
}

fn text_form(fields: &[(&str, &str)]) -> Map<String, Value> {
    fields.iter().map(|(k, v)| ((*k).to_owned(), Value::String((*v).to_owned()))).collect()
}

/// Token from a login/register response, if present.
#[must_use]
pub fn token_from(body: &Value) -> Option<&str> {
    body.get("token").and_then(Value::as_str).filter(|t| !t.is_empty())
}
