//! Workout CRUD against the `workouts` collection.
//!
//! DESIGN
//! ======
//! Every call runs under the `workout` error context. Drafts are validated
//! and coerced before sending, so a rejected form issues no request.
//!
//! Listing is lenient about the server's "no workouts yet" shapes: a 404 or
//! an object body both mean an empty list. Array elements that do not parse
//! as workouts are skipped with a warning rather than failing the fetch.
//!
//! The `*_into` / `refresh` / `delete_from` variants keep a caller-owned
//! [`WorkoutList`] in line with the server. A create appends the returned
//! workout; updates and deletes refetch the whole list, so the cache only
//! ever holds what the server reported.

#[cfg(test)]
#[path = "workouts_test.rs"]
mod tests;

use reqwest::Method;
use serde_json::{Map, Value};

use crate::error::{ApiError, ErrorContext, RequestError};
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::{Workout, WorkoutDraft, WorkoutPayload};
use crate::store::workouts::WorkoutList;

const COLLECTION: &str = "workouts";
const CTX: Option<ErrorContext> = Some(ErrorContext::Workout);

#[derive(Clone)]
pub struct WorkoutsApi {
    client: ApiClient,
}

impl WorkoutsApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // =========================================================================
    // REMOTE OPERATIONS
    // =========================================================================

    /// Fetch every workout visible to the current session.
    ///
    /// # Errors
    ///
    /// Returns a classified request error for any failure other than 404.
    pub async fn list(&self) -> Result<Vec<Workout>, RequestError> {
        let req = ApiRequest::new(Method::GET, COLLECTION)
            .with_context(ErrorContext::Workout)
            .with_expected_status(404);
        match self.client.request(req).await {
            Ok(body) => Ok(workouts_from(&body)),
            Err(e) if e.status() == Some(404) => {
                tracing::debug!("workout list not found; treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Validate `draft` and create it.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending, or a classified request error.
    pub async fn create(&self, draft: &WorkoutDraft) -> Result<Workout, RequestError> {
        let payload = validated(draft)?;
        let body = self.client.post(COLLECTION, to_body(&payload)?, CTX).await?;
        let created = Workout::from_value(&body)
            .ok_or_else(|| unexpected("Resposta do servidor sem o treino criado."))?;
        tracing::info!(id = %created.id, name = %created.name, "workout created");
        Ok(created)
    }

    /// Validate `draft` and replace workout `id` with it.
    ///
    /// A response that does not echo the workout back is tolerated; the
    /// returned value is then built from the sent payload.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending, or a classified request error.
    pub async fn update(&self, id: &str, draft: &WorkoutDraft) -> Result<Workout, RequestError> {
        let payload = validated(draft)?;
        let body = self.client.put(&item_path(id), to_body(&payload)?, CTX).await?;
        let updated = Workout::from_value(&body).unwrap_or_else(|| Workout::from_payload(id, &payload));
        tracing::info!(%id, "workout updated");
        Ok(updated)
    }

    /// Set a single field of workout `id`.
    ///
    /// # Errors
    ///
    /// Returns a classified request error.
    pub async fn patch(&self, id: &str, field: &str, value: Value) -> Result<Value, RequestError> {
        let mut body = Map::new();
        body.insert(field.to_owned(), value);
        let data = self.client.patch(&item_path(id), Value::Object(body), CTX).await?;
        tracing::info!(%id, field, "workout patched");
        Ok(data)
    }

    /// # Errors
    ///
    /// Returns a classified request error.
    pub async fn delete(&self, id: &str) -> Result<(), RequestError> {
        self.client.delete(&item_path(id), CTX).await?;
        tracing::info!(%id, "workout deleted");
        Ok(())
    }

    // =========================================================================
    // LIST-APPLYING VARIANTS
    // =========================================================================

    /// Refetch and replace the contents of `list`. On failure `list` is untouched.
    ///
    /// # Errors
    ///
    /// See [`WorkoutsApi::list`].
    pub async fn refresh(&self, list: &mut WorkoutList) -> Result<(), RequestError> {
        list.replace_all(self.list().await?);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`WorkoutsApi::create`].
    pub async fn create_into(&self, list: &mut WorkoutList, draft: &WorkoutDraft) -> Result<Workout, RequestError> {
        let created = self.create(draft).await?;
        list.push(created.clone());
        Ok(created)
    }

    /// Update, then refetch `list`. If the refetch fails the update still
    /// stands and `list` keeps its previous contents.
    ///
    /// # Errors
    ///
    /// See [`WorkoutsApi::update`] and [`WorkoutsApi::list`].
    pub async fn update_into(
        &self,
        list: &mut WorkoutList,
        id: &str,
        draft: &WorkoutDraft,
    ) -> Result<Workout, RequestError> {
        let updated = self.update(id, draft).await?;
        self.refresh(list).await?;
        Ok(updated)
    }

    /// Delete, then refetch `list`.
    ///
    /// # Errors
    ///
    /// See [`WorkoutsApi::delete`] and [`WorkoutsApi::list`].
    pub async fn delete_from(&self, list: &mut WorkoutList, id: &str) -> Result<(), RequestError> {
        self.delete(id).await?;
        self.refresh(list).await
    }
}

fn item_path(id: &str) -> String {
    format!("{COLLECTION}/{id}")
}

fn validated(draft: &WorkoutDraft) -> Result<WorkoutPayload, RequestError> {
    draft.validate().map_err(|e| RequestError::new(e, CTX))
}

fn to_body(payload: &WorkoutPayload) -> Result<Value, RequestError> {
    serde_json::to_value(payload).map_err(|e| unexpected(&e.to_string()))
}

fn unexpected(detail: &str) -> RequestError {
    RequestError::new(ApiError::Unexpected(detail.to_owned()), CTX)
}

/// Workouts from a list response. Non-array bodies mean "none yet".
fn workouts_from(body: &Value) -> Vec<Workout> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let parsed = Workout::from_value(item);
            if parsed.is_none() {
                tracing::warn!(item = %item, "skipping malformed workout in list response");
            }
            parsed
        })
        .collect()
}
