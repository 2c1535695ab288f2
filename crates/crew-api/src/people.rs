//! Handlers for `/people` endpoints.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/people`      | Every person, insertion order |
//! | `POST`   | `/people`      | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`    | `/people/:id`  | 404 if not found |
//! | `PUT`    | `/people/:id`  | Body: [`PersonPatch`]; partial merge, 404 if not found |
//! | `DELETE` | `/people/:id`  | 204 with empty body, 404 if not found |
//!
//! An `:id` that is not a UUID cannot name a stored person and is answered
//! with 404, like any other unknown id.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use crew_core::{
  person::{NewPerson, Person, PersonPatch},
  store::PersonStore,
};
use uuid::Uuid;

use crate::error::ApiError;

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::person_not_found())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
{
  let people = store
    .list_people()
    .await
    .map_err(ApiError::store("Error fetching people"))?;
  Ok(Json(people))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let id = parse_id(&id)?;
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::store("Error fetching person"))?
    .ok_or_else(ApiError::person_not_found)?;
  Ok(Json(person))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`: returns 201 + the stored [`Person`].
///
/// The draft is validated here so a missing name is a 400 rather than a
/// store failure.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  let Json(draft) = body?;
  let profile = draft.validate()?;

  let person = store
    .create_person(NewPerson::from(profile))
    .await
    .map_err(ApiError::store("Error creating person"))?;
  tracing::info!(id = %person.id, "person created");
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /people/:id`: body is a [`PersonPatch`]; omitted fields are kept.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  body: Result<Json<PersonPatch>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let id = parse_id(&id)?;
  let Json(patch) = body?;
  patch.validate()?;

  let person = store
    .update_person(id, patch)
    .await
    .map_err(ApiError::store("Error updating person"))?
    .ok_or_else(ApiError::person_not_found)?;
  tracing::info!(%id, "person updated");
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/:id`: 204 with no body.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
{
  let id = parse_id(&id)?;
  let deleted = store
    .delete_person(id)
    .await
    .map_err(ApiError::store("Error deleting person"))?;
  if !deleted {
    return Err(ApiError::person_not_found());
  }
  tracing::info!(%id, "person deleted");
  Ok(StatusCode::NO_CONTENT)
}
