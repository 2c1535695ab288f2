//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `crew-store-sqlite`).
//! Higher layers (`crew-api`, `crew-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::person::{NewPerson, Person, PersonPatch};

/// Abstraction over a directory store backend.
///
/// An unknown id is not an error: `get_person` and `update_person` return
/// `None` and `delete_person` returns `false`, leaving the collection
/// unchanged. Callers map that outcome to "not found".
///
/// Each method is atomic for the single record it touches; nothing spans
/// more than one record.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every record, in insertion order.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Validate and persist a new person. The store assigns `id`,
  /// `created_at` and `updated_at`; fails if `name` is absent or blank.
  fn create_person(
    &self,
    draft: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Merge `patch` onto an existing person and bump `updated_at`.
  /// Returns `None` if `id` does not exist.
  fn update_person(
    &self,
    id: Uuid,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Hard-delete a person. Returns `false` if `id` does not exist.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every record; returns how many were removed.
  fn clear(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
