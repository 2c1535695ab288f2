//! JSON REST API for the crew team directory.
//!
//! Exposes an axum [`Router`] backed by any [`crew_core::store::PersonStore`].
//! CORS, body limits, tracing and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", crew_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod people;

use std::sync::Arc;

use axum::{Router, routing::get};
use crew_core::store::PersonStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .delete(people::delete_one::<S>),
    )
    .with_state(store)
}
