//! Error types for `crew-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The record failed schema validation (e.g. a blank `name`).
  #[error("validation failed: {0}")]
  Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
