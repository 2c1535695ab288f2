//! Replace the directory's contents with a fixed list of people.

use crew_core::{person::NewPerson, store::PersonStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
  #[error("seed entry {index} is invalid: {source}")]
  Invalid {
    index:  usize,
    #[source]
    source: crew_core::Error,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Outcome of a [`seed`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub removed:  usize,
  pub inserted: usize,
}

/// Validate every draft, then clear the store and insert the drafts in order.
///
/// Nothing is removed if any draft is invalid.
pub async fn seed<S>(store: &S, drafts: Vec<NewPerson>) -> Result<SeedReport, SeedError>
where
  S: PersonStore,
{
  let profiles = drafts
    .into_iter()
    .enumerate()
    .map(|(index, draft)| {
      draft
        .validate()
        .map_err(|source| SeedError::Invalid { index, source })
    })
    .collect::<Result<Vec<_>, _>>()?;

  let removed = store
    .clear()
    .await
    .map_err(|e| SeedError::Store(Box::new(e)))?;

  let mut inserted = 0;
  for profile in profiles {
    store
      .create_person(NewPerson::from(profile))
      .await
      .map_err(|e| SeedError::Store(Box::new(e)))?;
    inserted += 1;
  }

  Ok(SeedReport { removed, inserted })
}
