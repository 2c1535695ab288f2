//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crew_core::{
  person::{NewPerson, Person, PersonPatch},
  store::PersonStore,
};

use crate::{
  encode::{encode_uuid, PersonRow, RawPerson},
  schema::{PERSON_COLUMNS, SCHEMA},
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A crew directory store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every
/// statement runs on the connection's own thread, one at a time.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────

fn insert_row(conn: &rusqlite::Connection, row: &PersonRow) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO people (
       person_id, name, department, specialty, role_level, location,
       short_bio, how_i_got_into, hobbies, funny_fact, start_date,
       image_url, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    rusqlite::params![
      row.person_id,
      row.name,
      row.department,
      row.specialty,
      row.role_level,
      row.location,
      row.short_bio,
      row.how_i_got_into,
      row.hobbies,
      row.funny_fact,
      row.start_date,
      row.image_url,
      row.created_at,
      row.updated_at,
    ],
  )?;
  Ok(())
}

/// Read, merge and write back one record inside a single transaction, so a
/// concurrent update to the same id cannot interleave with the merge.
fn update_in_tx(
  conn:  &mut rusqlite::Connection,
  id:    Uuid,
  patch: PersonPatch,
  now:   DateTime<Utc>,
) -> Result<Option<Person>> {
  let tx = conn.transaction()?;

  let raw = tx
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawPerson::from_row,
    )
    .optional()?;
  let Some(raw) = raw else {
    return Ok(None);
  };

  let mut person = raw.into_person()?;
  patch.apply(&mut person.profile);
  person.updated_at = now;

  let row = PersonRow::encode(&person)?;
  tx.execute(
    "UPDATE people SET
       name = ?2, department = ?3, specialty = ?4, role_level = ?5,
       location = ?6, short_bio = ?7, how_i_got_into = ?8, hobbies = ?9,
       funny_fact = ?10, start_date = ?11, image_url = ?12, updated_at = ?13
     WHERE person_id = ?1",
    rusqlite::params![
      row.person_id,
      row.name,
      row.department,
      row.specialty,
      row.role_level,
      row.location,
      row.short_bio,
      row.how_i_got_into,
      row.hobbies,
      row.funny_fact,
      row.start_date,
      row.image_url,
      row.updated_at,
    ],
  )?;
  tx.commit()?;

  Ok(Some(person))
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = crate::Error;

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM people ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
            rusqlite::params![id_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn create_person(&self, draft: NewPerson) -> Result<Person> {
    let profile = draft.validate()?;
    let now = Utc::now();
    let person = Person {
      id: Uuid::new_v4(),
      profile,
      created_at: now,
      updated_at: now,
    };

    let row = PersonRow::encode(&person)?;
    self
      .conn
      .call(move |conn| {
        insert_row(conn, &row)?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn update_person(&self, id: Uuid, patch: PersonPatch) -> Result<Option<Person>> {
    patch.validate()?;
    let now = Utc::now();

    self
      .conn
      .call(move |conn| Ok(update_in_tx(conn, id, patch, now)))
      .await?
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM people WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn clear(&self) -> Result<usize> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM people", [])?))
      .await?;
    tracing::debug!(removed, "cleared people table");
    Ok(removed)
  }
}
