//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Hobbies are stored as a
//! compact JSON array. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use crew_core::person::{Person, Profile};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Hobbies ─────────────────────────────────────────────────────────────────

pub fn encode_hobbies(hobbies: &[String]) -> Result<String> {
  Ok(serde_json::to_string(hobbies)?)
}

pub fn decode_hobbies(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `people` row, in
/// [`crate::schema::PERSON_COLUMNS`] order.
pub struct RawPerson {
  pub person_id:      String,
  pub name:           String,
  pub department:     Option<String>,
  pub specialty:      Option<String>,
  pub role_level:     Option<String>,
  pub location:       Option<String>,
  pub short_bio:      Option<String>,
  pub how_i_got_into: Option<String>,
  pub hobbies:        String,
  pub funny_fact:     Option<String>,
  pub start_date:     Option<String>,
  pub image_url:      Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:      row.get(0)?,
      name:           row.get(1)?,
      department:     row.get(2)?,
      specialty:      row.get(3)?,
      role_level:     row.get(4)?,
      location:       row.get(5)?,
      short_bio:      row.get(6)?,
      how_i_got_into: row.get(7)?,
      hobbies:        row.get(8)?,
      funny_fact:     row.get(9)?,
      start_date:     row.get(10)?,
      image_url:      row.get(11)?,
      created_at:     row.get(12)?,
      updated_at:     row.get(13)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         decode_uuid(&self.person_id)?,
      profile:    Profile {
        name:           self.name,
        department:     self.department,
        specialty:      self.specialty,
        role_level:     self.role_level,
        location:       self.location,
        short_bio:      self.short_bio,
        how_i_got_into: self.how_i_got_into,
        hobbies:        decode_hobbies(&self.hobbies)?,
        funny_fact:     self.funny_fact,
        start_date:     self.start_date,
        image_url:      self.image_url,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Owned column values for an `INSERT` or full-row `UPDATE`, built on the
/// async side and moved onto the connection thread.
pub struct PersonRow {
  pub person_id:      String,
  pub name:           String,
  pub department:     Option<String>,
  pub specialty:      Option<String>,
  pub role_level:     Option<String>,
  pub location:       Option<String>,
  pub short_bio:      Option<String>,
  pub how_i_got_into: Option<String>,
  pub hobbies:        String,
  pub funny_fact:     Option<String>,
  pub start_date:     Option<String>,
  pub image_url:      Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl PersonRow {
  pub fn encode(person: &Person) -> Result<Self> {
    let p = &person.profile;
    Ok(Self {
      person_id:      encode_uuid(person.id),
      name:           p.name.clone(),
      department:     p.department.clone(),
      specialty:      p.specialty.clone(),
      role_level:     p.role_level.clone(),
      location:       p.location.clone(),
      short_bio:      p.short_bio.clone(),
      how_i_got_into: p.how_i_got_into.clone(),
      hobbies:        encode_hobbies(&p.hobbies)?,
      funny_fact:     p.funny_fact.clone(),
      start_date:     p.start_date.clone(),
      image_url:      p.image_url.clone(),
      created_at:     encode_dt(person.created_at),
      updated_at:     encode_dt(person.updated_at),
    })
  }
}
