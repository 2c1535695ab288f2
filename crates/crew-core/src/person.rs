//! Person: the single record type of the directory.
//!
//! A [`Person`] is a standalone document: no other record references it and
//! it references nothing. The wire shape is camelCase JSON; optional text
//! fields are omitted when absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Profile ─────────────────────────────────────────────────────────────────

/// The user-editable part of a [`Person`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub name:           String,
  /// Free text; the client groups by it but nothing constrains its values.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub specialty:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role_level:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub short_bio:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub how_i_got_into: Option<String>,
  /// Insertion order is preserved. Duplicates are only prevented by the
  /// client's form.
  #[serde(default)]
  pub hobbies:        Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub funny_fact:     Option<String>,
  /// Expected as `YYYY-MM-DD`, but stored verbatim; see
  /// [`Profile::parsed_start_date`].
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url:      Option<String>,
}

impl Profile {
  /// A profile with only a name set.
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  /// The start date as a calendar date, or `None` if missing or not a
  /// recognisable date.
  pub fn parsed_start_date(&self) -> Option<NaiveDate> {
    self.start_date.as_deref().and_then(parse_start_date)
  }
}

/// Parse a start date. Accepts `YYYY-MM-DD` and full RFC 3339 timestamps
/// (some clients send the latter from date pickers).
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn require_name(name: &str) -> Result<String> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(Error::Validation("name is required".into()));
  }
  Ok(trimmed.to_owned())
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  /// Store-assigned; never changes and is never reused.
  pub id:         Uuid,
  #[serde(flatten)]
  pub profile:    Profile,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::PersonStore::create_person`].
///
/// Every field is optional on the wire so that a missing `name` is reported
/// by [`NewPerson::validate`] rather than as a deserialisation failure.
/// Store-assigned fields (`id`, timestamps) are ignored if present.
/// `hobbies` may be `null`, which reads as an empty list.
///
/// `name` is stored with surrounding whitespace trimmed, here and in
/// [`PersonPatch`]; `" Ada "` is stored and returned as `"Ada"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPerson {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:           Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub specialty:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role_level:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub short_bio:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub how_i_got_into: Option<String>,
  #[serde(deserialize_with = "null_as_empty")]
  pub hobbies:        Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub funny_fact:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url:      Option<String>,
}

impl NewPerson {
  /// Convenience constructor with every other field empty.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Self::default() }
  }

  /// Check the draft and turn it into a [`Profile`]. Fails with
  /// [`Error::Validation`] when `name` is absent or blank.
  pub fn validate(self) -> Result<Profile> {
    let name = require_name(self.name.as_deref().unwrap_or_default())?;
    Ok(Profile {
      name,
      department: self.department,
      specialty: self.specialty,
      role_level: self.role_level,
      location: self.location,
      short_bio: self.short_bio,
      how_i_got_into: self.how_i_got_into,
      hobbies: self.hobbies,
      funny_fact: self.funny_fact,
      start_date: self.start_date,
      image_url: self.image_url,
    })
  }
}

impl From<Profile> for NewPerson {
  fn from(p: Profile) -> Self {
    Self {
      name:           Some(p.name),
      department:     p.department,
      specialty:      p.specialty,
      role_level:     p.role_level,
      location:       p.location,
      short_bio:      p.short_bio,
      how_i_got_into: p.how_i_got_into,
      hobbies:        p.hobbies,
      funny_fact:     p.funny_fact,
      start_date:     p.start_date,
      image_url:      p.image_url,
    }
  }
}

// ─── PersonPatch ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::PersonStore::update_person`].
///
/// Merge semantics per field:
/// - omitted (`None`): left unchanged;
/// - explicit `null` (`Some(None)`): cleared (`hobbies` becomes empty);
/// - a value (`Some(Some(v))`): replaced.
///
/// `name` can be replaced but never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonPatch {
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub name:           Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub department:     Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub specialty:      Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub role_level:     Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub location:       Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub short_bio:      Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub how_i_got_into: Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub hobbies:        Option<Option<Vec<String>>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub funny_fact:     Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub start_date:     Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub image_url:      Option<Option<String>>,
}

/// A key that is present in the JSON object deserialises to `Some`, even
/// when its value is `null`. Absent keys fall back to the struct default.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// `null` and a missing key both read as an empty list.
fn null_as_empty<'de, T, D>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PersonPatch {
  /// True if applying this patch would change nothing.
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Reject patches that would leave the record without a valid name.
  pub fn validate(&self) -> Result<()> {
    match &self.name {
      None => Ok(()),
      Some(None) => Err(Error::Validation("name cannot be cleared".into())),
      Some(Some(name)) => require_name(name).map(|_| ()),
    }
  }

  /// Merge this patch onto `profile`. Call [`PersonPatch::validate`] first;
  /// an invalid name is skipped here rather than applied.
  pub fn apply(self, profile: &mut Profile) {
    if let Some(Some(name)) = self.name
      && let Ok(name) = require_name(&name)
    {
      profile.name = name;
    }
    merge(&mut profile.department, self.department);
    merge(&mut profile.specialty, self.specialty);
    merge(&mut profile.role_level, self.role_level);
    merge(&mut profile.location, self.location);
    merge(&mut profile.short_bio, self.short_bio);
    merge(&mut profile.how_i_got_into, self.how_i_got_into);
    if let Some(hobbies) = self.hobbies {
      profile.hobbies = hobbies.unwrap_or_default();
    }
    merge(&mut profile.funny_fact, self.funny_fact);
    merge(&mut profile.start_date, self.start_date);
    merge(&mut profile.image_url, self.image_url);
  }
}

fn merge(field: &mut Option<String>, update: Option<Option<String>>) {
  if let Some(value) = update {
    *field = value;
  }
}
