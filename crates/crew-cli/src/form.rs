//! Add/edit form state.
//!
//! Text fields are held as plain strings while editing; an empty string
//! means "not set". Department and role level are choice fields cycled with
//! ←/→ instead of typed.
//!
//! The image field takes either a URL or a path to a local image file; a
//! path is read on save and sent inline as a `data:` URL.

use std::{
  io,
  path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use crew_core::{
  group::{KNOWN_DEPARTMENTS, UPPER_MANAGEMENT},
  person::{NewPerson, PersonPatch, Profile},
};

/// Role levels offered by the form; the empty entry means "not set".
pub const ROLE_LEVELS: [&str; 4] = ["", "Team Lead", "Specialist", "Intern"];

// ─── Field ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  Department,
  Specialty,
  RoleLevel,
  ShortBio,
  HowIGotInto,
  Hobbies,
  FunnyFact,
  StartDate,
  Location,
  ImageUrl,
}

impl Field {
  /// Form order, top to bottom.
  pub const ALL: [Field; 11] = [
    Field::Name,
    Field::Department,
    Field::Specialty,
    Field::RoleLevel,
    Field::ShortBio,
    Field::HowIGotInto,
    Field::Hobbies,
    Field::FunnyFact,
    Field::StartDate,
    Field::Location,
    Field::ImageUrl,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Field::Name => "Name",
      Field::Department => "Department",
      Field::Specialty => "Specialty",
      Field::RoleLevel => "Role level",
      Field::ShortBio => "Short bio",
      Field::HowIGotInto => "How I got into it",
      Field::Hobbies => "Hobbies",
      Field::FunnyFact => "Funny fact",
      Field::StartDate => "Start date",
      Field::Location => "Location",
      Field::ImageUrl => "Image URL",
    }
  }
}

// ─── PersonForm ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonForm {
  pub name:           String,
  pub department:     String,
  pub specialty:      String,
  pub role_level:     String,
  pub short_bio:      String,
  pub how_i_got_into: String,
  pub hobbies:        Vec<String>,
  /// Text typed into the hobby field but not yet added.
  pub hobby_input:    String,
  pub funny_fact:     String,
  pub start_date:     String,
  pub location:       String,
  pub image_url:      String,
  focus:              usize,
}

impl PersonForm {
  /// An empty form for adding a person.
  pub fn blank() -> Self {
    Self {
      name:           String::new(),
      department:     UPPER_MANAGEMENT.to_owned(),
      specialty:      String::new(),
      role_level:     String::new(),
      short_bio:      String::new(),
      how_i_got_into: String::new(),
      hobbies:        Vec::new(),
      hobby_input:    String::new(),
      funny_fact:     String::new(),
      start_date:     String::new(),
      location:       String::new(),
      image_url:      String::new(),
      focus:          0,
    }
  }

  /// A form prefilled from an existing record.
  pub fn from_profile(p: &Profile) -> Self {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    Self {
      name:           p.name.clone(),
      department:     text(&p.department),
      specialty:      text(&p.specialty),
      role_level:     text(&p.role_level),
      short_bio:      text(&p.short_bio),
      how_i_got_into: text(&p.how_i_got_into),
      hobbies:        p.hobbies.clone(),
      hobby_input:    String::new(),
      funny_fact:     text(&p.funny_fact),
      start_date:     text(&p.start_date),
      location:       text(&p.location),
      image_url:      text(&p.image_url),
      focus:          0,
    }
  }

  // ── Focus ─────────────────────────────────────────────────────────────────

  pub fn focused(&self) -> Field { Field::ALL[self.focus] }

  pub fn focus_next(&mut self) { self.focus = (self.focus + 1) % Field::ALL.len(); }

  pub fn focus_prev(&mut self) {
    self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  fn text_mut(&mut self, field: Field) -> Option<&mut String> {
    match field {
      Field::Name => Some(&mut self.name),
      Field::Specialty => Some(&mut self.specialty),
      Field::ShortBio => Some(&mut self.short_bio),
      Field::HowIGotInto => Some(&mut self.how_i_got_into),
      Field::Hobbies => Some(&mut self.hobby_input),
      Field::FunnyFact => Some(&mut self.funny_fact),
      Field::StartDate => Some(&mut self.start_date),
      Field::Location => Some(&mut self.location),
      Field::ImageUrl => Some(&mut self.image_url),
      Field::Department | Field::RoleLevel => None,
    }
  }

  /// Type a character into the focused text field. Ignored on choice fields.
  pub fn input_char(&mut self, c: char) {
    if let Some(text) = self.text_mut(self.focused()) {
      text.push(c);
    }
  }

  /// Delete the last character of the focused field. On the hobby field
  /// with nothing typed, removes the last hobby instead; an embedded image
  /// is cleared whole.
  pub fn backspace(&mut self) {
    if self.focused() == Field::ImageUrl && self.image_url.starts_with("data:") {
      self.image_url.clear();
      return;
    }
    if self.focused() == Field::Hobbies && self.hobby_input.is_empty() {
      if let Some(last) = self.hobbies.last().cloned() {
        self.remove_hobby(&last);
      }
      return;
    }
    if let Some(text) = self.text_mut(self.focused()) {
      text.pop();
    }
  }

  /// Step the focused choice field through its options. A value not in the
  /// option list (e.g. a department typed by another client) steps to the
  /// first option.
  pub fn cycle(&mut self, forward: bool) {
    match self.focused() {
      Field::Department => {
        self.department = step(&KNOWN_DEPARTMENTS, &self.department, forward).to_owned();
      }
      Field::RoleLevel => {
        self.role_level = step(&ROLE_LEVELS, &self.role_level, forward).to_owned();
      }
      _ => {}
    }
  }

  /// Add the typed hobby. Blank input and hobbies already in the list are
  /// ignored; returns whether the list changed.
  pub fn add_hobby(&mut self) -> bool {
    let hobby = self.hobby_input.trim();
    if hobby.is_empty() || self.hobbies.iter().any(|h| h == hobby) {
      return false;
    }
    self.hobbies.push(hobby.to_owned());
    self.hobby_input.clear();
    true
  }

  pub fn remove_hobby(&mut self, hobby: &str) { self.hobbies.retain(|h| h != hobby); }

  /// If the image field names an existing local file, replace it with the
  /// file's contents as a `data:` URL. URLs and blank values are left as
  /// typed. Returns whether the field was replaced.
  pub fn embed_image(&mut self) -> io::Result<bool> {
    let path = PathBuf::from(self.image_url.trim());
    if path.as_os_str().is_empty() || !path.is_file() {
      return Ok(false);
    }
    let mime = image_mime(&path).ok_or_else(|| {
      io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} is not a png, jpeg, gif, webp or svg image", path.display()),
      )
    })?;
    let bytes = std::fs::read(&path)?;
    self.image_url = format!("data:{mime};base64,{}", STANDARD.encode(bytes));
    Ok(true)
  }

  // ── Output ────────────────────────────────────────────────────────────────

  /// The check the store applies, run before anything is sent.
  pub fn check(&self) -> crew_core::Result<()> {
    NewPerson::named(self.name.clone()).validate().map(|_| ())
  }

  fn profile(&self) -> Profile {
    Profile {
      name:           self.name.trim().to_owned(),
      department:     non_empty(&self.department),
      specialty:      non_empty(&self.specialty),
      role_level:     non_empty(&self.role_level),
      location:       non_empty(&self.location),
      short_bio:      non_empty(&self.short_bio),
      how_i_got_into: non_empty(&self.how_i_got_into),
      hobbies:        self.hobbies.clone(),
      funny_fact:     non_empty(&self.funny_fact),
      start_date:     non_empty(&self.start_date),
      image_url:      non_empty(&self.image_url),
    }
  }

  /// Body for `POST /api/people`.
  pub fn to_new_person(&self) -> NewPerson { NewPerson::from(self.profile()) }

  /// Body for `PUT /api/people/:id`: only the fields that differ from
  /// `original`. Fields emptied in the form are sent as `null` (cleared).
  pub fn to_patch(&self, original: &Profile) -> PersonPatch {
    let edited = self.profile();
    PersonPatch {
      name:           (edited.name != original.name).then(|| Some(edited.name)),
      department:     changed(edited.department, &original.department),
      specialty:      changed(edited.specialty, &original.specialty),
      role_level:     changed(edited.role_level, &original.role_level),
      location:       changed(edited.location, &original.location),
      short_bio:      changed(edited.short_bio, &original.short_bio),
      how_i_got_into: changed(edited.how_i_got_into, &original.how_i_got_into),
      hobbies:        (edited.hobbies != original.hobbies).then(|| Some(edited.hobbies)),
      funny_fact:     changed(edited.funny_fact, &original.funny_fact),
      start_date:     changed(edited.start_date, &original.start_date),
      image_url:      changed(edited.image_url, &original.image_url),
    }
  }
}

/// Mime type for an image file, from its extension.
fn image_mime(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  match ext.as_str() {
    "png" => Some("image/png"),
    "jpg" | "jpeg" => Some("image/jpeg"),
    "gif" => Some("image/gif"),
    "webp" => Some("image/webp"),
    "svg" => Some("image/svg+xml"),
    _ => None,
  }
}

/// Short label for an image value. Inline `data:` URLs are too long to show,
/// so they render as their mime type and decoded size.
pub fn image_label(value: &str) -> String {
  let Some(rest) = value.strip_prefix("data:") else {
    return value.to_owned();
  };
  let (meta, payload) = rest.split_once(',').unwrap_or((rest, ""));
  let mime = meta.split(';').next().filter(|m| !m.is_empty()).unwrap_or("image");
  let kib = (payload.len() * 3 / 4).div_ceil(1024);
  format!("(embedded {mime}, {kib} KiB)")
}

fn non_empty(s: &str) -> Option<String> {
  let t = s.trim();
  (!t.is_empty()).then(|| t.to_owned())
}

fn changed(edited: Option<String>, original: &Option<String>) -> Option<Option<String>> {
  (edited != *original).then_some(edited)
}

fn step<'a>(options: &[&'a str], current: &str, forward: bool) -> &'a str {
  let n = options.len();
  let next = match options.iter().position(|o| *o == current) {
    Some(i) if forward => (i + 1) % n,
    Some(i) => (i + n - 1) % n,
    None => 0,
  };
  options[next]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn focus(form: &mut PersonForm, field: Field) {
    while form.focused() != field {
      form.focus_next();
    }
  }

  #[test]
  fn blank_form_defaults_to_upper_management() {
    let form = PersonForm::blank();
    assert_eq!(form.department, UPPER_MANAGEMENT);
    assert_eq!(form.focused(), Field::Name);
  }

  #[test]
  fn hobbies_are_trimmed_and_deduplicated() {
    let mut form = PersonForm::blank();

    form.hobby_input = "  Hiking ".into();
    assert!(form.add_hobby());
    assert!(form.hobby_input.is_empty());

    form.hobby_input = "Hiking".into();
    assert!(!form.add_hobby());
    assert_eq!(form.hobby_input, "Hiking");

    form.hobby_input = "   ".into();
    assert!(!form.add_hobby());

    form.hobby_input = "Chess".into();
    form.add_hobby();
    assert_eq!(form.hobbies, vec!["Hiking", "Chess"]);

    form.remove_hobby("Hiking");
    assert_eq!(form.hobbies, vec!["Chess"]);
  }

  #[test]
  fn backspace_on_empty_hobby_input_removes_last_hobby() {
    let mut form = PersonForm::blank();
    form.hobbies = vec!["Hiking".into(), "Chess".into()];
    focus(&mut form, Field::Hobbies);

    form.backspace();
    assert_eq!(form.hobbies, vec!["Hiking"]);
  }

  #[test]
  fn typing_goes_to_focused_text_field_only() {
    let mut form = PersonForm::blank();
    form.input_char('A');
    focus(&mut form, Field::Department);
    form.input_char('x');
    assert_eq!(form.name, "A");
    assert_eq!(form.department, UPPER_MANAGEMENT);
  }

  #[test]
  fn cycling_choice_fields_wraps() {
    let mut form = PersonForm::blank();
    focus(&mut form, Field::RoleLevel);
    form.cycle(true);
    assert_eq!(form.role_level, "Team Lead");
    form.cycle(false);
    form.cycle(false);
    assert_eq!(form.role_level, "Intern");

    focus(&mut form, Field::Department);
    form.department = "Skunkworks".into();
    form.cycle(true);
    assert_eq!(form.department, KNOWN_DEPARTMENTS[0]);
  }

  #[test]
  fn focus_wraps_both_ways() {
    let mut form = PersonForm::blank();
    form.focus_prev();
    assert_eq!(form.focused(), Field::ImageUrl);
    form.focus_next();
    assert_eq!(form.focused(), Field::Name);
  }

  #[test]
  fn new_person_drops_empty_fields() {
    let mut form = PersonForm::blank();
    form.name = " Ada ".into();
    form.specialty = "  ".into();
    let draft = form.to_new_person();
    assert_eq!(draft.name.as_deref(), Some("Ada"));
    assert_eq!(draft.specialty, None);
    assert_eq!(draft.department.as_deref(), Some(UPPER_MANAGEMENT));
  }

  #[test]
  fn check_rejects_blank_name() {
    assert!(PersonForm::blank().check().is_err());
  }

  #[test]
  fn patch_contains_only_changes() {
    let original = Profile {
      department: Some("Engineering".into()),
      location: Some("Austin, TX".into()),
      hobbies: vec!["Cycling".into()],
      ..Profile::new("David Lee")
    };
    let mut form = PersonForm::from_profile(&original);
    assert!(form.to_patch(&original).is_empty());

    form.specialty = "X".into();
    form.location.clear();
    let patch = form.to_patch(&original);

    assert_eq!(patch.specialty, Some(Some("X".into())));
    assert_eq!(patch.location, Some(None));
    assert_eq!(patch.name, None);
    assert_eq!(patch.department, None);
    assert_eq!(patch.hobbies, None);
  }

  #[test]
  fn local_image_file_is_embedded_as_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ada.PNG");
    let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    std::fs::write(&path, bytes).unwrap();

    let mut form = PersonForm::blank();
    form.name = "Ada".into();
    form.image_url = format!(" {} ", path.display());
    assert!(form.embed_image().unwrap());

    let url = form.to_new_person().image_url.unwrap();
    let encoded = url.strip_prefix("data:image/png;base64,").unwrap();
    assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    assert_eq!(image_label(&url), "(embedded image/png, 1 KiB)");
  }

  #[test]
  fn image_urls_are_left_as_typed() {
    let mut form = PersonForm::blank();
    for value in ["", "https://example.com/ada.png", "data:image/png;base64,iVBO"] {
      form.image_url = value.into();
      assert!(!form.embed_image().unwrap());
      assert_eq!(form.image_url, value);
    }
    assert_eq!(image_label("https://example.com/ada.png"), "https://example.com/ada.png");

    focus(&mut form, Field::ImageUrl);
    form.backspace();
    assert!(form.image_url.is_empty());
  }

  #[test]
  fn non_image_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let mut form = PersonForm::blank();
    form.image_url = path.display().to_string();
    let err = form.embed_image().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert_eq!(form.image_url, path.display().to_string());
  }
}
