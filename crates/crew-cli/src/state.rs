//! Client-side directory state: the loaded people plus which surface (detail
//! view, add/edit form, delete confirmation) is open.
//!
//! Every transition is a method on [`Directory`] that either applies or
//! returns a [`TransitionError`] leaving the state untouched. Network calls
//! happen outside; a successful response is folded back in with
//! [`Directory::save_succeeded`] / [`Directory::delete_succeeded`].
//!
//! ```text
//!  Closed ──open_add──▶ Adding ──save ok / cancel──▶ Closed
//!  Closed ──open_detail──▶ Viewing ──edit──▶ Editing ──save ok / cancel──▶ Closed
//!  Viewing | Editing ──request_delete──▶ Confirming ──delete ok──▶ Closed
//!                                        Confirming ──cancel──▶ previous
//! ```

use crew_core::{
  group::{self, DepartmentGroup},
  person::{NewPerson, Person, PersonPatch},
};
use thiserror::Error;
use uuid::Uuid;

use crate::form::PersonForm;

// ─── Surface ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Surface {
  /// Only the grouped list is shown.
  #[default]
  Closed,
  /// Detail view of one person.
  Viewing(Uuid),
  /// Blank form for a new person.
  Adding(PersonForm),
  /// Form prefilled from an existing person.
  Editing { id: Uuid, form: PersonForm },
  /// Delete confirmation layered over the surface it was opened from.
  Confirming { id: Uuid, previous: Box<Surface> },
}

impl Surface {
  pub fn name(&self) -> &'static str {
    match self {
      Surface::Closed => "closed",
      Surface::Viewing(_) => "viewing",
      Surface::Adding(_) => "adding",
      Surface::Editing { .. } => "editing",
      Surface::Confirming { .. } => "confirming",
    }
  }
}

#[derive(Debug, Error)]
pub enum TransitionError {
  #[error("cannot {action} while {surface}")]
  Invalid {
    action:  &'static str,
    surface: &'static str,
  },

  #[error("no person with id {0}")]
  UnknownPerson(Uuid),

  #[error("a request is already in flight")]
  Busy,

  #[error(transparent)]
  Form(#[from] crew_core::Error),
}

/// What a save should send to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
  Create(NewPerson),
  Update(Uuid, PersonPatch),
}

// ─── Directory ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Directory {
  people:  Vec<Person>,
  surface: Surface,
  saving:  bool,
}

impl Directory {
  pub fn new(people: Vec<Person>) -> Self {
    Self { people, surface: Surface::Closed, saving: false }
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// People in the order the server returned them.
  pub fn people(&self) -> &[Person] { &self.people }

  pub fn surface(&self) -> &Surface { &self.surface }

  pub fn is_saving(&self) -> bool { self.saving }

  pub fn person(&self, id: Uuid) -> Option<&Person> {
    self.people.iter().find(|p| p.id == id)
  }

  pub fn groups(&self) -> Vec<DepartmentGroup<'_>> { group::group_by_department(&self.people) }

  /// People in on-screen order (groups flattened).
  pub fn display_order(&self) -> Vec<&Person> { group::display_order(&self.people) }

  /// The form being filled in, if a form surface is open.
  pub fn form_mut(&mut self) -> Option<&mut PersonForm> {
    match &mut self.surface {
      Surface::Adding(form) | Surface::Editing { form, .. } => Some(form),
      _ => None,
    }
  }

  /// Replace the loaded people, closing whatever surface was open.
  pub fn reload(&mut self, people: Vec<Person>) {
    self.people = people;
    self.surface = Surface::Closed;
    self.saving = false;
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  fn invalid(&self, action: &'static str) -> TransitionError {
    TransitionError::Invalid { action, surface: self.surface.name() }
  }

  fn ensure_idle(&self) -> Result<(), TransitionError> {
    if self.saving { Err(TransitionError::Busy) } else { Ok(()) }
  }

  /// Open a blank add form.
  pub fn open_add(&mut self) -> Result<(), TransitionError> {
    self.ensure_idle()?;
    match self.surface {
      Surface::Closed => {
        self.surface = Surface::Adding(PersonForm::blank());
        Ok(())
      }
      _ => Err(self.invalid("add a person")),
    }
  }

  /// Show the detail view for `id`. Allowed from the list or while another
  /// person's detail is shown.
  pub fn open_detail(&mut self, id: Uuid) -> Result<(), TransitionError> {
    self.ensure_idle()?;
    if !matches!(self.surface, Surface::Closed | Surface::Viewing(_)) {
      return Err(self.invalid("open a person"));
    }
    if self.person(id).is_none() {
      return Err(TransitionError::UnknownPerson(id));
    }
    self.surface = Surface::Viewing(id);
    Ok(())
  }

  /// Switch the detail view to an edit form prefilled from the record.
  pub fn edit(&mut self) -> Result<(), TransitionError> {
    self.ensure_idle()?;
    let Surface::Viewing(id) = self.surface else {
      return Err(self.invalid("edit"));
    };
    let person = self.person(id).ok_or(TransitionError::UnknownPerson(id))?;
    let form = PersonForm::from_profile(&person.profile);
    self.surface = Surface::Editing { id, form };
    Ok(())
  }

  /// Back out of the current surface. Forms and the detail view close;
  /// a delete confirmation returns to where it was opened from.
  pub fn cancel(&mut self) -> Result<(), TransitionError> {
    self.ensure_idle()?;
    match std::mem::take(&mut self.surface) {
      Surface::Closed => Err(self.invalid("cancel")),
      Surface::Confirming { previous, .. } => {
        self.surface = *previous;
        Ok(())
      }
      _ => Ok(()),
    }
  }

  /// Ask for confirmation before deleting the person being viewed or edited.
  pub fn request_delete(&mut self) -> Result<(), TransitionError> {
    self.ensure_idle()?;
    let id = match &self.surface {
      Surface::Viewing(id) | Surface::Editing { id, .. } => *id,
      _ => return Err(self.invalid("delete")),
    };
    let previous = Box::new(std::mem::take(&mut self.surface));
    self.surface = Surface::Confirming { id, previous };
    Ok(())
  }

  // ── Saving ────────────────────────────────────────────────────────────────

  /// Check the open form and mark a save in flight. The caller sends the
  /// returned request and reports back with [`save_succeeded`] or
  /// [`save_failed`].
  ///
  /// [`save_succeeded`]: Self::save_succeeded
  /// [`save_failed`]: Self::save_failed
  pub fn begin_save(&mut self) -> Result<SaveRequest, TransitionError> {
    self.ensure_idle()?;
    let request = match &self.surface {
      Surface::Adding(form) => {
        form.check()?;
        SaveRequest::Create(form.to_new_person())
      }
      Surface::Editing { id, form } => {
        form.check()?;
        let person = self.person(*id).ok_or(TransitionError::UnknownPerson(*id))?;
        SaveRequest::Update(*id, form.to_patch(&person.profile))
      }
      _ => return Err(self.invalid("save")),
    };
    self.saving = true;
    Ok(request)
  }

  /// Fold the stored record returned by the server into the list and close
  /// the form. A created person is appended; an updated one replaces the
  /// entry with the same id.
  pub fn save_succeeded(&mut self, person: Person) {
    self.saving = false;
    match self.people.iter_mut().find(|p| p.id == person.id) {
      Some(slot) => *slot = person,
      None => self.people.push(person),
    }
    self.surface = Surface::Closed;
  }

  /// The save failed; the form stays open with its contents.
  pub fn save_failed(&mut self) { self.saving = false; }

  /// Confirm the pending delete and mark it in flight. Returns the id to
  /// delete.
  pub fn begin_delete(&mut self) -> Result<Uuid, TransitionError> {
    self.ensure_idle()?;
    let Surface::Confirming { id, .. } = self.surface else {
      return Err(self.invalid("confirm a delete"));
    };
    self.saving = true;
    Ok(id)
  }

  /// Remove the deleted person from the list and close everything.
  pub fn delete_succeeded(&mut self, id: Uuid) {
    self.saving = false;
    self.people.retain(|p| p.id != id);
    self.surface = Surface::Closed;
  }

  /// The delete failed; the confirmation stays open.
  pub fn delete_failed(&mut self) { self.saving = false; }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use crew_core::person::Profile;

  use super::*;

  fn person(name: &str, department: &str) -> Person {
    let now = Utc::now();
    Person {
      id:         Uuid::new_v4(),
      profile:    Profile {
        department: Some(department.into()),
        ..Profile::new(name)
      },
      created_at: now,
      updated_at: now,
    }
  }

  fn stored(draft: NewPerson) -> Person {
    let now = Utc::now();
    Person {
      id:         Uuid::new_v4(),
      profile:    draft.validate().unwrap(),
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn add_then_save_appends_and_closes() {
    let mut dir = Directory::new(vec![person("Alex Johnson", "Upper Management")]);
    dir.open_add().unwrap();
    dir.form_mut().unwrap().name = "Ada".into();

    let SaveRequest::Create(draft) = dir.begin_save().unwrap() else {
      panic!("expected a create request");
    };
    assert!(dir.is_saving());
    dir.save_succeeded(stored(draft));

    assert_eq!(dir.people().len(), 2);
    assert_eq!(dir.people()[1].profile.name, "Ada");
    assert_eq!(*dir.surface(), Surface::Closed);
    assert!(!dir.is_saving());
  }

  #[test]
  fn save_with_blank_name_is_refused_before_sending() {
    let mut dir = Directory::default();
    dir.open_add().unwrap();
    assert!(matches!(dir.begin_save(), Err(TransitionError::Form(_))));
    assert!(!dir.is_saving());
    assert!(matches!(dir.surface(), Surface::Adding(_)));
  }

  #[test]
  fn second_save_while_in_flight_is_busy() {
    let mut dir = Directory::default();
    dir.open_add().unwrap();
    dir.form_mut().unwrap().name = "Ada".into();
    dir.begin_save().unwrap();
    assert!(matches!(dir.begin_save(), Err(TransitionError::Busy)));
    assert!(matches!(dir.cancel(), Err(TransitionError::Busy)));
  }

  #[test]
  fn failed_save_keeps_form_and_list() {
    let mut dir = Directory::default();
    dir.open_add().unwrap();
    dir.form_mut().unwrap().name = "Ada".into();
    dir.begin_save().unwrap();
    dir.save_failed();

    assert!(dir.people().is_empty());
    let Surface::Adding(form) = dir.surface() else { panic!("form closed") };
    assert_eq!(form.name, "Ada");
    assert!(!dir.is_saving());
  }

  #[test]
  fn cancelling_add_discards_form() {
    let alex = person("Alex Johnson", "Upper Management");
    let mut dir = Directory::new(vec![alex.clone()]);

    dir.open_add().unwrap();
    dir.form_mut().unwrap().name = "Ada".into();
    dir.cancel().unwrap();

    assert_eq!(*dir.surface(), Surface::Closed);
    assert_eq!(dir.people(), [alex]);
  }

  #[test]
  fn cancelling_edit_leaves_record_untouched() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![david.clone()]);

    dir.open_detail(id).unwrap();
    dir.edit().unwrap();
    let form = dir.form_mut().unwrap();
    form.name = "Dave".into();
    form.specialty = "Backend".into();
    dir.cancel().unwrap();

    assert_eq!(*dir.surface(), Surface::Closed);
    assert_eq!(dir.people(), [david]);
  }

  #[test]
  fn cancelling_detail_closes_it() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![david.clone()]);

    dir.open_detail(id).unwrap();
    dir.cancel().unwrap();

    assert_eq!(*dir.surface(), Surface::Closed);
    assert_eq!(dir.people(), [david]);
  }

  #[test]
  fn edit_sends_patch_and_replaces_in_place() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![person("Alex Johnson", "Upper Management"), david]);

    dir.open_detail(id).unwrap();
    dir.edit().unwrap();
    dir.form_mut().unwrap().specialty = "Backend".into();

    let SaveRequest::Update(target, patch) = dir.begin_save().unwrap() else {
      panic!("expected an update request");
    };
    assert_eq!(target, id);
    assert_eq!(patch.specialty, Some(Some("Backend".into())));
    assert_eq!(patch.name, None);

    let mut updated = dir.person(id).unwrap().clone();
    patch.apply(&mut updated.profile);
    dir.save_succeeded(updated);

    assert_eq!(dir.people().len(), 2);
    assert_eq!(dir.people()[1].profile.specialty.as_deref(), Some("Backend"));
    assert_eq!(*dir.surface(), Surface::Closed);
  }

  #[test]
  fn delete_confirmation_can_be_cancelled() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![david]);

    dir.open_detail(id).unwrap();
    dir.edit().unwrap();
    dir.request_delete().unwrap();
    assert!(matches!(dir.surface(), Surface::Confirming { .. }));

    dir.cancel().unwrap();
    assert!(matches!(dir.surface(), Surface::Editing { .. }));
    assert_eq!(dir.people().len(), 1);
  }

  #[test]
  fn confirmed_delete_removes_person() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![david]);

    dir.open_detail(id).unwrap();
    dir.request_delete().unwrap();
    assert_eq!(dir.begin_delete().unwrap(), id);
    dir.delete_succeeded(id);

    assert!(dir.people().is_empty());
    assert_eq!(*dir.surface(), Surface::Closed);
  }

  #[test]
  fn failed_delete_keeps_confirmation() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![david]);

    dir.open_detail(id).unwrap();
    dir.request_delete().unwrap();
    dir.begin_delete().unwrap();
    dir.delete_failed();

    assert_eq!(dir.people().len(), 1);
    assert!(matches!(dir.surface(), Surface::Confirming { .. }));
  }

  #[test]
  fn invalid_transitions_are_rejected() {
    let david = person("David Lee", "Engineering");
    let id = david.id;
    let mut dir = Directory::new(vec![david]);

    assert!(matches!(dir.edit(), Err(TransitionError::Invalid { .. })));
    assert!(matches!(dir.request_delete(), Err(TransitionError::Invalid { .. })));
    assert!(matches!(dir.begin_save(), Err(TransitionError::Invalid { .. })));
    assert!(matches!(dir.begin_delete(), Err(TransitionError::Invalid { .. })));
    assert!(matches!(dir.cancel(), Err(TransitionError::Invalid { .. })));
    assert!(matches!(
      dir.open_detail(Uuid::new_v4()),
      Err(TransitionError::UnknownPerson(_))
    ));

    dir.open_add().unwrap();
    assert!(matches!(dir.open_detail(id), Err(TransitionError::Invalid { .. })));
    assert!(matches!(dir.open_add(), Err(TransitionError::Invalid { .. })));
  }

  #[test]
  fn display_order_follows_groups() {
    let dir = Directory::new(vec![
      person("Zed", "Engineering"),
      person("Amy", "Upper Management"),
    ]);
    let names: Vec<_> = dir.display_order().iter().map(|p| p.profile.name.as_str()).collect();
    assert_eq!(names, vec!["Amy", "Zed"]);
    assert_eq!(dir.groups()[0].department, "Upper Management");
  }
}
