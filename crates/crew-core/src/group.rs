//! Department grouping and ordering for display.
//!
//! Groups are alphabetical with [`UPPER_MANAGEMENT`] always first. Within a
//! group, people are ordered by start date ascending; people whose start date
//! is missing or unparsable come after everyone with a date. Remaining ties
//! are broken by name and then id, so the order never depends on the order
//! the records arrived in.

use std::{cmp::Ordering, collections::BTreeMap};

use crate::person::Person;

/// The department pinned to the top of every listing.
pub const UPPER_MANAGEMENT: &str = "Upper Management";

/// Group used for people with no (or an empty) department.
pub const FALLBACK_DEPARTMENT: &str = "Other";

/// Departments offered by the client's form, in display order.
pub const KNOWN_DEPARTMENTS: [&str; 15] = [
  UPPER_MANAGEMENT,
  "Customer Support",
  "Design",
  "Engineering",
  "Finance",
  "Human Resources",
  "IT",
  "Legal",
  "Marketing",
  "Operations",
  FALLBACK_DEPARTMENT,
  "Product Development",
  "Public Relations",
  "Quality Assurance",
  "Research & Development",
];

/// One department and its members, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentGroup<'a> {
  pub department: &'a str,
  pub people:     Vec<&'a Person>,
}

/// The grouping key for `person`.
pub fn department_of(person: &Person) -> &str {
  match person.profile.department.as_deref().map(str::trim) {
    Some(d) if !d.is_empty() => d,
    _ => FALLBACK_DEPARTMENT,
  }
}

/// Group order: [`UPPER_MANAGEMENT`] first, then case-insensitive
/// alphabetical, then exact byte order to keep distinct spellings apart.
pub fn compare_departments(a: &str, b: &str) -> Ordering {
  match (a == UPPER_MANAGEMENT, b == UPPER_MANAGEMENT) {
    (true, true) => Ordering::Equal,
    (true, false) => Ordering::Less,
    (false, true) => Ordering::Greater,
    (false, false) => a
      .to_lowercase()
      .cmp(&b.to_lowercase())
      .then_with(|| a.cmp(b)),
  }
}

/// Order within a group; see the module docs for the policy.
pub fn compare_people(a: &Person, b: &Person) -> Ordering {
  let by_date = match (
    a.profile.parsed_start_date(),
    b.profile.parsed_start_date(),
  ) {
    (Some(x), Some(y)) => x.cmp(&y),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  };
  by_date
    .then_with(|| a.profile.name.cmp(&b.profile.name))
    .then_with(|| a.id.cmp(&b.id))
}

/// Partition `people` into display-ordered department groups.
pub fn group_by_department(people: &[Person]) -> Vec<DepartmentGroup<'_>> {
  let mut by_department: BTreeMap<&str, Vec<&Person>> = BTreeMap::new();
  for person in people {
    by_department
      .entry(department_of(person))
      .or_default()
      .push(person);
  }

  let mut groups: Vec<DepartmentGroup<'_>> = by_department
    .into_iter()
    .map(|(department, mut people)| {
      people.sort_by(|a, b| compare_people(a, b));
      DepartmentGroup { department, people }
    })
    .collect();
  groups.sort_by(|a, b| compare_departments(a.department, b.department));
  groups
}

/// `people` flattened in display order; the list cursor indexes into this.
pub fn display_order(people: &[Person]) -> Vec<&Person> {
  group_by_department(people)
    .into_iter()
    .flat_map(|g| g.people)
    .collect()
}
