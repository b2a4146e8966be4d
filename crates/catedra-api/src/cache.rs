//! In-process TTL cache for the hot faculty-scoped listings.
//!
//! Only unfiltered listings are cached; searched or limited queries go
//! straight to the store. Mutating handlers call
//! [`ListingCache::invalidate_faculty`] so readers never see staleness
//! beyond an in-flight request.

use std::{
  collections::HashMap,
  sync::RwLock,
  time::{Duration, Instant},
};

use catedra_core::{professor::Professor, subject::Subject};
use uuid::Uuid;

/// Subjects change rarely; professors carry rating statistics that move on
/// every submitted rating.
const SUBJECTS_TTL: Duration = Duration::from_secs(600);
const PROFESSORS_TTL: Duration = Duration::from_secs(60);

struct Entry<T> {
  value:      T,
  expires_at: Instant,
}

impl<T: Clone> Entry<T> {
  fn fresh(&self) -> Option<T> {
    (Instant::now() < self.expires_at).then(|| self.value.clone())
  }
}

#[derive(Default)]
struct Shelves {
  subjects:   HashMap<Uuid, Entry<Vec<Subject>>>,
  professors: HashMap<Uuid, Entry<Vec<Professor>>>,
}

/// Per-faculty cache of the public subject and professor listings.
pub struct ListingCache {
  enabled: bool,
  shelves: RwLock<Shelves>,
}

impl ListingCache {
  pub fn new(enabled: bool) -> Self {
    Self { enabled, shelves: RwLock::new(Shelves::default()) }
  }

  pub fn get_subjects(&self, faculty_id: Uuid) -> Option<Vec<Subject>> {
    if !self.enabled {
      return None;
    }
    let shelves = self.shelves.read().ok()?;
    shelves.subjects.get(&faculty_id).and_then(Entry::fresh)
  }

  pub fn put_subjects(&self, faculty_id: Uuid, subjects: Vec<Subject>) {
    if !self.enabled {
      return;
    }
    if let Ok(mut shelves) = self.shelves.write() {
      shelves.subjects.insert(faculty_id, Entry {
        value:      subjects,
        expires_at: Instant::now() + SUBJECTS_TTL,
      });
    }
  }

  pub fn get_professors(&self, faculty_id: Uuid) -> Option<Vec<Professor>> {
    if !self.enabled {
      return None;
    }
    let shelves = self.shelves.read().ok()?;
    shelves.professors.get(&faculty_id).and_then(Entry::fresh)
  }

  pub fn put_professors(&self, faculty_id: Uuid, professors: Vec<Professor>) {
    if !self.enabled {
      return;
    }
    if let Ok(mut shelves) = self.shelves.write() {
      shelves.professors.insert(faculty_id, Entry {
        value:      professors,
        expires_at: Instant::now() + PROFESSORS_TTL,
      });
    }
  }

  /// Drop both listings for one faculty after a write touching it.
  pub fn invalidate_faculty(&self, faculty_id: Uuid) {
    if let Ok(mut shelves) = self.shelves.write() {
      shelves.subjects.remove(&faculty_id);
      shelves.professors.remove(&faculty_id);
    }
  }

  /// Drop everything; used when a cross-faculty mutation is cheaper to
  /// flush wholesale than to track.
  pub fn invalidate_all(&self) {
    if let Ok(mut shelves) = self.shelves.write() {
      shelves.subjects.clear();
      shelves.professors.clear();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn subject(faculty_id: Uuid) -> Subject {
    Subject {
      subject_id: Uuid::new_v4(),
      faculty_id,
      department_id: None,
      name: "Redes".into(),
      normalized_name: "redes".into(),
      credits: 6,
      description: None,
      professor_ids: Vec::new(),
    }
  }

  #[test]
  fn hit_then_invalidate() {
    let cache = ListingCache::new(true);
    let f = Uuid::new_v4();

    assert!(cache.get_subjects(f).is_none());
    cache.put_subjects(f, vec![subject(f)]);
    assert_eq!(cache.get_subjects(f).unwrap().len(), 1);

    cache.invalidate_faculty(f);
    assert!(cache.get_subjects(f).is_none());
  }

  #[test]
  fn disabled_cache_never_stores() {
    let cache = ListingCache::new(false);
    let f = Uuid::new_v4();
    cache.put_subjects(f, vec![subject(f)]);
    assert!(cache.get_subjects(f).is_none());
  }

  #[test]
  fn invalidation_is_per_faculty() {
    let cache = ListingCache::new(true);
    let fa = Uuid::new_v4();
    let fb = Uuid::new_v4();
    cache.put_subjects(fa, vec![subject(fa)]);
    cache.put_subjects(fb, vec![subject(fb)]);

    cache.invalidate_faculty(fa);
    assert!(cache.get_subjects(fa).is_none());
    assert!(cache.get_subjects(fb).is_some());
  }
}
