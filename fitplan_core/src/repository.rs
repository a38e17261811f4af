//! The in-memory repository owning every exercise, routine and user.
//!
//! Each collection is an id-keyed arena paired with a [`NameIndex`]. The
//! operations live next to the type they manage (`catalog.rs`,
//! `routine.rs`, `user.rs`); this module holds the shared state, lookups and
//! the consistency check.

use crate::config::TimingConfig;
use crate::index::{normalize, NameIndex};
use crate::{Error, Exercise, Result, Routine, RoutineView, User};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct Repository {
    pub(crate) timing: TimingConfig,
    /// Catalog exercises plus any exercise deleted from the catalog that a
    /// routine could not give up
    pub(crate) exercises: HashMap<Uuid, Exercise>,
    pub(crate) catalog: NameIndex,
    pub(crate) routines: HashMap<Uuid, Routine>,
    pub(crate) routine_index: NameIndex,
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) user_index: NameIndex,
}

impl Repository {
    /// Empty repository using the default exercise timing
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty repository whose new exercises use `timing`
    pub fn with_timing(timing: TimingConfig) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn timing(&self) -> TimingConfig {
        self.timing
    }

    pub(crate) fn require_exercise(&self, name: &str) -> Result<Uuid> {
        self.catalog
            .get(name)
            .ok_or_else(|| Error::validation("Exercise not found in the catalog."))
    }

    pub(crate) fn require_routine(&self, name: &str) -> Result<Uuid> {
        self.routine_index
            .get(name)
            .ok_or_else(|| Error::validation("Routine not found."))
    }

    pub(crate) fn require_user(&self, name: &str) -> Result<Uuid> {
        self.user_index
            .get(name)
            .ok_or_else(|| Error::validation("User not found."))
    }

    pub(crate) fn view<'a>(&'a self, routine: &'a Routine) -> RoutineView<'a> {
        RoutineView {
            routine,
            exercises: routine
                .exercise_ids
                .iter()
                .filter_map(|id| self.exercises.get(id))
                .collect(),
        }
    }

    /// Member of `routine` whose name normalizes to `name`
    pub(crate) fn member_named(&self, routine: &Routine, name: &str) -> Option<Uuid> {
        let key = normalize(name);
        routine.exercise_ids.iter().copied().find(|id| {
            self.exercises
                .get(id)
                .is_some_and(|e| normalize(&e.name) == key)
        })
    }

    /// Check every cross-structure invariant
    ///
    /// Returns a list of problems, or empty Vec if the repository is sound.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        check_index(
            "exercise",
            &self.catalog,
            |id| self.exercises.get(id).map(|e| e.name.as_str()),
            &mut errors,
        );
        check_index(
            "routine",
            &self.routine_index,
            |id| self.routines.get(id).map(|r| r.name.as_str()),
            &mut errors,
        );
        check_index(
            "user",
            &self.user_index,
            |id| self.users.get(id).map(|u| u.name.as_str()),
            &mut errors,
        );

        if self.routines.len() != self.routine_index.len() {
            errors.push(format!(
                "{} routines stored but {} indexed",
                self.routines.len(),
                self.routine_index.len()
            ));
        }
        if self.users.len() != self.user_index.len() {
            errors.push(format!(
                "{} users stored but {} indexed",
                self.users.len(),
                self.user_index.len()
            ));
        }

        let catalog_ids: HashSet<&Uuid> = self.catalog.ids().iter().collect();
        for (id, exercise) in &self.exercises {
            if !catalog_ids.contains(id)
                && !self.routines.values().any(|r| r.exercise_ids.contains(id))
            {
                errors.push(format!(
                    "Exercise '{}' is neither in the catalog nor in any routine",
                    exercise.name
                ));
            }
        }

        for routine in self.routines.values() {
            if routine.exercise_ids.is_empty() {
                errors.push(format!("Routine '{}' has no exercises", routine.name));
            }
            let mut seen = HashSet::new();
            for id in &routine.exercise_ids {
                match self.exercises.get(id) {
                    Some(exercise) => {
                        if !seen.insert(normalize(&exercise.name)) {
                            errors.push(format!(
                                "Routine '{}' holds '{}' more than once",
                                routine.name, exercise.name
                            ));
                        }
                    }
                    None => errors.push(format!(
                        "Routine '{}' references missing exercise {}",
                        routine.name, id
                    )),
                }
            }
        }

        for user in self.users.values() {
            let mut seen = HashSet::new();
            for id in &user.routine_ids {
                if !self.routines.contains_key(id) {
                    errors.push(format!(
                        "User '{}' references missing routine {}",
                        user.name, id
                    ));
                }
                if !seen.insert(id) {
                    errors.push(format!(
                        "User '{}' has a routine assigned twice",
                        user.name
                    ));
                }
            }
        }

        errors
    }
}

/// Index keys must equal the normalized names of the ids it lists
fn check_index<'a>(
    label: &str,
    index: &NameIndex,
    name_of: impl Fn(&Uuid) -> Option<&'a str>,
    errors: &mut Vec<String>,
) {
    let mut listed = HashSet::new();
    for id in index.ids() {
        match name_of(id) {
            Some(name) => {
                let key = normalize(name);
                if index.get(&key) != Some(*id) {
                    errors.push(format!("{} '{}' is not indexed under its name", label, name));
                }
                listed.insert(key);
            }
            None => errors.push(format!("{} index lists missing id {}", label, id)),
        }
    }

    let keys: HashSet<String> = index.keys().map(str::to_string).collect();
    if keys != listed {
        errors.push(format!(
            "{} index keys {:?} do not match listed names {:?}",
            label, keys, listed
        ));
    }
}
