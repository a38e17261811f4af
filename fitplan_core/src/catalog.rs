//! Exercise catalog operations and the built-in sample catalog.

use crate::config::TimingConfig;
use crate::index::normalize;
use crate::types::{validate_name, validate_reps, validate_sets};
use crate::{Error, Exercise, Repository, Result};
use std::collections::HashSet;
use uuid::Uuid;

/// Changes to apply to a catalog exercise; `None` keeps the current value
#[derive(Clone, Debug, Default)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
}

/// Outcome of deleting an exercise from the catalog
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExerciseRemoval {
    pub name: String,
    /// Routines the exercise was removed from
    pub detached_from: Vec<String>,
    /// Routines that still hold it because it was their only exercise
    pub retained_by: Vec<String>,
}

impl Repository {
    /// Add a new exercise to the catalog using the repository's timing
    pub fn create_exercise(&mut self, name: &str, reps: u32, sets: u32) -> Result<&Exercise> {
        if self.catalog.contains(name) {
            return Err(Error::validation(
                "An exercise with that name already exists in the catalog.",
            ));
        }
        let exercise = Exercise::with_timing(name, reps, sets, self.timing)?;
        let id = exercise.id;
        self.catalog.insert(&exercise.name, id);
        tracing::debug!(
            "Created exercise '{}' ({}s estimated)",
            exercise.name,
            exercise.duration_seconds()
        );
        Ok(self.exercises.entry(id).or_insert(exercise))
    }

    /// Catalog exercises in insertion order
    pub fn list_exercises(&self) -> Vec<&Exercise> {
        self.catalog
            .ids()
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .collect()
    }

    pub fn find_exercise(&self, name: &str) -> Option<&Exercise> {
        self.catalog.get(name).and_then(|id| self.exercises.get(&id))
    }

    /// Resolve a selection of names to catalog exercises, in request order
    ///
    /// Fails on the first unknown name or on a name repeated in the request.
    pub fn exercises_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Exercise>> {
        Ok(self
            .resolve_exercise_ids(names)?
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .collect())
    }

    pub(crate) fn resolve_exercise_ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Uuid>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !seen.insert(normalize(name)) {
                return Err(Error::validation(format!(
                    "Exercise name repeated in the selection: '{}'.",
                    name.trim()
                )));
            }
            let id = self.catalog.get(name).ok_or_else(|| {
                Error::validation(format!(
                    "Exercise '{}' does not exist in the catalog.",
                    name.trim()
                ))
            })?;
            ids.push(id);
        }
        Ok(ids)
    }

    /// Edit a catalog exercise in place
    ///
    /// The record is shared, so every routine holding it sees the change.
    pub fn update_exercise(&mut self, name: &str, update: ExerciseUpdate) -> Result<&Exercise> {
        let id = self.require_exercise(name)?;
        let new_name = update
            .name
            .as_deref()
            .map(|n| validate_name("exercise", n))
            .transpose()?;
        let reps = update.reps.map(validate_reps).transpose()?;
        let sets = update.sets.map(validate_sets).transpose()?;

        if let Some(ref new_name) = new_name {
            if self.catalog.get(new_name).is_some_and(|other| other != id) {
                return Err(Error::validation(
                    "An exercise with that name already exists in the catalog.",
                ));
            }
            for routine in self.routines.values() {
                if !routine.exercise_ids.contains(&id) {
                    continue;
                }
                if self.member_named(routine, new_name).is_some_and(|m| m != id) {
                    return Err(Error::validation(format!(
                        "Routine '{}' already has an exercise named '{}'.",
                        routine.name, new_name
                    )));
                }
            }
        }

        let exercise = self
            .exercises
            .get_mut(&id)
            .ok_or_else(|| Error::validation("Exercise not found in the catalog."))?;
        if let Some(new_name) = new_name {
            self.catalog.rename(&exercise.name, &new_name);
            exercise.name = new_name;
        }
        if let Some(reps) = reps {
            exercise.reps = reps;
        }
        if let Some(sets) = sets {
            exercise.sets = sets;
        }
        tracing::debug!("Updated exercise '{}'", exercise.name);
        Ok(exercise)
    }

    /// Remove an exercise from the catalog and from the routines holding it
    ///
    /// A routine for which this is the only exercise keeps it; those routines
    /// are listed in [`ExerciseRemoval::retained_by`].
    pub fn delete_exercise(&mut self, name: &str) -> Result<ExerciseRemoval> {
        let id = self
            .catalog
            .get(name)
            .ok_or_else(|| Error::validation("Exercise to delete not found."))?;
        let mut removal = ExerciseRemoval {
            name: self
                .exercises
                .get(&id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| name.trim().to_string()),
            ..ExerciseRemoval::default()
        };

        for routine_id in self.routine_index.ids() {
            let Some(routine) = self.routines.get_mut(routine_id) else {
                continue;
            };
            if !routine.exercise_ids.contains(&id) {
                continue;
            }
            if routine.exercise_ids.len() == 1 {
                tracing::warn!(
                    "Routine '{}' keeps '{}': it is its only exercise",
                    routine.name,
                    removal.name
                );
                removal.retained_by.push(routine.name.clone());
            } else {
                routine.exercise_ids.retain(|e| *e != id);
                removal.detached_from.push(routine.name.clone());
            }
        }

        self.catalog.remove(name);
        if removal.retained_by.is_empty() {
            self.exercises.remove(&id);
        }
        tracing::debug!(
            "Deleted exercise '{}' (detached from {}, retained by {})",
            removal.name,
            removal.detached_from.len(),
            removal.retained_by.len()
        );
        Ok(removal)
    }
}

// ============================================================================
// Sample catalog
// ============================================================================

const SAMPLE_EXERCISES: &[(&str, u32, u32)] = &[
    ("Squat", 12, 3),
    ("Push-up", 10, 3),
    ("Lunge", 10, 2),
    ("Plank Shoulder Tap", 20, 2),
    ("Burpee", 8, 3),
    ("Glute Bridge", 15, 3),
];

const SAMPLE_ROUTINES: &[(&str, &str, &[&str])] = &[
    (
        "Lower Body Basics",
        "Squats, lunges and bridges for legs and hips",
        &["Squat", "Lunge", "Glute Bridge"],
    ),
    (
        "Quick Conditioning",
        "Short full-body circuit",
        &["Burpee", "Push-up", "Plank Shoulder Tap"],
    ),
];

/// Builds a repository preloaded with a small bodyweight catalog
pub fn build_sample_repository(timing: TimingConfig) -> Result<Repository> {
    let mut repo = Repository::with_timing(timing);
    for (name, reps, sets) in SAMPLE_EXERCISES {
        repo.create_exercise(name, *reps, *sets)?;
    }
    for (name, description, exercises) in SAMPLE_ROUTINES {
        repo.create_routine(name, description, *exercises)?;
    }
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with(names: &[&str]) -> Repository {
        let mut repo = Repository::new();
        for name in names {
            repo.create_exercise(name, 10, 3).unwrap();
        }
        repo
    }

    #[test]
    fn test_sample_repository_loads() {
        let repo = build_sample_repository(TimingConfig::default()).unwrap();
        assert_eq!(repo.list_exercises().len(), SAMPLE_EXERCISES.len());
        assert_eq!(repo.list_routines().len(), SAMPLE_ROUTINES.len());
        assert!(repo.validate().is_empty(), "{:?}", repo.validate());
    }

    #[test]
    fn test_create_and_list_in_insertion_order() {
        let repo = repo_with(&["Squat", "Row", "Dip"]);
        let names: Vec<_> = repo.list_exercises().into_iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Squat", "Row", "Dip"]);
    }

    #[test]
    fn test_create_uses_repository_timing() {
        let mut repo = Repository::with_timing(TimingConfig {
            seconds_per_rep: 2,
            rest_between_sets: 10,
        });
        let ex = repo.create_exercise("Squat", 10, 3).unwrap();
        assert_eq!(ex.duration_seconds(), 10 * 2 * 3 + 10 * 2);
    }

    #[test]
    fn test_duplicate_name_differing_by_case_and_whitespace() {
        let mut repo = repo_with(&["Squat"]);
        let err = repo.create_exercise("  sQuAt ", 5, 5).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repo.list_exercises().len(), 1);
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_invalid_exercise_leaves_catalog_untouched() {
        let mut repo = Repository::new();
        assert!(repo.create_exercise("Squat", 0, 3).is_err());
        assert!(repo.create_exercise("", 10, 3).is_err());
        assert!(repo.list_exercises().is_empty());
        assert!(repo.find_exercise("Squat").is_none());
    }

    #[test]
    fn test_exercises_by_names_in_request_order() {
        let repo = repo_with(&["Squat", "Row", "Dip"]);
        let found = repo.exercises_by_names(&["dip", " SQUAT "]).unwrap();
        let names: Vec<_> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Dip", "Squat"]);
    }

    #[test]
    fn test_exercises_by_names_rejects_duplicates_regardless_of_catalog() {
        let repo = repo_with(&["Squat"]);
        assert!(repo.exercises_by_names(&["Squat", "squat"]).is_err());

        let empty = Repository::new();
        assert!(empty.exercises_by_names(&["Squat", "squat"]).is_err());
    }

    #[test]
    fn test_exercises_by_names_rejects_unknown() {
        let repo = repo_with(&["Squat"]);
        let err = repo.exercises_by_names(&["Squat", "Deadlift"]).unwrap_err();
        assert!(err.to_string().contains("Deadlift"));
    }

    #[test]
    fn test_delete_unknown_fails() {
        let mut repo = repo_with(&["Squat"]);
        assert!(repo.delete_exercise("Row").is_err());
        assert_eq!(repo.list_exercises().len(), 1);
    }

    #[test]
    fn test_delete_cascades_to_every_routine() {
        let mut repo = repo_with(&["Squat", "Row", "Dip"]);
        repo.create_routine("A", "first", &["Squat", "Row"]).unwrap();
        repo.create_routine("B", "second", &["Dip", "Squat"]).unwrap();

        let removal = repo.delete_exercise("squat").unwrap();
        assert_eq!(removal.name, "Squat");
        assert_eq!(removal.detached_from, vec!["A", "B"]);
        assert!(removal.retained_by.is_empty());

        assert!(repo.find_exercise("Squat").is_none());
        let a = repo.find_routine("A").unwrap();
        assert_eq!(a.exercises.len(), 1);
        assert_eq!(a.exercises[0].name, "Row");
        let b = repo.find_routine("B").unwrap();
        assert_eq!(b.exercises[0].name, "Dip");
        assert!(repo.validate().is_empty(), "{:?}", repo.validate());
    }

    #[test]
    fn test_delete_skips_routine_that_would_become_empty() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("Solo", "only squats", &["Squat"]).unwrap();
        repo.create_routine("Mixed", "both", &["Squat", "Row"]).unwrap();

        let removal = repo.delete_exercise("Squat").unwrap();
        assert_eq!(removal.detached_from, vec!["Mixed"]);
        assert_eq!(removal.retained_by, vec!["Solo"]);

        // Gone from the catalog, still held by the routine it could not leave
        assert!(repo.find_exercise("Squat").is_none());
        let solo = repo.find_routine("Solo").unwrap();
        assert_eq!(solo.exercises.len(), 1);
        assert_eq!(solo.exercises[0].name, "Squat");
        assert!(repo.validate().is_empty(), "{:?}", repo.validate());

        // The name is free for a new catalog entry
        repo.create_exercise("Squat", 5, 5).unwrap();
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_update_exercise_visible_in_routines() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("A", "first", &["Squat", "Row"]).unwrap();

        repo.update_exercise(
            "squat",
            ExerciseUpdate {
                name: Some("Back Squat".into()),
                reps: Some(5),
                sets: None,
            },
        )
        .unwrap();

        assert!(repo.find_exercise("Squat").is_none());
        let ex = repo.find_exercise("back squat").unwrap();
        assert_eq!(ex.reps, 5);
        assert_eq!(ex.sets, 3);
        let a = repo.find_routine("A").unwrap();
        assert_eq!(a.exercises[0].name, "Back Squat");
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_update_exercise_rename_collision_is_rejected() {
        let mut repo = repo_with(&["Squat", "Row"]);
        let update = ExerciseUpdate {
            name: Some("ROW".into()),
            reps: Some(20),
            ..ExerciseUpdate::default()
        };
        assert!(repo.update_exercise("Squat", update).is_err());

        // Nothing applied, not even the valid reps change
        let squat = repo.find_exercise("Squat").unwrap();
        assert_eq!(squat.reps, 10);
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_update_exercise_rename_collides_with_retained_member() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("Solo", "only squats", &["Squat"]).unwrap();
        repo.delete_exercise("Squat").unwrap();
        repo.routine_add_exercise("Solo", "Row").unwrap();

        // "Squat" is free in the catalog but still a member of Solo
        assert!(repo
            .update_exercise(
                "Row",
                ExerciseUpdate {
                    name: Some("squat".into()),
                    ..ExerciseUpdate::default()
                }
            )
            .is_err());
        assert!(repo.find_exercise("Row").is_some());
    }

    #[test]
    fn test_update_exercise_case_only_rename() {
        let mut repo = repo_with(&["squat"]);
        let update = ExerciseUpdate {
            name: Some("Squat".into()),
            ..ExerciseUpdate::default()
        };
        assert_eq!(repo.update_exercise("squat", update).unwrap().name, "Squat");
        assert!(repo.validate().is_empty());
    }
}
