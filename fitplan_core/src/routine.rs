//! Routine operations.

use crate::types::{validate_description, validate_name, validate_reps, validate_sets};
use crate::{Error, Exercise, Repository, Result, Routine, RoutineView};
use uuid::Uuid;

impl Repository {
    /// Create a routine from catalog exercise names
    pub fn create_routine<S: AsRef<str>>(
        &mut self,
        name: &str,
        description: &str,
        exercise_names: &[S],
    ) -> Result<&Routine> {
        let name = validate_name("routine", name)?;
        if self.routine_index.contains(&name) {
            return Err(Error::validation("A routine with that name already exists."));
        }
        if self.catalog.is_empty() {
            return Err(Error::validation(
                "Create exercises in the catalog first.",
            ));
        }
        if exercise_names.is_empty() {
            return Err(Error::validation(
                "Select at least one exercise for the routine.",
            ));
        }
        let description = validate_description(description)?;
        let exercise_ids = self.resolve_exercise_ids(exercise_names)?;

        let routine = Routine {
            id: Uuid::new_v4(),
            name,
            description,
            exercise_ids,
        };
        let id = routine.id;
        self.routine_index.insert(&routine.name, id);
        tracing::debug!(
            "Created routine '{}' with {} exercises",
            routine.name,
            routine.exercise_ids.len()
        );
        Ok(self.routines.entry(id).or_insert(routine))
    }

    /// Routines in insertion order, with their exercises resolved
    pub fn list_routines(&self) -> Vec<RoutineView<'_>> {
        self.routine_index
            .ids()
            .iter()
            .filter_map(|id| self.routines.get(id))
            .map(|routine| self.view(routine))
            .collect()
    }

    pub fn find_routine(&self, name: &str) -> Option<RoutineView<'_>> {
        self.routine_index
            .get(name)
            .and_then(|id| self.routines.get(&id))
            .map(|routine| self.view(routine))
    }

    /// Append a catalog exercise to a routine
    pub fn routine_add_exercise(&mut self, routine: &str, exercise: &str) -> Result<()> {
        let routine_id = self.require_routine(routine)?;
        let exercise_id = self
            .catalog
            .get(exercise)
            .ok_or_else(|| Error::validation("That exercise does not exist in the catalog."))?;
        let current = self
            .routines
            .get(&routine_id)
            .ok_or_else(|| Error::validation("Routine not found."))?;
        let exercise_name = self
            .exercises
            .get(&exercise_id)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        if self.member_named(current, &exercise_name).is_some() {
            return Err(Error::validation(format!(
                "The routine already has an exercise named '{}'.",
                exercise_name
            )));
        }

        if let Some(r) = self.routines.get_mut(&routine_id) {
            r.exercise_ids.push(exercise_id);
            tracing::debug!("Added '{}' to routine '{}'", exercise_name, r.name);
        }
        Ok(())
    }

    /// Remove an exercise from a routine
    ///
    /// Fails if the exercise is not a member or is the routine's last one.
    pub fn routine_remove_exercise(&mut self, routine: &str, exercise: &str) -> Result<()> {
        let routine_id = self.require_routine(routine)?;
        let current = self
            .routines
            .get(&routine_id)
            .ok_or_else(|| Error::validation("Routine not found."))?;
        let member = self
            .member_named(current, exercise)
            .ok_or_else(|| Error::validation("Exercise not found in the routine."))?;
        if current.exercise_ids.len() == 1 {
            return Err(Error::validation(
                "A routine cannot be left without exercises; add another exercise first.",
            ));
        }

        if let Some(r) = self.routines.get_mut(&routine_id) {
            r.exercise_ids.retain(|id| *id != member);
            tracing::debug!("Removed exercise from routine '{}'", r.name);
        }
        self.drop_if_orphaned(member);
        Ok(())
    }

    /// Change reps and/or sets of a routine member
    ///
    /// The exercise record is shared with the catalog and with every other
    /// routine holding it.
    pub fn routine_update_exercise(
        &mut self,
        routine: &str,
        exercise: &str,
        reps: Option<u32>,
        sets: Option<u32>,
    ) -> Result<&Exercise> {
        let routine_id = self.require_routine(routine)?;
        let current = self
            .routines
            .get(&routine_id)
            .ok_or_else(|| Error::validation("Routine not found."))?;
        let member = self
            .member_named(current, exercise)
            .ok_or_else(|| Error::validation("Exercise not found in the routine."))?;
        let reps = reps.map(validate_reps).transpose()?;
        let sets = sets.map(validate_sets).transpose()?;

        let record = self
            .exercises
            .get_mut(&member)
            .ok_or_else(|| Error::validation("Exercise not found in the routine."))?;
        if let Some(reps) = reps {
            record.reps = reps;
        }
        if let Some(sets) = sets {
            record.sets = sets;
        }
        tracing::debug!(
            "Updated '{}': {} reps x {} sets",
            record.name,
            record.reps,
            record.sets
        );
        Ok(record)
    }

    /// Rename and/or re-describe a routine
    ///
    /// Every check runs before the index is re-keyed, so a rejected rename
    /// leaves the old key in place.
    pub fn update_routine(
        &mut self,
        routine: &str,
        new_name: Option<&str>,
        new_description: Option<&str>,
    ) -> Result<&Routine> {
        let routine_id = self.require_routine(routine)?;
        let new_name = new_name
            .map(|n| validate_name("routine", n))
            .transpose()?;
        let new_description = new_description.map(validate_description).transpose()?;

        if let Some(ref name) = new_name {
            if self
                .routine_index
                .get(name)
                .is_some_and(|other| other != routine_id)
            {
                return Err(Error::validation(
                    "Another routine already has that name.",
                ));
            }
        }

        let record = self
            .routines
            .get_mut(&routine_id)
            .ok_or_else(|| Error::validation("Routine not found."))?;
        if let Some(name) = new_name {
            if name != record.name {
                self.routine_index.rename(&record.name, &name);
                tracing::debug!("Renamed routine '{}' to '{}'", record.name, name);
            }
            record.name = name;
        }
        if let Some(description) = new_description {
            record.description = description;
        }
        Ok(record)
    }

    /// Free an exercise record nobody can reach any more
    fn drop_if_orphaned(&mut self, id: Uuid) {
        let in_catalog = self.catalog.ids().contains(&id);
        let held = self.routines.values().any(|r| r.exercise_ids.contains(&id));
        if !in_catalog && !held {
            if let Some(exercise) = self.exercises.remove(&id) {
                tracing::debug!("Dropped retired exercise '{}'", exercise.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with(names: &[&str]) -> Repository {
        crate::logging::init_test();
        let mut repo = Repository::new();
        for name in names {
            repo.create_exercise(name, 10, 3).unwrap();
        }
        repo
    }

    #[test]
    fn test_create_routine_and_total_duration() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("Legs", "lower body", &["Squat", "Row"])
            .unwrap();
        let view = repo.find_routine("legs").unwrap();
        assert_eq!(view.exercises.len(), 2);
        assert_eq!(view.total_seconds(), 420);
        assert!((view.total_minutes() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_create_routine_failures() {
        let mut empty = Repository::new();
        let err = empty.create_routine("Legs", "lower", &["Squat"]).unwrap_err();
        assert!(err.to_string().contains("catalog first"));

        let mut repo = repo_with(&["Squat"]);
        let no_names: &[&str] = &[];
        assert!(repo.create_routine("Legs", "lower", no_names).is_err());
        assert!(repo.create_routine("Legs", "  ", &["Squat"]).is_err());
        assert!(repo.create_routine("", "lower", &["Squat"]).is_err());
        assert!(repo.create_routine("Legs", "lower", &["Deadlift"]).is_err());
        assert!(repo.create_routine("Legs", "lower", &["Squat", "SQUAT"]).is_err());
        assert!(repo.list_routines().is_empty());

        repo.create_routine("Legs", "lower", &["Squat"]).unwrap();
        assert!(repo.create_routine(" LEGS ", "again", &["Squat"]).is_err());
        assert_eq!(repo.list_routines().len(), 1);
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_add_exercise() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("A", "a", &["Squat"]).unwrap();

        repo.routine_add_exercise("a", "row").unwrap();
        assert!(repo.routine_add_exercise("A", "Row").is_err());
        assert!(repo.routine_add_exercise("A", "Deadlift").is_err());
        assert!(repo.routine_add_exercise("Missing", "Row").is_err());

        let names: Vec<_> = repo
            .find_routine("A")
            .unwrap()
            .exercises
            .iter()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(names, vec!["Squat", "Row"]);
    }

    #[test]
    fn test_removing_last_exercise_fails_and_leaves_routine_unchanged() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("A", "a", &["Squat", "Row"]).unwrap();

        repo.routine_remove_exercise("A", "squat").unwrap();
        let before = repo.find_routine("A").unwrap().routine.clone();

        assert!(repo.routine_remove_exercise("A", "Row").is_err());
        assert_eq!(repo.find_routine("A").unwrap().routine, &before);
        assert!(repo.routine_remove_exercise("A", "Squat").is_err());
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_removing_retained_exercise_drops_its_record() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("Solo", "s", &["Squat"]).unwrap();
        repo.delete_exercise("Squat").unwrap();
        repo.routine_add_exercise("Solo", "Row").unwrap();

        repo.routine_remove_exercise("Solo", "Squat").unwrap();
        assert_eq!(repo.exercises.len(), 1);
        assert!(repo.validate().is_empty(), "{:?}", repo.validate());
    }

    #[test]
    fn test_update_exercise_through_routine_is_shared() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("A", "a", &["Squat", "Row"]).unwrap();
        repo.create_routine("B", "b", &["Squat"]).unwrap();

        repo.routine_update_exercise("A", "Squat", Some(20), None)
            .unwrap();

        assert_eq!(repo.find_exercise("Squat").unwrap().reps, 20);
        assert_eq!(repo.find_routine("B").unwrap().exercises[0].reps, 20);
        assert_eq!(repo.find_routine("B").unwrap().exercises[0].sets, 3);
    }

    #[test]
    fn test_update_exercise_through_routine_failures() {
        let mut repo = repo_with(&["Squat", "Row"]);
        repo.create_routine("A", "a", &["Squat"]).unwrap();

        assert!(repo.routine_update_exercise("A", "Row", Some(5), None).is_err());
        assert!(repo.routine_update_exercise("A", "Squat", Some(0), None).is_err());
        assert!(repo
            .routine_update_exercise("A", "Squat", Some(5), Some(101))
            .is_err());
        assert_eq!(repo.find_exercise("Squat").unwrap().reps, 10);
    }

    #[test]
    fn test_rename_collision_keeps_index_intact() {
        let mut repo = repo_with(&["Squat"]);
        repo.create_routine("A", "a", &["Squat"]).unwrap();
        repo.create_routine("B", "b", &["Squat"]).unwrap();

        assert!(repo.update_routine("A", Some("b"), Some("changed")).is_err());

        let a = repo.find_routine("A").unwrap();
        assert_eq!(a.routine.description, "a");
        assert_eq!(repo.find_routine("B").unwrap().routine.description, "b");
        assert_eq!(repo.routine_index.keys().count(), 2);
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_rename_routine() {
        let mut repo = repo_with(&["Squat"]);
        repo.create_routine("A", "a", &["Squat"]).unwrap();
        repo.create_routine("B", "b", &["Squat"]).unwrap();

        repo.update_routine("a", Some("  Alpha "), None).unwrap();
        assert!(repo.find_routine("A").is_none());
        let alpha = repo.find_routine("alpha").unwrap();
        assert_eq!(alpha.name(), "Alpha");

        // Order is preserved across the rename
        let names: Vec<_> = repo.list_routines().iter().map(|v| v.name().to_string()).collect();
        assert_eq!(names, vec!["Alpha", "B"]);

        // Case-only rename of itself is allowed
        repo.update_routine("alpha", Some("ALPHA"), None).unwrap();
        assert_eq!(repo.find_routine("alpha").unwrap().name(), "ALPHA");
        assert!(repo.validate().is_empty());
    }

    #[test]
    fn test_update_routine_rejects_blank_fields() {
        let mut repo = repo_with(&["Squat"]);
        repo.create_routine("A", "a", &["Squat"]).unwrap();
        assert!(repo.update_routine("A", Some(" "), None).is_err());
        assert!(repo.update_routine("A", None, Some("")).is_err());
        assert!(repo.update_routine("Missing", None, Some("x")).is_err());

        repo.update_routine("A", None, Some("new description"))
            .unwrap();
        assert_eq!(
            repo.find_routine("A").unwrap().routine.description,
            "new description"
        );
    }
}
