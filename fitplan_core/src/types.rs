//! Core domain types for fitplan.
//!
//! This module defines the three record types held by the repository:
//! - Exercises with their duration estimate
//! - Routines referencing exercises by id
//! - Users referencing routines by id
//!
//! plus the field validators every constructor and update goes through.

use crate::config::TimingConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_SECONDS_PER_REP: u32 = 5;
pub const DEFAULT_REST_BETWEEN_SETS: u32 = 30;

pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 100;
pub const MIN_SETS: u32 = 1;
pub const MAX_SETS: u32 = 100;
pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 100;

// ============================================================================
// Validation
// ============================================================================

/// Trim a name and reject it if nothing is left
///
/// `what` names the entity in the error message ("exercise", "routine", ...).
pub fn validate_name(what: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!(
            "The {} name cannot be empty.",
            what
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(
            "The routine description cannot be empty.",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_reps(reps: u32) -> Result<u32> {
    if !(MIN_REPS..=MAX_REPS).contains(&reps) {
        return Err(Error::validation(format!(
            "Repetitions must be between {} and {}.",
            MIN_REPS, MAX_REPS
        )));
    }
    Ok(reps)
}

pub fn validate_sets(sets: u32) -> Result<u32> {
    if !(MIN_SETS..=MAX_SETS).contains(&sets) {
        return Err(Error::validation(format!(
            "Sets must be between {} and {}.",
            MIN_SETS, MAX_SETS
        )));
    }
    Ok(sets)
}

pub fn validate_age(age: u32) -> Result<u32> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(Error::validation(format!(
            "Age must be between {} and {}.",
            MIN_AGE, MAX_AGE
        )));
    }
    Ok(age)
}

fn validate_timing(timing: &TimingConfig) -> Result<()> {
    if timing.seconds_per_rep == 0 {
        return Err(Error::validation("Invalid timing for the exercise."));
    }
    Ok(())
}

/// Render a number of seconds as `"{m} min {s} s"`
pub fn format_duration(total_seconds: u32) -> String {
    format!("{} min {} s", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Exercise
// ============================================================================

/// A catalog exercise with its timing parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub reps: u32,
    pub sets: u32,
    pub seconds_per_rep: u32,
    pub rest_between_sets: u32,
}

impl Exercise {
    /// Build an exercise with the default timing
    pub fn new(name: &str, reps: u32, sets: u32) -> Result<Self> {
        Self::with_timing(name, reps, sets, TimingConfig::default())
    }

    /// Build an exercise with explicit timing
    pub fn with_timing(name: &str, reps: u32, sets: u32, timing: TimingConfig) -> Result<Self> {
        validate_timing(&timing)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: validate_name("exercise", name)?,
            reps: validate_reps(reps)?,
            sets: validate_sets(sets)?,
            seconds_per_rep: timing.seconds_per_rep,
            rest_between_sets: timing.rest_between_sets,
        })
    }

    /// Movement time plus rest between consecutive sets
    pub fn duration_seconds(&self) -> u32 {
        let movement = self
            .reps
            .saturating_mul(self.seconds_per_rep)
            .saturating_mul(self.sets);
        let rest = self
            .rest_between_sets
            .saturating_mul(self.sets.saturating_sub(1));
        movement.saturating_add(rest)
    }

    pub fn duration_minutes(&self) -> f64 {
        f64::from(self.duration_seconds()) / 60.0
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | reps: {} | sets: {} | estimated: {}",
            self.name,
            self.reps,
            self.sets,
            format_duration(self.duration_seconds())
        )
    }
}

// ============================================================================
// Routine
// ============================================================================

/// A named bundle of exercises, held by id
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub exercise_ids: Vec<Uuid>,
}

/// A routine with its exercises resolved from the repository
#[derive(Clone, Debug)]
pub struct RoutineView<'a> {
    pub routine: &'a Routine,
    pub exercises: Vec<&'a Exercise>,
}

impl RoutineView<'_> {
    pub fn name(&self) -> &str {
        &self.routine.name
    }

    /// Sum of the member exercises' durations
    pub fn total_seconds(&self) -> u32 {
        self.exercises
            .iter()
            .fold(0u32, |acc, e| acc.saturating_add(e.duration_seconds()))
    }

    pub fn total_minutes(&self) -> f64 {
        f64::from(self.total_seconds()) / 60.0
    }
}

impl fmt::Display for RoutineView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Routine: {}", self.routine.name)?;
        writeln!(f, "Description: {}", self.routine.description)?;
        writeln!(f, "Total: {}", format_duration(self.total_seconds()))?;
        write!(f, "Exercises: {}", self.exercises.len())
    }
}

// ============================================================================
// User
// ============================================================================

/// A user and the routines assigned to them, held by id
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub routine_ids: Vec<Uuid>,
}

impl User {
    pub fn new(name: &str, age: u32) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: validate_name("user", name)?,
            age: validate_age(age)?,
            routine_ids: Vec::new(),
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {} | Age: {} | Routines: {}",
            self.name,
            self.age,
            self.routine_ids.len()
        )
    }
}

/// One line of the per-user report
#[derive(Clone, Debug, PartialEq)]
pub struct UserReport {
    pub name: String,
    pub age: u32,
    /// Assigned routine names with their total duration in seconds
    pub routines: Vec<(String, u32)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formula_with_default_timing() {
        let ex = Exercise::new("Squat", 10, 3).unwrap();
        // movement 10*5*3 = 150, rest 30*2 = 60
        assert_eq!(ex.duration_seconds(), 210);
        assert!((ex.duration_minutes() - 3.5).abs() < f64::EPSILON);
        assert_eq!(format_duration(ex.duration_seconds()), "3 min 30 s");
    }

    #[test]
    fn test_single_set_has_no_rest() {
        let ex = Exercise::new("Plank", 1, 1).unwrap();
        assert_eq!(ex.duration_seconds(), 5);
    }

    #[test]
    fn test_duration_with_custom_timing() {
        let timing = TimingConfig {
            seconds_per_rep: 3,
            rest_between_sets: 0,
        };
        let ex = Exercise::with_timing("Jumping Jack", 20, 4, timing).unwrap();
        assert_eq!(ex.duration_seconds(), 240);
    }

    #[test]
    fn test_duration_is_deterministic_across_range() {
        for reps in [1, 50, 100] {
            for sets in [1, 2, 100] {
                let ex = Exercise::new("Row", reps, sets).unwrap();
                let expected = reps * 5 * sets + 30 * (sets - 1);
                assert_eq!(ex.duration_seconds(), expected);
                let again = Exercise::new("Row", reps, sets).unwrap();
                assert_eq!(ex.duration_seconds(), again.duration_seconds());
            }
        }
    }

    #[test]
    fn test_exercise_rejects_out_of_range_fields() {
        assert!(Exercise::new("  ", 10, 3).unwrap_err().is_validation());
        assert!(Exercise::new("Squat", 0, 3).is_err());
        assert!(Exercise::new("Squat", 101, 3).is_err());
        assert!(Exercise::new("Squat", 10, 0).is_err());
        assert!(Exercise::new("Squat", 10, 101).is_err());
    }

    #[test]
    fn test_exercise_rejects_zero_seconds_per_rep() {
        let timing = TimingConfig {
            seconds_per_rep: 0,
            rest_between_sets: 30,
        };
        assert!(Exercise::with_timing("Squat", 10, 3, timing).is_err());
    }

    #[test]
    fn test_exercise_name_is_trimmed() {
        let ex = Exercise::new("  Lunge ", 8, 2).unwrap();
        assert_eq!(ex.name, "Lunge");
    }

    #[test]
    fn test_user_age_bounds() {
        assert!(User::new("Ana", 15).is_err());
        assert!(User::new("Ana", 16).is_ok());
        assert!(User::new("Ana", 100).is_ok());
        assert!(User::new("Ana", 101).is_err());
        assert!(User::new("", 30).is_err());
    }

    #[test]
    fn test_display_formats() {
        let ex = Exercise::new("Squat", 10, 3).unwrap();
        assert_eq!(
            ex.to_string(),
            "Squat | reps: 10 | sets: 3 | estimated: 3 min 30 s"
        );

        let user = User::new("Ana", 30).unwrap();
        assert_eq!(user.to_string(), "User: Ana | Age: 30 | Routines: 0");
    }
}
