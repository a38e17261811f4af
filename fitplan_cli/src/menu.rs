//! Line-oriented terminal menu over a [`Repository`].
//!
//! Generic over the input and output streams so the same code drives the
//! real terminal and scripted tests. EOF on input ends the session.

use fitplan_core::*;
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 60;

pub struct Menu<'a, R, W> {
    repo: &'a mut Repository,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(repo: &'a mut Repository, input: R, out: W) -> Self {
        Self { repo, input, out }
    }

    /// Run until the user quits or input ends
    pub fn run(&mut self) -> Result<()> {
        match self.main_menu() {
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::debug!("Input closed, leaving menu");
                writeln!(self.out)?;
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "\n=== MAIN MENU ===")?;
            writeln!(self.out, "1) Users")?;
            writeln!(self.out, "2) Exercises (catalog)")?;
            writeln!(self.out, "3) Routines")?;
            writeln!(self.out, "4) Assign routine to user")?;
            writeln!(self.out, "5) Report by user")?;
            writeln!(self.out, "6) Quit")?;
            match self.read_line("Option: ")?.as_str() {
                "1" => self.users_menu()?,
                "2" => self.exercises_menu()?,
                "3" => self.routines_menu()?,
                "4" => {
                    let user = self.read_non_empty("User: ")?;
                    let routine = self.read_non_empty("Routine: ")?;
                    let result = self.repo.assign_routine(&user, &routine);
                    self.outcome(result, "Routine assigned.")?;
                }
                "5" => self.print_report()?,
                "6" => {
                    writeln!(self.out, "Goodbye.")?;
                    return Ok(());
                }
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    fn users_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "\n--- Users ---")?;
            writeln!(self.out, "1) Add")?;
            writeln!(self.out, "2) List")?;
            writeln!(self.out, "3) Edit")?;
            writeln!(self.out, "4) Show assigned routines")?;
            writeln!(self.out, "5) Back")?;
            match self.read_line("Option: ")?.as_str() {
                "1" => {
                    let name = self.read_non_empty("Name: ")?;
                    let age = self.read_int("Age: ", MIN_AGE, MAX_AGE)?;
                    let result = self.repo.create_user(&name, age).map(|_| ());
                    self.outcome(result, "User added.")?;
                }
                "2" => self.print_users()?,
                "3" => {
                    let name = self.read_non_empty("User to edit: ")?;
                    match self.repo.find_user(&name).map(|u| u.name.clone()) {
                        Some(current) => self.edit_user(current)?,
                        None => writeln!(self.out, "No such user.")?,
                    }
                }
                "4" => {
                    let name = self.read_non_empty("User: ")?;
                    self.print_user_routines(&name)?;
                }
                "5" => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn edit_user(&mut self, mut current: String) -> Result<()> {
        loop {
            writeln!(self.out, "\nEditing user: {}", current)?;
            writeln!(self.out, "1) Change name")?;
            writeln!(self.out, "2) Change age")?;
            writeln!(self.out, "3) Back")?;
            match self.read_line("Option: ")?.as_str() {
                "1" => {
                    let new_name = self.read_non_empty("New name: ")?;
                    let result = self
                        .repo
                        .update_user(&current, Some(&new_name), None)
                        .map(|u| u.name.clone());
                    if let Some(name) = self.outcome(result, "Name updated.")? {
                        current = name;
                    }
                }
                "2" => {
                    let age = self.read_int("New age: ", MIN_AGE, MAX_AGE)?;
                    let result = self.repo.update_user(&current, None, Some(age)).map(|_| ());
                    self.outcome(result, "Age updated.")?;
                }
                "3" => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn print_users(&mut self) -> Result<()> {
        let lines: Vec<String> = self.repo.list_users().iter().map(|u| u.to_string()).collect();
        if lines.is_empty() {
            writeln!(self.out, "No users.")?;
        }
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn print_user_routines(&mut self, name: &str) -> Result<()> {
        let result = self.repo.user_routines(name).map(|routines| {
            routines
                .iter()
                .map(|r| format!("  - {}: {}", r.name(), format_duration(r.total_seconds())))
                .collect::<Vec<_>>()
        });
        if let Some(lines) = self.outcome(result, "")? {
            if lines.is_empty() {
                writeln!(self.out, "  (No routines assigned)")?;
            }
            for line in lines {
                writeln!(self.out, "{}", line)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Exercises
    // ------------------------------------------------------------------

    fn exercises_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "\n--- Exercises (catalog) ---")?;
            writeln!(self.out, "1) Create exercise")?;
            writeln!(self.out, "2) List exercises")?;
            writeln!(self.out, "3) Edit exercise")?;
            writeln!(self.out, "4) Delete exercise")?;
            writeln!(self.out, "5) Back")?;
            match self.read_line("Option: ")?.as_str() {
                "1" => {
                    let name = self.read_non_empty("Name: ")?;
                    let reps = self.read_int("Repetitions: ", MIN_REPS, MAX_REPS)?;
                    let sets = self.read_int("Sets: ", MIN_SETS, MAX_SETS)?;
                    let result = self
                        .repo
                        .create_exercise(&name, reps, sets)
                        .map(|e| e.duration_seconds());
                    if let Some(seconds) = self.outcome(result, "")? {
                        writeln!(
                            self.out,
                            "Exercise created. Estimated duration: {}",
                            format_duration(seconds)
                        )?;
                    }
                }
                "2" => self.print_catalog()?,
                "3" => {
                    let name = self.read_non_empty("Exercise to edit: ")?;
                    match self.repo.find_exercise(&name).map(|e| e.name.clone()) {
                        Some(current) => self.edit_exercise(current)?,
                        None => writeln!(self.out, "No such exercise.")?,
                    }
                }
                "4" => {
                    let name = self.read_non_empty("Name to delete: ")?;
                    let result = self.repo.delete_exercise(&name);
                    if let Some(removal) =
                        self.outcome(result, "Exercise deleted from the catalog.")?
                    {
                        if !removal.retained_by.is_empty() {
                            writeln!(
                                self.out,
                                "Kept in routines where it was the only exercise: {}",
                                removal.retained_by.join(", ")
                            )?;
                        }
                    }
                }
                "5" => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn edit_exercise(&mut self, mut current: String) -> Result<()> {
        loop {
            writeln!(self.out, "\nEditing exercise: {}", current)?;
            writeln!(self.out, "1) Change name")?;
            writeln!(self.out, "2) Change repetitions")?;
            writeln!(self.out, "3) Change sets")?;
            writeln!(self.out, "4) Back")?;
            let update = match self.read_line("Option: ")?.as_str() {
                "1" => ExerciseUpdate {
                    name: Some(self.read_non_empty("New name: ")?),
                    ..ExerciseUpdate::default()
                },
                "2" => ExerciseUpdate {
                    reps: Some(self.read_int("New repetitions: ", MIN_REPS, MAX_REPS)?),
                    ..ExerciseUpdate::default()
                },
                "3" => ExerciseUpdate {
                    sets: Some(self.read_int("New sets: ", MIN_SETS, MAX_SETS)?),
                    ..ExerciseUpdate::default()
                },
                "4" => return Ok(()),
                _ => {
                    writeln!(self.out, "Invalid option.")?;
                    continue;
                }
            };
            let result = self
                .repo
                .update_exercise(&current, update)
                .map(|e| e.name.clone());
            if let Some(name) = self.outcome(result, "Exercise updated.")? {
                current = name;
            }
        }
    }

    fn print_catalog(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .repo
            .list_exercises()
            .iter()
            .map(|e| format!("- {}", e))
            .collect();
        if lines.is_empty() {
            writeln!(self.out, "(Empty catalog)")?;
        }
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Routines
    // ------------------------------------------------------------------

    fn routines_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "\n--- Routines ---")?;
            writeln!(self.out, "1) Create routine (choosing exercises from the catalog)")?;
            writeln!(self.out, "2) List routines")?;
            writeln!(self.out, "3) Edit routine")?;
            writeln!(self.out, "4) Back")?;
            match self.read_line("Option: ")?.as_str() {
                "1" => self.create_routine()?,
                "2" => self.print_routines()?,
                "3" => {
                    let name = self.read_non_empty("Routine to edit: ")?;
                    match self.repo.find_routine(&name).map(|r| r.name().to_string()) {
                        Some(current) => self.edit_routine(current)?,
                        None => writeln!(self.out, "No such routine.")?,
                    }
                }
                "4" => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn create_routine(&mut self) -> Result<()> {
        if self.repo.list_exercises().is_empty() {
            writeln!(self.out, "Create exercises in the catalog first.")?;
            return Ok(());
        }
        let name = self.read_non_empty("Routine name: ")?;
        let description = self.read_non_empty("Description: ")?;
        writeln!(self.out, "\nAvailable exercises (separate with commas):")?;
        self.print_catalog()?;
        let selection = self.read_line("Names to include: ")?;
        let names: Vec<&str> = selection
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        let result = self
            .repo
            .create_routine(&name, &description, &names)
            .map(|_| ());
        self.outcome(result, "Routine created.")?;
        Ok(())
    }

    fn edit_routine(&mut self, mut current: String) -> Result<()> {
        loop {
            writeln!(self.out, "\n>>> Editing: {}", current)?;
            writeln!(self.out, "1) Add exercise (from the catalog)")?;
            writeln!(self.out, "2) Remove exercise")?;
            writeln!(self.out, "3) Update reps/sets of an exercise")?;
            writeln!(self.out, "4) Change name/description")?;
            writeln!(self.out, "5) Show total duration")?;
            writeln!(self.out, "6) List exercises")?;
            writeln!(self.out, "7) Back")?;
            match self.read_line("Option: ")?.as_str() {
                "1" => {
                    self.print_catalog()?;
                    let exercise = self.read_non_empty("Exercise to add: ")?;
                    let result = self.repo.routine_add_exercise(&current, &exercise);
                    self.outcome(result, "Exercise added to the routine.")?;
                }
                "2" => {
                    let exercise = self.read_non_empty("Exercise to remove: ")?;
                    let result = self.repo.routine_remove_exercise(&current, &exercise);
                    self.outcome(result, "Exercise removed from the routine.")?;
                }
                "3" => {
                    let exercise = self.read_non_empty("Exercise to update: ")?;
                    let reps = self.read_optional_int(
                        "New repetitions (enter to keep): ",
                        MIN_REPS,
                        MAX_REPS,
                    )?;
                    let sets =
                        self.read_optional_int("New sets (enter to keep): ", MIN_SETS, MAX_SETS)?;
                    let result = self
                        .repo
                        .routine_update_exercise(&current, &exercise, reps, sets)
                        .map(|_| ());
                    self.outcome(result, "Exercise updated.")?;
                }
                "4" => {
                    let new_name = self.read_line("New name (enter to keep): ")?;
                    let new_description = self.read_line("New description (enter to keep): ")?;
                    let result = self
                        .repo
                        .update_routine(
                            &current,
                            Some(new_name.as_str()).filter(|s| !s.is_empty()),
                            Some(new_description.as_str()).filter(|s| !s.is_empty()),
                        )
                        .map(|r| r.name.clone());
                    if let Some(name) = self.outcome(result, "Details updated.")? {
                        current = name;
                    }
                }
                "5" => {
                    let total = self
                        .repo
                        .find_routine(&current)
                        .map(|r| r.total_seconds())
                        .unwrap_or_default();
                    writeln!(self.out, "Total duration: {}", format_duration(total))?;
                }
                "6" => {
                    let lines: Vec<String> = self
                        .repo
                        .find_routine(&current)
                        .map(|r| r.exercises.iter().map(|e| format!("  • {}", e)).collect())
                        .unwrap_or_default();
                    for line in lines {
                        writeln!(self.out, "{}", line)?;
                    }
                }
                "7" => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn print_routines(&mut self) -> Result<()> {
        let blocks: Vec<String> = self
            .repo
            .list_routines()
            .iter()
            .map(|view| {
                let mut block = view.to_string();
                for exercise in &view.exercises {
                    block.push_str(&format!("\n  • {}", exercise));
                }
                block
            })
            .collect();
        if blocks.is_empty() {
            writeln!(self.out, "No routines.")?;
            return Ok(());
        }
        for block in blocks {
            writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
            writeln!(self.out, "{}", block)?;
        }
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Report
    // ------------------------------------------------------------------

    fn print_report(&mut self) -> Result<()> {
        let report = self.repo.report();
        if report.is_empty() {
            writeln!(self.out, "No users.")?;
            return Ok(());
        }
        for user in report {
            writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
            writeln!(self.out, "User: {} | Age: {}", user.name, user.age)?;
            if user.routines.is_empty() {
                writeln!(self.out, "  (No routines assigned)")?;
            }
            for (name, seconds) in user.routines {
                writeln!(self.out, "  - {}: {}", name, format_duration(seconds))?;
            }
        }
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Input helpers
    // ------------------------------------------------------------------

    /// Print a validation failure and carry on; anything else propagates
    fn outcome<T>(&mut self, result: Result<T>, success: &str) -> Result<Option<T>> {
        match result {
            Ok(value) => {
                if !success.is_empty() {
                    writeln!(self.out, "{}", success)?;
                }
                Ok(Some(value))
            }
            Err(e) if e.is_validation() => {
                writeln!(self.out, "[Error] {}", e)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(line.trim().to_string())
    }

    fn read_non_empty(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self.read_line(prompt)?;
            if !line.is_empty() {
                return Ok(line);
            }
            writeln!(self.out, "This field cannot be empty.")?;
        }
    }

    fn read_int(&mut self, prompt: &str, min: u32, max: u32) -> Result<u32> {
        loop {
            if let Some(value) = self.read_optional_int(prompt, min, max)? {
                return Ok(value);
            }
            writeln!(self.out, "Enter a whole number between {} and {}.", min, max)?;
        }
    }

    /// Empty input means "keep"; anything else must parse and be in range
    fn read_optional_int(&mut self, prompt: &str, min: u32, max: u32) -> Result<Option<u32>> {
        loop {
            let line = self.read_line(prompt)?;
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse::<u32>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(Some(value)),
                _ => writeln!(self.out, "Enter a whole number between {} and {}.", min, max)?,
            }
        }
    }
}
