//! User operations and the per-user report.

use crate::types::{validate_age, validate_name};
use crate::{Error, Repository, Result, RoutineView, User, UserReport};

impl Repository {
    pub fn create_user(&mut self, name: &str, age: u32) -> Result<&User> {
        if self.user_index.contains(name) {
            return Err(Error::validation("A user with that name already exists."));
        }
        let user = User::new(name, age)?;
        let id = user.id;
        self.user_index.insert(&user.name, id);
        tracing::debug!("Created user '{}'", user.name);
        Ok(self.users.entry(id).or_insert(user))
    }

    /// Users in insertion order
    pub fn list_users(&self) -> Vec<&User> {
        self.user_index
            .ids()
            .iter()
            .filter_map(|id| self.users.get(id))
            .collect()
    }

    pub fn find_user(&self, name: &str) -> Option<&User> {
        self.user_index.get(name).and_then(|id| self.users.get(&id))
    }

    /// Give a user a routine; a routine can only be assigned once per user
    pub fn assign_routine(&mut self, user: &str, routine: &str) -> Result<()> {
        let user_id = self.require_user(user)?;
        let routine_id = self.require_routine(routine)?;
        let record = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::validation("User not found."))?;
        if record.routine_ids.contains(&routine_id) {
            let routine_name = self
                .routines
                .get(&routine_id)
                .map(|r| r.name.as_str())
                .unwrap_or_default();
            return Err(Error::validation(format!(
                "The user already has a routine called '{}'.",
                routine_name
            )));
        }
        record.routine_ids.push(routine_id);
        tracing::debug!("Assigned routine to user '{}'", record.name);
        Ok(())
    }

    /// Rename and/or re-age a user, with the same duplicate-name protection
    /// as routines
    pub fn update_user(
        &mut self,
        user: &str,
        new_name: Option<&str>,
        new_age: Option<u32>,
    ) -> Result<&User> {
        let user_id = self.require_user(user)?;
        let new_name = new_name.map(|n| validate_name("user", n)).transpose()?;
        let new_age = new_age.map(validate_age).transpose()?;

        if let Some(ref name) = new_name {
            if self.user_index.get(name).is_some_and(|other| other != user_id) {
                return Err(Error::validation("A user with that name already exists."));
            }
        }

        let record = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::validation("User not found."))?;
        if let Some(name) = new_name {
            if name != record.name {
                self.user_index.rename(&record.name, &name);
                tracing::debug!("Renamed user '{}' to '{}'", record.name, name);
            }
            record.name = name;
        }
        if let Some(age) = new_age {
            record.age = age;
        }
        Ok(record)
    }

    /// Routines assigned to a user, in assignment order
    pub fn user_routines(&self, user: &str) -> Result<Vec<RoutineView<'_>>> {
        let user_id = self.require_user(user)?;
        let record = self
            .users
            .get(&user_id)
            .ok_or_else(|| Error::validation("User not found."))?;
        Ok(record
            .routine_ids
            .iter()
            .filter_map(|id| self.routines.get(id))
            .map(|routine| self.view(routine))
            .collect())
    }

    /// Every user with the total duration of each assigned routine
    pub fn report(&self) -> Vec<UserReport> {
        self.list_users()
            .into_iter()
            .map(|user| UserReport {
                name: user.name.clone(),
                age: user.age,
                routines: user
                    .routine_ids
                    .iter()
                    .filter_map(|id| self.routines.get(id))
                    .map(|routine| {
                        let view = self.view(routine);
                        (view.name().to_string(), view.total_seconds())
                    })
                    .collect(),
            })
            .collect()
    }
}
