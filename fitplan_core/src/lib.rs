#![forbid(unsafe_code)]

//! Core domain model for fitplan.
//!
//! This crate provides:
//! - Domain types (exercises, routines, users) and their validation
//! - The in-memory repository with name-keyed lookup indices
//! - A built-in sample catalog
//! - Configuration and logging setup shared by the binaries

pub mod types;
pub mod error;
pub mod index;
pub mod repository;
pub mod catalog;
pub mod routine;
pub mod user;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use index::NameIndex;
pub use repository::Repository;
pub use catalog::{build_sample_repository, ExerciseRemoval, ExerciseUpdate};
pub use config::{Config, TimingConfig};
