//! organize - move the files of a directory into category folders
//!
//! This library maps file extensions to category folders (`Documents`,
//! `Music`, `Images`, ...), resolves the directory to work on, and moves each
//! regular file of that directory into its category folder, skipping name
//! collisions.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod path_resolver;

pub use config::RunConfig;
pub use file_category::{Category, CategoryError, CategoryTable, ExtensionIndex};
pub use file_organizer::{FileOrganizer, FileOutcome, OrganizeError, OrganizeReport};
pub use path_resolver::PathError;

pub use cli::{CliError, Invocation, run};
