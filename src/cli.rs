//! Command-line interface module for organize.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing (only the first argument is consulted)
//! - Target directory resolution
//! - Running the organize pass and reporting its progress

use crate::config::RunConfig;
use crate::file_category::CategoryError;
use crate::file_organizer::{
    FileOrganizer, FileOutcome, OrganizeError, OrganizeObserver, OrganizeReport,
};
use crate::output::OutputFormatter;
use crate::path_resolver::{self, PathError};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use indicatif::ProgressBar;
use std::ffi::OsString;

/// Arguments clap parses as options. Any other first argument is a path,
/// even when it starts with `-`.
const OPTION_ARGUMENTS: [&str; 6] = ["--help", "-h", "-H", "--current", "-c", "-C"];

const AFTER_HELP: &str = "\
Files are moved into Programs, Documents, Compressed, Music, Video, Images
or Others according to their extension. Subdirectories and files without an
extension are left in place, and existing files are never overwritten.

Only use this on folders you created yourself, such as Downloads or Desktop.
Do not run it on operating system folders.";

/// Raw command-line surface.
#[derive(Parser, Debug)]
#[command(
    name = "organize",
    about = "Organizes files in the specified folder into subdirectories based on file type.",
    override_usage = "organize <FOLDER_PATH>\n       organize --current",
    disable_help_flag = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Show this help message.
    #[arg(short = 'h', visible_short_alias = 'H', long = "help", action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Organize files in the current working directory.
    #[arg(short = 'c', visible_short_alias = 'C', long = "current")]
    pub current: bool,

    /// Folder to organize. Surrounding whitespace and quotes are ignored.
    #[arg(value_name = "FOLDER_PATH")]
    pub folder: Option<OsString>,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and exit successfully.
    Help,
    /// Organize the working directory.
    CurrentDir,
    /// Organize the given (untrimmed) path.
    Path(OsString),
}

impl Invocation {
    /// Parses `args` (program name first). Anything after the first argument
    /// is ignored, and a first argument that is not one of the help or
    /// current-dir flags is taken as a path.
    ///
    /// # Errors
    ///
    /// Returns clap's error if the parser itself fails.
    pub fn parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().take(2).map(Into::into).collect();

        // `--` makes clap read names like `-downloads` as the positional.
        if let Some(first) = args.get(1)
            && !first.to_str().is_some_and(|s| OPTION_ARGUMENTS.contains(&s))
        {
            args.insert(1, OsString::from("--"));
        }

        match Cli::try_parse_from(args) {
            Ok(cli) if cli.current => Ok(Self::CurrentDir),
            Ok(cli) => Ok(cli.folder.map_or(Self::Help, Self::Path)),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Self::Help),
            Err(e) => Err(e),
        }
    }
}

/// Errors that end the program with a failure exit code.
#[derive(Debug)]
pub enum CliError {
    /// The arguments could not be parsed.
    Usage(clap::Error),
    /// The target directory is unusable.
    Path(PathError),
    /// The category table is inconsistent.
    Category(CategoryError),
    /// The organize pass could not be set up.
    Organize(OrganizeError),
    /// Writing the help text failed.
    Io(std::io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(e) => write!(f, "{}", e),
            Self::Path(e) => write!(f, "{}", e),
            Self::Category(e) => write!(f, "{}", e),
            Self::Organize(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(e) => Some(e),
            Self::Path(e) => Some(e),
            Self::Category(e) => Some(e),
            Self::Organize(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        Self::Usage(e)
    }
}

impl From<PathError> for CliError {
    fn from(e: PathError) -> Self {
        Self::Path(e)
    }
}

impl From<CategoryError> for CliError {
    fn from(e: CategoryError) -> Self {
        Self::Category(e)
    }
}

impl From<OrganizeError> for CliError {
    fn from(e: OrganizeError) -> Self {
        Self::Organize(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl CliError {
    /// Prints the error the way the user should see it.
    pub fn report(&self) {
        match self {
            Self::Usage(e) => {
                // clap renders its own message and usage line.
                let _ = e.print();
            }
            Self::Path(e) => OutputFormatter::error(&format!("Error: {}", e)),
            other => OutputFormatter::error(&format!("An unexpected error occurred: {}", other)),
        }
    }
}

/// Runs the program with the given arguments (program name first).
///
/// # Examples
///
/// ```no_run
/// use organize::cli::run;
///
/// match run(["organize", "/home/me/Downloads"]) {
///     Ok(()) => {}
///     Err(e) => e.report(),
/// }
/// ```
pub fn run<I, T>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let invocation = Invocation::parse(args)?;
    run_invocation(invocation)
}

/// Runs an already parsed invocation.
pub fn run_invocation(invocation: Invocation) -> Result<(), CliError> {
    let root = match invocation {
        Invocation::Help => {
            print_help()?;
            return Ok(());
        }
        Invocation::CurrentDir => path_resolver::resolve_current_dir()?,
        Invocation::Path(raw) => path_resolver::resolve_target(&raw)?,
    };

    let config = RunConfig::standard(root, path_resolver::resolve_self_path())?;
    organize_with_config(&config)?;
    Ok(())
}

/// Prints the usage text on stdout.
pub fn print_help() -> std::io::Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Organizes the directory described by `config`, printing progress.
///
/// This function:
/// 1. Announces the target directory
/// 2. Creates the missing category folders
/// 3. Moves every eligible file, printing one line per skipped or failed file
/// 4. Prints a summary table and a completion line
pub fn organize_with_config(config: &RunConfig) -> Result<OrganizeReport, CliError> {
    OutputFormatter::info(&format!(
        "Organizing files in '{}'...",
        config.root().display()
    ));

    let mut observer = ConsoleObserver::default();
    let result = FileOrganizer::new(config).organize(&mut observer);
    observer.finish();
    let report = result?;

    if !report.created_folders.is_empty() {
        OutputFormatter::plain(&format!(
            "Created folders: {}",
            report.created_folders.join(", ")
        ));
    }

    OutputFormatter::summary_table(&report.category_counts(), report.left_in_place());

    if report.failure_count() > 0 {
        OutputFormatter::warning("Some files could not be moved. Please review errors above.");
    }

    OutputFormatter::success("File organization complete.");
    Ok(report)
}

/// Prints per-file notices and drives the progress bar.
#[derive(Default)]
struct ConsoleObserver {
    bar: Option<ProgressBar>,
}

impl ConsoleObserver {
    fn print(&self, f: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl OrganizeObserver for ConsoleObserver {
    fn on_scan_complete(&mut self, candidates: usize) {
        self.bar = Some(OutputFormatter::create_progress_bar(candidates as u64));
    }

    fn on_outcome(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Moved {
                file_name,
                category,
            } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(format!("{} → {}/", file_name, category));
                }
            }
            FileOutcome::Collision {
                file_name,
                category,
            } => self.print(|| {
                OutputFormatter::warning(&format!(
                    "Skipping '{}': file already exists in '{}' folder.",
                    file_name, category
                ))
            }),
            FileOutcome::Failed {
                file_name, error, ..
            } => self.print(|| {
                OutputFormatter::error(&format!("Error moving file '{}': {}", file_name, error))
            }),
            FileOutcome::NoExtension { .. } | FileOutcome::SelfSkipped { .. } => {}
        }

        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}
