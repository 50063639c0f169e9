/// File organization: category folder creation and the single move pass.
///
/// The pass reads the immediate children of the target root once and moves
/// every regular file with an extension into `<root>/<category>/`. Setup
/// failures (a category folder that cannot be created, an unreadable root)
/// abort the run; failures on a single file are recorded and the pass moves
/// on to the next one.
use crate::config::RunConfig;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during file organization.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Something other than a directory occupies a category path.
    CategoryPathNotDirectory { path: PathBuf },
    /// Failed to list the target directory.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Error creating directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::CategoryPathNotDirectory { path } => {
                write!(
                    f,
                    "Cannot use {} as a category folder: it is not a directory",
                    path.display()
                )
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Error reading directory {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What happened to one file of the target directory.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file now lives in its category folder.
    Moved { file_name: String, category: String },
    /// A file with the same name already exists in the category folder.
    Collision { file_name: String, category: String },
    /// The file has no extension and stays where it is.
    NoExtension { file_name: String },
    /// The file is the running executable.
    SelfSkipped { file_name: String },
    /// The move itself failed.
    Failed {
        file_name: String,
        category: String,
        error: OrganizeError,
    },
}

impl FileOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Moved { file_name, .. }
            | Self::Collision { file_name, .. }
            | Self::NoExtension { file_name }
            | Self::SelfSkipped { file_name }
            | Self::Failed { file_name, .. } => file_name,
        }
    }
}

/// Receives progress from [`FileOrganizer::organize`].
pub trait OrganizeObserver {
    /// Called once the target directory has been read.
    fn on_scan_complete(&mut self, _candidates: usize) {}

    /// Called after each regular file has been handled.
    fn on_outcome(&mut self, _outcome: &FileOutcome) {}
}

impl OrganizeObserver for () {}

/// Summary of one organize pass.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Category folders that did not exist before the pass.
    pub created_folders: Vec<String>,
    /// Outcomes in the order the files were handled.
    pub outcomes: Vec<FileOutcome>,
}

impl OrganizeReport {
    pub fn moved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Moved { .. }))
            .count()
    }

    pub fn collision_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Collision { .. }))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }

    /// Files that were looked at and left at the root.
    pub fn left_in_place(&self) -> usize {
        self.outcomes.len() - self.moved_count()
    }

    /// Number of moved files per category.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for outcome in &self.outcomes {
            if let FileOutcome::Moved { category, .. } = outcome {
                *counts.entry(category.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Moves the files of one directory into category subdirectories.
pub struct FileOrganizer<'a> {
    config: &'a RunConfig,
}

impl<'a> FileOrganizer<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Creates every missing category folder under the root.
    ///
    /// Returns the names of the folders that were created. Existing folders
    /// are left alone, including symlinks that point at a directory.
    ///
    /// # Errors
    ///
    /// The first folder that cannot be created aborts the whole run, since
    /// the move pass relies on every destination existing.
    pub fn ensure_folders(&self) -> OrganizeResult<Vec<String>> {
        let mut created = Vec::new();

        for name in self.config.category_names() {
            let category_path = self.config.root().join(name);

            match fs::metadata(&category_path) {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(_) => {
                    return Err(OrganizeError::CategoryPathNotDirectory {
                        path: category_path,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(OrganizeError::DirectoryCreationFailed {
                        path: category_path,
                        source: e,
                    });
                }
            }

            fs::create_dir(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: category_path.clone(),
                source: e,
            })?;
            created.push(name.clone());
        }

        Ok(created)
    }

    /// Runs the whole pass: folders first, then one sweep over the root.
    ///
    /// # Errors
    ///
    /// Only setup failures are returned as errors. Per-file problems end up
    /// in the report as [`FileOutcome::Collision`] or [`FileOutcome::Failed`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use organize::config::RunConfig;
    /// use organize::file_organizer::FileOrganizer;
    /// use std::path::PathBuf;
    ///
    /// let config = RunConfig::standard(PathBuf::from("/home/me/Downloads"), None).unwrap();
    /// let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();
    /// println!("Moved {} files", report.moved_count());
    /// ```
    pub fn organize(&self, observer: &mut dyn OrganizeObserver) -> OrganizeResult<OrganizeReport> {
        let created_folders = self.ensure_folders()?;

        let root = self.config.root();
        let entries = fs::read_dir(root).map_err(|e| OrganizeError::ReadDirFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        // Symlinks report their own type here and are skipped with the other
        // non-regular entries.
        let candidates: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();

        observer.on_scan_complete(candidates.len());

        let mut report = OrganizeReport {
            created_folders,
            outcomes: Vec::with_capacity(candidates.len()),
        };

        for path in &candidates {
            let outcome = self.organize_file(path);
            observer.on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Handles a single regular file of the root.
    fn organize_file(&self, file_path: &Path) -> FileOutcome {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let canonical = fs::canonicalize(file_path).unwrap_or_else(|_| file_path.to_path_buf());
        if self.config.is_self(&canonical) {
            return FileOutcome::SelfSkipped { file_name };
        }

        let Some(category) = self.config.index().categorize(file_path) else {
            return FileOutcome::NoExtension { file_name };
        };
        let category = category.to_string();

        let destination = self.config.root().join(&category).join(&file_name);
        if fs::symlink_metadata(&destination).is_ok() {
            return FileOutcome::Collision {
                file_name,
                category,
            };
        }

        match Self::move_file(file_path, &destination) {
            Ok(()) => FileOutcome::Moved {
                file_name,
                category,
            },
            Err(error) => FileOutcome::Failed {
                file_name,
                category,
                error,
            },
        }
    }

    fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
        fs::rename(source, destination).map_err(|e| OrganizeError::FileMoveFailure {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::{Category, CategoryTable};
    use tempfile::TempDir;

    fn config_for(temp_dir: &TempDir) -> RunConfig {
        let root = temp_dir.path().canonicalize().expect("Failed to canonicalize");
        RunConfig::standard(root, None).expect("standard config")
    }

    #[derive(Default)]
    struct Recorder {
        candidates: Option<usize>,
        seen: Vec<String>,
    }

    impl OrganizeObserver for Recorder {
        fn on_scan_complete(&mut self, candidates: usize) {
            self.candidates = Some(candidates);
        }

        fn on_outcome(&mut self, outcome: &FileOutcome) {
            self.seen.push(outcome.file_name().to_string());
        }
    }

    #[test]
    fn test_ensure_folders_creates_all_categories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = config_for(&temp_dir);

        let created = FileOrganizer::new(&config)
            .ensure_folders()
            .expect("Failed to create folders");

        assert_eq!(created.len(), 7);
        for name in config.category_names() {
            assert!(temp_dir.path().join(name).is_dir(), "{} missing", name);
        }
    }

    #[test]
    fn test_ensure_folders_keeps_existing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let music = temp_dir.path().join("Music");
        fs::create_dir(&music).unwrap();
        fs::write(music.join("kept.mp3"), "data").unwrap();
        let config = config_for(&temp_dir);

        let created = FileOrganizer::new(&config).ensure_folders().unwrap();

        assert_eq!(created.len(), 6);
        assert!(!created.iter().any(|name| name == "Music"));
        assert!(music.join("kept.mp3").exists());

        let again = FileOrganizer::new(&config).ensure_folders().unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_ensure_folders_rejects_file_in_the_way() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("Video"), "not a folder").unwrap();
        let config = config_for(&temp_dir);

        let result = FileOrganizer::new(&config).ensure_folders();
        assert!(matches!(
            result,
            Err(OrganizeError::CategoryPathNotDirectory { .. })
        ));
    }

    #[test]
    fn test_organize_moves_by_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("report.PDF"), "pdf").unwrap();
        fs::write(base.join("song.mp3"), "mp3").unwrap();
        fs::write(base.join("tool.exe"), "exe").unwrap();
        fs::write(base.join("notes"), "plain").unwrap();
        let config = config_for(&temp_dir);

        let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert!(base.join("Documents/report.PDF").is_file());
        assert!(base.join("Music/song.mp3").is_file());
        assert!(base.join("Programs/tool.exe").is_file());
        assert!(base.join("notes").is_file());
        assert_eq!(report.moved_count(), 3);
        assert_eq!(report.left_in_place(), 1);
        assert_eq!(report.category_counts().get("Music"), Some(&1));
    }

    #[test]
    fn test_organize_skips_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Documents")).unwrap();
        fs::write(base.join("Documents/report.pdf"), "old").unwrap();
        fs::write(base.join("report.pdf"), "new").unwrap();
        let config = config_for(&temp_dir);

        let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert_eq!(report.collision_count(), 1);
        assert_eq!(
            fs::read_to_string(base.join("Documents/report.pdf")).unwrap(),
            "old"
        );
        assert_eq!(fs::read_to_string(base.join("report.pdf")).unwrap(), "new");
        match &report.outcomes[0] {
            FileOutcome::Collision {
                file_name,
                category,
            } => {
                assert_eq!(file_name, "report.pdf");
                assert_eq!(category, "Documents");
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_organize_skips_self() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().canonicalize().unwrap();
        let exe = root.join("organize.exe");
        fs::write(&exe, "binary").unwrap();
        let config = RunConfig::standard(root.clone(), Some(exe.clone())).unwrap();

        let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert!(exe.is_file());
        assert!(!root.join("Programs/organize.exe").exists());
        assert!(matches!(
            report.outcomes[0],
            FileOutcome::SelfSkipped { .. }
        ));
    }

    #[test]
    fn test_organize_leaves_subdirectories_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("projects.zip")).unwrap();
        fs::write(base.join("projects.zip/inner.txt"), "data").unwrap();
        let config = config_for(&temp_dir);

        let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert!(report.outcomes.is_empty());
        assert!(base.join("projects.zip/inner.txt").is_file());
        assert!(!base.join("Documents/inner.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_organize_skips_symlinks() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("target.txt"), "data").unwrap();
        std::os::unix::fs::symlink(base.join("target.txt"), base.join("link.txt")).unwrap();
        let config = config_for(&temp_dir);

        let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert!(base.join("Documents/target.txt").is_file());
        assert!(fs::symlink_metadata(base.join("link.txt")).is_ok());
    }

    #[test]
    fn test_organize_reports_to_observer() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.png"), "a").unwrap();
        fs::write(base.join("b.xyz"), "b").unwrap();
        let config = config_for(&temp_dir);

        let mut recorder = Recorder::default();
        let report = FileOrganizer::new(&config).organize(&mut recorder).unwrap();

        assert_eq!(recorder.candidates, Some(2));
        assert_eq!(recorder.seen.len(), 2);
        assert!(base.join("Images/a.png").is_file());
        assert!(base.join("Others/b.xyz").is_file());
        assert_eq!(report.created_folders.len(), 7);
    }

    #[test]
    fn test_organize_with_alternate_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("main.rs"), "fn main() {}").unwrap();
        fs::write(base.join("photo.png"), "png").unwrap();
        let table = CategoryTable::new(vec![Category::new("Code", &[".rs"])], "Misc").unwrap();
        let config = RunConfig::new(base.canonicalize().unwrap(), None, &table).unwrap();

        FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert!(base.join("Code/main.rs").is_file());
        assert!(base.join("Misc/photo.png").is_file());
        assert!(!base.join("Images").exists());
    }

    #[test]
    fn test_organize_missing_root_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("gone");
        let config = RunConfig::standard(missing, None).unwrap();

        let result = FileOrganizer::new(&config).organize(&mut ());
        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
    }

    #[test]
    fn test_move_failure_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("absent.txt");
        let destination = temp_dir.path().join("Documents/absent.txt");

        let err = FileOrganizer::move_file(&source, &destination).unwrap_err();
        assert!(err.to_string().starts_with("Failed to move"));
    }

    /// Removes one scanned file before the move pass starts.
    struct RemoveAfterScan {
        victim: PathBuf,
        failed: Vec<String>,
    }

    impl OrganizeObserver for RemoveAfterScan {
        fn on_scan_complete(&mut self, _candidates: usize) {
            fs::remove_file(&self.victim).expect("Failed to remove scanned file");
        }

        fn on_outcome(&mut self, outcome: &FileOutcome) {
            if let FileOutcome::Failed { file_name, .. } = outcome {
                self.failed.push(file_name.clone());
            }
        }
    }

    #[test]
    fn test_failed_move_does_not_abort_pass() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("report.pdf"), "pdf").unwrap();
        fs::write(base.join("photo.png"), "png").unwrap();
        let config = config_for(&temp_dir);

        let mut observer = RemoveAfterScan {
            victim: base.join("report.pdf"),
            failed: Vec::new(),
        };
        let report = FileOrganizer::new(&config)
            .organize(&mut observer)
            .expect("a failed move must not fail the pass");

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.moved_count(), 1);
        assert!(report.outcomes.iter().any(|o| matches!(
            o,
            FileOutcome::Failed { file_name, category, .. }
                if file_name == "report.pdf" && category == "Documents"
        )));
        assert_eq!(observer.failed, vec!["report.pdf".to_string()]);
        assert!(base.join("Images/photo.png").is_file());
        assert!(!base.join("Documents/report.pdf").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_category_folder_is_used() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let media = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        std::os::unix::fs::symlink(media.path(), base.join("Music")).unwrap();
        fs::write(base.join("song.mp3"), "mp3").unwrap();
        let config = config_for(&temp_dir);

        let report = FileOrganizer::new(&config).organize(&mut ()).unwrap();

        assert!(!report.created_folders.contains(&"Music".to_string()));
        assert_eq!(report.moved_count(), 1);
        assert!(media.path().join("song.mp3").is_file());
        assert!(fs::symlink_metadata(base.join("Music")).unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_file_in_category_path_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("notes"), "not a folder").unwrap();
        std::os::unix::fs::symlink(base.join("notes"), base.join("Video")).unwrap();
        let config = config_for(&temp_dir);

        let result = FileOrganizer::new(&config).organize(&mut ());
        assert!(matches!(
            result,
            Err(OrganizeError::CategoryPathNotDirectory { .. })
        ));
    }
}
