//! Resolution of the target directory and of the running executable.
//!
//! The command-line argument may arrive padded with whitespace or wrapped in
//! quotes (typically when a path is pasted from a file manager). It is
//! trimmed, validated and canonicalized before anything touches the disk.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

/// Arguments that select the current working directory.
pub const CURRENT_DIR_FLAGS: [&str; 3] = ["--current", "-c", "-C"];

const WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\x0c', '\x0b'];
const QUOTES: [char; 2] = ['"', '\''];

/// Errors raised while resolving the target directory.
#[derive(Debug)]
pub enum PathError {
    /// Nothing exists at the given path.
    PathNotFound(PathBuf),
    /// The path exists but is not a directory.
    NotADirectory(PathBuf),
    /// The working directory could not be determined.
    CurrentDirUnavailable(io::Error),
    /// Any other I/O failure while inspecting the path.
    Io { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound(path) => {
                write!(f, "The specified path does not exist: '{}'", path.display())
            }
            Self::NotADirectory(path) => {
                write!(
                    f,
                    "The specified path is not a directory: '{}'",
                    path.display()
                )
            }
            Self::CurrentDirUnavailable(source) => {
                write!(f, "Could not determine the current directory: {}", source)
            }
            Self::Io { path, source } => {
                write!(f, "Could not access '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CurrentDirUnavailable(source) | Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Strips surrounding whitespace, then surrounding quote characters.
///
/// ```
/// use organize::path_resolver::trim_argument;
///
/// assert_eq!(trim_argument("  \"/home/me/Downloads\"  "), "/home/me/Downloads");
/// assert_eq!(trim_argument("'C:\\Users\\me'"), "C:\\Users\\me");
/// ```
pub fn trim_argument(raw: &str) -> &str {
    raw.trim_matches(WHITESPACE).trim_matches(QUOTES)
}

/// [`trim_argument`] for arguments that may not be valid UTF-8.
///
/// On Unix the trim runs over the raw bytes, so a name such as `caf\xe9`
/// keeps its exact encoding. Elsewhere a non-UTF-8 argument is returned as is.
pub fn trim_os_argument(raw: &OsStr) -> &OsStr {
    match raw.to_str() {
        Some(s) => OsStr::new(trim_argument(s)),
        None => trim_os_bytes(raw),
    }
}

#[cfg(unix)]
fn trim_os_bytes(raw: &OsStr) -> &OsStr {
    use std::os::unix::ffi::OsStrExt;

    let is_space = |b: u8| WHITESPACE.contains(&char::from(b));
    let is_quote = |b: u8| QUOTES.contains(&char::from(b));
    OsStr::from_bytes(trim_bytes(trim_bytes(raw.as_bytes(), is_space), is_quote))
}

#[cfg(not(unix))]
fn trim_os_bytes(raw: &OsStr) -> &OsStr {
    raw
}

#[cfg(unix)]
fn trim_bytes(bytes: &[u8], strip: impl Fn(u8) -> bool) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !strip(b))
        .unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !strip(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Returns true if `arg` selects the current working directory.
pub fn is_current_dir_flag(arg: &str) -> bool {
    CURRENT_DIR_FLAGS.contains(&arg)
}

/// Resolves a raw command-line argument to a canonical directory.
///
/// The argument is trimmed first; a current-directory flag that survives
/// trimming selects the working directory.
///
/// # Errors
///
/// Returns [`PathError::PathNotFound`] or [`PathError::NotADirectory`] when
/// the trimmed path is unusable.
pub fn resolve_target(raw: impl AsRef<OsStr>) -> Result<PathBuf, PathError> {
    let trimmed = trim_os_argument(raw.as_ref());
    if trimmed.to_str().is_some_and(is_current_dir_flag) {
        return resolve_current_dir();
    }
    validate_directory(Path::new(trimmed))
}

/// Returns the canonical working directory of the process.
pub fn resolve_current_dir() -> Result<PathBuf, PathError> {
    let cwd = std::env::current_dir().map_err(PathError::CurrentDirUnavailable)?;
    validate_directory(&cwd)
}

/// Checks that `path` is an existing directory and canonicalizes it.
pub fn validate_directory(path: &Path) -> Result<PathBuf, PathError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PathError::PathNotFound(path.to_path_buf()),
        _ => PathError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }

    path.canonicalize().map_err(|e| PathError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Canonical path of the running executable, if the platform reports one.
pub fn resolve_self_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.canonicalize().unwrap_or(exe))
}
