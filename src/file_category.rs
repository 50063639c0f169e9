/// Category table and extension index.
///
/// A [`CategoryTable`] lists the destination folders and the extensions each
/// one collects. It is flattened once per run into an [`ExtensionIndex`] that
/// answers case-insensitive lookups in constant time.
///
/// # Examples
///
/// ```
/// use organize::file_category::CategoryTable;
///
/// let index = CategoryTable::standard().build_index().unwrap();
/// assert_eq!(index.category_for(".pdf"), "Documents");
/// assert_eq!(index.category_for(".MP3"), "Music");
/// assert_eq!(index.category_for(".xyz"), "Others");
/// ```
use std::collections::HashMap;
use std::path::Path;

/// Name of the catch-all category used by the standard table.
pub const CATCH_ALL: &str = "Others";

/// Errors raised while building a category table or its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Two categories share the same name.
    DuplicateCategory(String),
    /// The same extension is declared by two categories.
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },
    /// An extension is empty once normalized.
    InvalidExtension { category: String, extension: String },
    /// The catch-all category declares extensions of its own.
    CatchAllHasExtensions(String),
}

impl std::fmt::Display for CategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCategory(name) => write!(f, "Category '{}' is declared twice", name),
            Self::DuplicateExtension {
                extension,
                first,
                second,
            } => write!(
                f,
                "Extension '{}' is declared by both '{}' and '{}'",
                extension, first, second
            ),
            Self::InvalidExtension {
                category,
                extension,
            } => write!(
                f,
                "Invalid extension '{}' in category '{}'",
                extension, category
            ),
            Self::CatchAllHasExtensions(name) => {
                write!(f, "Catch-all category '{}' must not declare extensions", name)
            }
        }
    }
}

impl std::error::Error for CategoryError {}

/// A destination folder and the extensions it collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category. Extensions are stored as given; they are
    /// normalized when the index is built.
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

/// Ordered set of categories plus the name of the catch-all.
///
/// The order of the categories is the order in which their folders are
/// created.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    catch_all: String,
}

impl CategoryTable {
    /// Builds a validated table.
    ///
    /// The catch-all is appended with no extensions when `categories` does not
    /// already contain it.
    ///
    /// # Errors
    ///
    /// Returns an error if two categories share a name or if the catch-all
    /// declares extensions. Duplicate extensions are detected by
    /// [`CategoryTable::build_index`].
    pub fn new(
        mut categories: Vec<Category>,
        catch_all: impl Into<String>,
    ) -> Result<Self, CategoryError> {
        let catch_all = catch_all.into();

        for (i, category) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.name == category.name) {
                return Err(CategoryError::DuplicateCategory(category.name.clone()));
            }
        }

        match categories.iter().position(|c| c.name == catch_all) {
            Some(i) if !categories[i].extensions.is_empty() => {
                return Err(CategoryError::CatchAllHasExtensions(catch_all));
            }
            Some(_) => {}
            None => categories.push(Category::new(catch_all.clone(), &[])),
        }

        Ok(Self {
            categories,
            catch_all,
        })
    }

    /// The built-in table: seven folders, `Others` last.
    pub fn standard() -> Self {
        let categories = vec![
            Category::new(
                "Programs",
                &[
                    ".exe", ".msi", ".bat", ".sh", ".apk", ".app", ".jar", ".cmd", ".gadget",
                    ".wsf", ".deb", ".rpm", ".bin", ".com", ".vbs", ".ps1",
                ],
            ),
            Category::new(
                "Documents",
                &[
                    ".pdf", ".doc", ".docx", ".txt", ".ppt", ".pptx", ".xls", ".xlsx", ".odt",
                    ".csv", ".rtf", ".tex", ".epub", ".md", ".log", ".json", ".xml", ".yaml",
                    ".yml", ".ini",
                ],
            ),
            Category::new(
                "Compressed",
                &[
                    ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso", ".cab", ".arj",
                    ".lzh", ".ace", ".uue", ".tar.gz", ".tar.bz2", ".tar.xz",
                ],
            ),
            Category::new(
                "Music",
                &[
                    ".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a", ".wma", ".alac", ".amr",
                    ".aiff", ".opus", ".mid", ".midi",
                ],
            ),
            Category::new(
                "Video",
                &[
                    ".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm", ".mpeg", ".mpg",
                    ".m4v", ".3gp", ".3g2", ".vob", ".ogv", ".rm", ".rmvb", ".ts", ".m2ts",
                ],
            ),
            Category::new(
                "Images",
                &[
                    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".tif", ".webp", ".svg",
                    ".ico", ".heic", ".raw", ".psd", ".ai", ".indd", ".eps", ".jfif", ".apng",
                    ".avif", ".cr2", ".nef", ".orf", ".sr2",
                ],
            ),
            Category::new(CATCH_ALL, &[]),
        ];

        Self {
            categories,
            catch_all: CATCH_ALL.to_string(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in folder-creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn catch_all(&self) -> &str {
        &self.catch_all
    }

    /// Flattens the table into an extension index.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::DuplicateExtension`] if two categories claim
    /// the same extension (compared case-insensitively), and
    /// [`CategoryError::InvalidExtension`] for empty extensions.
    pub fn build_index(&self) -> Result<ExtensionIndex, CategoryError> {
        let mut map: HashMap<String, String> = HashMap::new();

        for category in &self.categories {
            for ext in &category.extensions {
                let key = normalize_extension(ext);
                if key.len() < 2 {
                    return Err(CategoryError::InvalidExtension {
                        category: category.name.clone(),
                        extension: ext.clone(),
                    });
                }
                if let Some(first) = map.get(&key)
                    && *first != category.name
                {
                    return Err(CategoryError::DuplicateExtension {
                        extension: key,
                        first: first.clone(),
                        second: category.name.clone(),
                    });
                }
                map.insert(key, category.name.clone());
            }
        }

        Ok(ExtensionIndex {
            map,
            catch_all: self.catch_all.clone(),
        })
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercases an extension and makes sure it starts with a single `.`.
///
/// ```
/// use organize::file_category::normalize_extension;
///
/// assert_eq!(normalize_extension(".PDF"), ".pdf");
/// assert_eq!(normalize_extension("Mp3"), ".mp3");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

/// Lookup from lowercased extension to category name.
#[derive(Debug, Clone)]
pub struct ExtensionIndex {
    map: HashMap<String, String>,
    catch_all: String,
}

impl ExtensionIndex {
    /// Returns the category for an extension, with or without its leading
    /// `.`, in any letter case. Unknown extensions go to the catch-all.
    pub fn category_for(&self, ext: &str) -> &str {
        self.map
            .get(&normalize_extension(ext))
            .map(String::as_str)
            .unwrap_or(self.catch_all.as_str())
    }

    /// Returns the category for a file, or `None` if its name has no
    /// extension. Only the final extension is considered; a name ending in a
    /// bare `.` goes to the catch-all.
    pub fn categorize(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_string_lossy();
        if ext.is_empty() {
            return Some(self.catch_all.as_str());
        }
        Some(self.category_for(&ext))
    }

    pub fn catch_all(&self) -> &str {
        &self.catch_all
    }

    /// Number of indexed extensions.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
