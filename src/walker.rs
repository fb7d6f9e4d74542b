use crate::errors::Result;
use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Decides which files take part in a run.
///
/// Paths are matched relative to the walk root, with `/` as the separator,
/// so `^src/` selects everything under `<root>/src`.
#[derive(Debug)]
pub struct FileFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl FileFilter {
    /// Compiles the include and exclude patterns.
    ///
    /// A missing or empty include pattern selects every file; a missing or
    /// empty exclude pattern excludes nothing.
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self> {
        let compile = |pattern: Option<&str>| -> Result<Option<Regex>> {
            match pattern {
                Some(p) if !p.is_empty() => Ok(Some(Regex::new(p)?)),
                _ => Ok(None),
            }
        };
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Returns `true` if the include pattern matches and the exclude pattern does not.
    pub fn matches(&self, relative_path: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|re| re.is_match(relative_path));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|re| re.is_match(relative_path));
        included && !excluded
    }
}

/// Lists every file under `root` accepted by `filter`, in file-name order.
///
/// Hidden and git-ignored files are visited like any other file; only the
/// filter decides. Directories are never returned. Any traversal error aborts
/// the listing.
pub fn list_files(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    for entry in walker.build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = relative_path(root, path);
        if filter.matches(&relative) {
            files.push(path.to_path_buf());
        } else {
            tracing::trace!("Skipping {relative}");
        }
    }

    Ok(files)
}

/// Renders `path` relative to `root` with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("README.md"), "readme").unwrap();
        fs::write(root.join("src/main.rs"), "main").unwrap();
        fs::write(root.join("src/nested/lib.rs"), "lib").unwrap();
        fs::write(root.join(".git/config"), "git").unwrap();
        temp_dir
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files.iter().map(|p| relative_path(root, p)).collect()
    }

    #[test]
    fn test_filter_semantics() {
        let filter = FileFilter::new(Some(r"\.rs$"), Some("^target/")).unwrap();
        assert!(filter.matches("src/main.rs"));
        assert!(!filter.matches("target/debug/build.rs"));
        assert!(!filter.matches("README.md"));

        let everything = FileFilter::new(None, Some("")).unwrap();
        assert!(everything.matches("anything/at/all"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileFilter::new(Some("["), None).is_err());
        assert!(FileFilter::new(None, Some("(")).is_err());
    }

    #[test]
    fn test_lists_all_files_including_hidden() {
        let temp_dir = tree();
        let filter = FileFilter::new(None, None).unwrap();
        let files = list_files(temp_dir.path(), &filter).unwrap();
        assert_eq!(
            names(temp_dir.path(), &files),
            vec![".git/config", "README.md", "src/main.rs", "src/nested/lib.rs"]
        );
    }

    #[test]
    fn test_include_and_exclude_use_relative_paths() {
        let temp_dir = tree();
        let filter = FileFilter::new(Some(r"^src/"), Some(r"nested/")).unwrap();
        let files = list_files(temp_dir.path(), &filter).unwrap();
        assert_eq!(names(temp_dir.path(), &files), vec!["src/main.rs"]);
    }

    #[test]
    fn test_gitignore_is_not_honoured() {
        let temp_dir = tree();
        fs::write(temp_dir.path().join(".gitignore"), "*.md\n").unwrap();
        let filter = FileFilter::new(Some(r"\.md$"), None).unwrap();
        let files = list_files(temp_dir.path(), &filter).unwrap();
        assert_eq!(names(temp_dir.path(), &files), vec!["README.md"]);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let filter = FileFilter::new(None, None).unwrap();
        assert!(list_files(temp_dir.path(), &filter).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let filter = FileFilter::new(None, None).unwrap();
        assert!(list_files(&temp_dir.path().join("absent"), &filter).is_err());
    }
}
