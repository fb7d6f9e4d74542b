use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in `fnr`.
///
/// Every variant is fatal: the run stops at the first error and no partial
/// count is reported.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while parsing a YAML settings file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The mapping input was not a JSON object of strings.
    #[error("Mapping parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// Reading or writing a selected file failed.
    #[error("File processing failed for {path}: {source}")]
    Processing {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),
}

/// A convenient type alias for `Result<T, fnr::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn processing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Processing {
            path: path.into(),
            source,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
