//! Reporting the result to the hosting automation environment.

use crate::errors::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// The name under which the modified-file count is published.
pub const MODIFIED_FILES: &str = "modifiedFiles";

/// Formats a GitHub Actions `set-output` workflow command.
pub fn format_output(name: &str, value: usize) -> String {
    format!("::set-output name={name}::{value}")
}

/// Appends `name=value` to the file named by `GITHUB_OUTPUT`.
pub fn append_output_file(path: &Path, name: &str, value: usize) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{name}={value}")?;
    Ok(())
}

/// Prints the count on stdout and, when running under an Actions runner that
/// provides `GITHUB_OUTPUT`, records it there as well.
pub fn emit(value: usize) -> Result<()> {
    println!("{}", format_output(MODIFIED_FILES, value));
    if let Some(path) = std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        append_output_file(Path::new(&path), MODIFIED_FILES, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format() {
        assert_eq!(format_output(MODIFIED_FILES, 3), "::set-output name=modifiedFiles::3");
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("output");
        fs::write(&path, "other=1\n").unwrap();

        append_output_file(&path, MODIFIED_FILES, 0).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "other=1\nmodifiedFiles=0\n");
    }
}
