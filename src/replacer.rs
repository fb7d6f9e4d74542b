use crate::errors::{Error, Result};
use regex::bytes::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A single find/replace pair.
///
/// The pattern is compiled as a bytes regex so files that are not valid UTF-8
/// are still processed. A rule whose find and replace strings are identical is
/// a no-op and is never compiled.
#[derive(Debug)]
pub struct Rule {
    find: String,
    replace: String,
    regex: Option<Regex>,
}

impl Rule {
    /// Creates a rule, compiling `find` unless the rule is a no-op.
    pub fn new(find: &str, replace: &str) -> Result<Self> {
        let regex = if find == replace {
            None
        } else {
            Some(Regex::new(find)?)
        };
        Ok(Self {
            find: find.to_string(),
            replace: replace.to_string(),
            regex,
        })
    }

    /// The regex source this rule searches for.
    pub fn find(&self) -> &str {
        &self.find
    }

    /// The replacement template.
    pub fn replace(&self) -> &str {
        &self.replace
    }

    /// Returns `true` if find and replace are identical.
    pub fn is_noop(&self) -> bool {
        self.regex.is_none()
    }

    /// Applies the rule to `content`, returning `None` if nothing changed.
    pub fn apply(&self, content: &[u8]) -> Option<Vec<u8>> {
        let regex = self.regex.as_ref()?;
        let replaced = regex.replace_all(content, self.replace.as_bytes());
        if replaced.as_ref() == content {
            None
        } else {
            Some(replaced.into_owned())
        }
    }
}

/// Counts produced by a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of files each rule was applied to.
    pub files: usize,
    /// Files modified by each rule, in rule order.
    pub per_rule: Vec<usize>,
}

impl RunSummary {
    /// Total modifications; a file changed by two rules counts twice.
    pub fn modified(&self) -> usize {
        self.per_rule.iter().sum()
    }
}

/// Applies a list of rules to a list of files, one rule at a time.
pub struct Replacer {
    rules: Vec<Rule>,
}

impl Replacer {
    /// Creates a new `Replacer` for the given rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Applies one rule to a single file.
    ///
    /// The whole file is read, every match is replaced, and the file is
    /// rewritten atomically only if its content changed.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the file was rewritten.
    pub fn process_file(rule: &Rule, path: &Path) -> Result<bool> {
        if rule.is_noop() {
            return Ok(false);
        }

        let content = fs::read(path).map_err(|e| Error::processing(path, e))?;
        match rule.apply(&content) {
            Some(new_content) => {
                write_atomic(path, &new_content)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Applies one rule to every file and returns how many were modified.
    pub fn apply_rule(rule: &Rule, files: &[PathBuf]) -> Result<usize> {
        if rule.is_noop() {
            tracing::info!("Skipping {}: find and replace are identical", rule.find());
            return Ok(0);
        }

        tracing::info!("Replacing {} with {}", rule.find(), rule.replace());
        let mut modified = 0;
        for path in files {
            if Self::process_file(rule, path)? {
                modified += 1;
                tracing::info!(
                    "Replaced {} with {} in {}",
                    rule.find(),
                    rule.replace(),
                    path.display()
                );
            } else {
                tracing::debug!("No match for {} in {}", rule.find(), path.display());
            }
        }
        Ok(modified)
    }

    /// Applies every rule, in order, across the same file list.
    ///
    /// Stops at the first error.
    pub fn run(&self, files: &[PathBuf]) -> Result<RunSummary> {
        let mut summary = RunSummary {
            files: files.len(),
            per_rule: Vec::with_capacity(self.rules.len()),
        };
        for rule in &self.rules {
            summary.per_rule.push(Self::apply_rule(rule, files)?);
        }
        Ok(summary)
    }
}

/// Replaces the file at `path` with `content` via a temporary file in the same
/// directory, keeping the original permissions.
///
/// Symlinks are resolved first so the link's target is rewritten and the link
/// itself stays in place.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let target = fs::canonicalize(path).map_err(|e| Error::processing(path, e))?;
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => return Err(format!("Could not get parent directory for {}", path.display()).into()),
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| Error::processing(path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::processing(path, e))?;

    let perms = fs::metadata(&target)
        .map_err(|e| Error::processing(path, e))?
        .permissions();
    fs::set_permissions(temp_file.path(), perms).map_err(|e| Error::processing(path, e))?;

    temp_file.persist(&target)?;
    Ok(())
}
