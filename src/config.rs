use crate::cli::Args;
use crate::errors::Result;
use crate::replacer::Rule;
use crate::walker::FileFilter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Settings as read from a YAML file.
///
/// Every field is optional; values given on the command line or through the
/// environment take precedence over the file.
///
/// ```yaml
/// include: '\.md$'
/// exclude: '^node_modules/'
/// mapping:
///   VERSION: 1.2.3
///   NAME: fnr
/// prefix: '\{\{\s*'
/// suffix: '\s*\}\}'
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Regex a relative path must match to be processed.
    #[serde(default)]
    pub include: Option<String>,
    /// Regex that removes a relative path from processing.
    #[serde(default)]
    pub exclude: Option<String>,
    /// The regex pattern to search for.
    #[serde(default)]
    pub find: Option<String>,
    /// The replacement template for `find`.
    #[serde(default)]
    pub replace: Option<String>,
    /// Find patterns mapped to replacement templates.
    #[serde(default)]
    pub mapping: Option<BTreeMap<String, String>>,
    /// Regex text prepended to every mapping key.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Regex text appended to every mapping key.
    #[serde(default)]
    pub suffix: Option<String>,
    /// The directory to walk.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// A utility for locating and loading settings files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the settings file.
    ///
    /// The search order is:
    /// 1. The path as given (absolute, or relative to the current directory).
    /// 2. A path relative to `working_dir`.
    pub fn find_config(config_path: &Path, working_dir: &Path) -> Result<PathBuf> {
        if config_path.exists() {
            return Ok(config_path.to_path_buf());
        }

        let in_working_dir = working_dir.join(config_path);
        if !config_path.is_absolute() && in_working_dir.exists() {
            return Ok(in_working_dir);
        }

        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}\n  - {}",
            config_path.display(),
            config_path.display(),
            in_working_dir.display()
        )
        .into())
    }

    /// Loads a `FileConfig` from a YAML file.
    pub fn load(path: &Path) -> Result<FileConfig> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// A fully resolved and validated invocation.
#[derive(Debug)]
pub struct Settings {
    /// The directory that is walked and that filter paths are relative to.
    pub dir: PathBuf,
    /// Decides which files are processed.
    pub filter: FileFilter,
    /// The rules to apply, in order. Each one runs over the whole file list.
    pub rules: Vec<Rule>,
}

impl Settings {
    /// Merges command-line/environment values with the optional settings file
    /// and compiles every pattern.
    ///
    /// A mapping, when present, replaces the single `find`/`replace` pair.
    /// Without a mapping a `find` pattern is required unless the replacement
    /// is empty too, which makes the pair a no-op.
    pub fn resolve(args: Args) -> Result<Self> {
        let arg_dir = args.dir.clone();
        let file = match &args.config {
            Some(path) => {
                let working_dir = arg_dir.clone().unwrap_or_else(|| PathBuf::from("."));
                let resolved = ConfigLoader::find_config(path, &working_dir)?;
                tracing::info!("Using config file: {}", resolved.display());
                ConfigLoader::load(&resolved)?
            }
            None => FileConfig::default(),
        };

        let include = pick(args.include, file.include);
        let exclude = pick(args.exclude, file.exclude);
        let filter = FileFilter::new(include.as_deref(), exclude.as_deref())?;

        let mapping = match non_empty(args.mapping) {
            Some(json) => {
                tracing::info!("Replacing according to mapping {json}");
                Some(parse_mapping(&json)?)
            }
            None => file.mapping,
        };

        let rules = match mapping {
            Some(mapping) => {
                let prefix = pick(args.prefix, file.prefix).unwrap_or_default();
                let suffix = pick(args.suffix, file.suffix).unwrap_or_default();
                mapping_rules(&mapping, &prefix, &suffix)?
            }
            None => {
                // Empty replacement deletes matches; not run through `pick`.
                let replace = args.replace.or(file.replace).unwrap_or_default();
                let find = match pick(args.find, file.find) {
                    Some(find) => find,
                    // Empty find with empty replace is an identical pair.
                    None if replace.is_empty() => String::new(),
                    None => return Err("Specify a find pattern or a mapping".into()),
                };
                vec![Rule::new(&find, &replace)?]
            }
        };

        let dir = arg_dir
            .or(file.dir)
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { dir, filter, rules })
    }
}

/// Parses a JSON object of find patterns to replacement templates.
pub fn parse_mapping(json: &str) -> Result<BTreeMap<String, String>> {
    Ok(serde_json::from_str(json)?)
}

/// Builds one rule per mapping entry, wrapping each key in `prefix`/`suffix`.
pub fn mapping_rules(
    mapping: &BTreeMap<String, String>,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<Rule>> {
    mapping
        .iter()
        .map(|(key, value)| Rule::new(&format!("{prefix}{key}{suffix}"), value))
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    non_empty(primary).or_else(|| non_empty(fallback))
}
