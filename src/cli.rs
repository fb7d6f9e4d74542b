use clap::Parser;
use std::path::PathBuf;

/// Regex find/replace across a directory tree.
///
/// Every option can also be supplied through the matching `INPUT_*`
/// environment variable, which is how GitHub Actions passes step inputs.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Regex find/replace across every matching file in a directory tree",
    long_about = "fnr - walk a directory, pick files by include/exclude regex, and rewrite their contents.

A single pair is given with --find/--replace. A batch is given with --mapping as a
JSON object of find patterns to replacement templates; --prefix and --suffix are
wrapped around every mapping key before it is compiled.

EXAMPLES:
  fnr --include '\\.rs$' --find 'foo(\\d+)' --replace 'bar$1'
  fnr --exclude '^target/' --mapping '{\"VERSION\": \"1.2.3\"}' --prefix '\\{\\{' --suffix '\\}\\}'
  INPUT_FIND=old INPUT_REPLACE=new fnr

The number of modified files is printed as:
  ::set-output name=modifiedFiles::<N>"
)]
pub struct Args {
    /// Only files whose path (relative to --dir) matches this regex are processed.
    #[arg(short, long, env = "INPUT_INCLUDE")]
    pub include: Option<String>,

    /// Files whose path (relative to --dir) matches this regex are skipped.
    #[arg(short, long, env = "INPUT_EXCLUDE")]
    pub exclude: Option<String>,

    /// The regex pattern to search for.
    #[arg(short, long, env = "INPUT_FIND")]
    pub find: Option<String>,

    /// The replacement template. Capture groups are available as `$1` or `${name}`.
    #[arg(short, long, env = "INPUT_REPLACE")]
    pub replace: Option<String>,

    /// A JSON object mapping find patterns to replacement templates.
    #[arg(short, long, env = "INPUT_MAPPING")]
    pub mapping: Option<String>,

    /// Regex text prepended to every mapping key.
    #[arg(long, env = "INPUT_PREFIX")]
    pub prefix: Option<String>,

    /// Regex text appended to every mapping key.
    #[arg(long, env = "INPUT_SUFFIX")]
    pub suffix: Option<String>,

    /// The directory to walk. Defaults to the current directory.
    #[arg(short, long, env = "INPUT_DIR")]
    pub dir: Option<PathBuf>,

    /// Path to a YAML file providing defaults for any of the options above.
    #[arg(short, long, env = "INPUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log every file that was inspected, not just the modified ones.
    #[arg(short, long, env = "INPUT_VERBOSE")]
    pub verbose: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::try_parse_from([
            "fnr", "--include", r"\.txt$", "--find", "a", "--replace", "b", "--verbose",
        ])
        .unwrap();
        assert_eq!(args.include.as_deref(), Some(r"\.txt$"));
        assert_eq!(args.find.as_deref(), Some("a"));
        assert_eq!(args.replace.as_deref(), Some("b"));
        assert!(args.verbose);
        assert!(args.mapping.is_none());
    }
}
