//! hunkview - inspect git diffs as structured hunks.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use hunkview::core::{
    diff_report, list_refs, open_in_editor, DiffOptions, DiffSource, RelPath, RepoRoot,
    RepoWatcher, WatchEvent,
};
use hunkview::highlight::HighlighterCache;
use hunkview::render::{render_html, render_text};

/// Inspect git diffs as structured hunks.
#[derive(Parser, Debug)]
#[command(name = "hunkview", version, about)]
struct Cli {
    /// Revision or range (e.g. HEAD~3, abc123..def456, origin/main)
    #[arg(value_name = "REV")]
    revision: Option<String>,

    /// Compare staged (index) changes instead of the working tree
    #[arg(long)]
    staged: bool,

    /// Target ref for working-tree and staged comparisons
    #[arg(long, default_value = "HEAD")]
    target: String,

    /// Context lines around each hunk
    #[arg(short = 'U', long = "context", default_value_t = 3)]
    context: u32,

    /// Include untracked files, diffed against /dev/null
    #[arg(short = 'u', long)]
    untracked: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// List branches and recent commits as JSON, then exit
    #[arg(long)]
    refs: bool,

    /// Open a repository file in $HUNKVIEW_EDITOR/$VISUAL/$EDITOR, then exit
    #[arg(long, value_name = "FILE[:LINE]")]
    open: Option<String>,

    /// Keep running and re-emit the report when files change
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

fn main() -> ExitCode {
    hunkview::metrics::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let repo = RepoRoot::discover(&cwd).context("Not inside a git repository")?;

    if cli.refs {
        let refs = list_refs(&repo).context("Failed to list refs")?;
        println!("{}", serde_json::to_string_pretty(&refs)?);
        return Ok(());
    }

    if let Some(spec) = &cli.open {
        let (path, line) = split_open_spec(spec);
        open_in_editor(&repo, &RelPath::new(path), line).context("Failed to open editor")?;
        return Ok(());
    }

    let opts = DiffOptions {
        source: parse_diff_source(cli),
        target: cli.target.clone(),
        context: cli.context,
        include_untracked: cli.untracked,
    };

    emit(&repo, &opts, cli.format)?;

    if cli.watch {
        let watcher = RepoWatcher::new(&repo).context("Failed to watch repository")?;
        loop {
            if let Some(WatchEvent::Changed) = watcher.poll() {
                emit(&repo, &opts, cli.format)?;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    Ok(())
}

/// Map CLI arguments onto a DiffSource.
fn parse_diff_source(cli: &Cli) -> DiffSource {
    if cli.staged {
        return DiffSource::Staged;
    }

    let Some(rev) = &cli.revision else {
        return DiffSource::WorkingTree;
    };

    // Range syntax: from..to, empty sides default to HEAD; tolerate "..."
    if let Some(idx) = rev.find("..") {
        let from = &rev[..idx];
        let to = rev[idx + 2..].trim_start_matches('.');
        return DiffSource::Range {
            from: if from.is_empty() { "HEAD" } else { from }.to_string(),
            to: if to.is_empty() { "HEAD" } else { to }.to_string(),
        };
    }

    // A single rev compares commit-to-commit against the target.
    DiffSource::Range {
        from: rev.clone(),
        to: cli.target.clone(),
    }
}

/// Split `FILE[:LINE]` into a path and an optional line number.
///
/// Only a trailing all-digit segment counts as a line, so paths that
/// happen to contain `:` stay intact.
fn split_open_spec(spec: &str) -> (&str, Option<u32>) {
    if let Some((path, line)) = spec.rsplit_once(':') {
        if let Ok(line) = line.parse::<u32>() {
            return (path, Some(line));
        }
    }
    (spec, None)
}

/// Collect, split, and print the diff in the requested format.
fn emit(repo: &RepoRoot, opts: &DiffOptions, format: Format) -> Result<()> {
    let report = diff_report(repo, opts).context("Failed to collect diff")?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Html => {
            let highlighters = HighlighterCache::new();
            print!("{}", render_html(&report, &highlighters));
        }
        Format::Text => {
            if report.is_empty() {
                println!("No changes detected");
            } else {
                print!("{}", render_text(&report));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("hunkview").chain(args.iter().copied()))
    }

    #[test]
    fn default_source_is_working_tree() {
        assert_eq!(parse_diff_source(&cli(&[])), DiffSource::WorkingTree);
    }

    #[test]
    fn staged_flag_wins() {
        assert_eq!(
            parse_diff_source(&cli(&["--staged", "abc123"])),
            DiffSource::Staged
        );
    }

    #[test]
    fn range_revision() {
        assert_eq!(
            parse_diff_source(&cli(&["abc..def"])),
            DiffSource::Range {
                from: "abc".to_string(),
                to: "def".to_string(),
            }
        );
    }

    #[test]
    fn open_ended_ranges_default_to_head() {
        assert_eq!(
            parse_diff_source(&cli(&["abc.."])),
            DiffSource::Range {
                from: "abc".to_string(),
                to: "HEAD".to_string(),
            }
        );
        assert_eq!(
            parse_diff_source(&cli(&["..def"])),
            DiffSource::Range {
                from: "HEAD".to_string(),
                to: "def".to_string(),
            }
        );
    }

    #[test]
    fn three_dot_range() {
        assert_eq!(
            parse_diff_source(&cli(&["abc...def"])),
            DiffSource::Range {
                from: "abc".to_string(),
                to: "def".to_string(),
            }
        );
    }

    #[test]
    fn open_spec_splits_trailing_line() {
        assert_eq!(split_open_spec("src/main.rs:42"), ("src/main.rs", Some(42)));
        assert_eq!(split_open_spec("src/main.rs"), ("src/main.rs", None));
        // A non-numeric tail belongs to the path
        assert_eq!(split_open_spec("notes:draft.md"), ("notes:draft.md", None));
        assert_eq!(split_open_spec("a:1:2"), ("a:1", Some(2)));
    }

    #[test]
    fn single_rev_compares_against_target() {
        assert_eq!(
            parse_diff_source(&cli(&["v1.0", "--target", "v2.0"])),
            DiffSource::Range {
                from: "v1.0".to_string(),
                to: "v2.0".to_string(),
            }
        );
    }
}
