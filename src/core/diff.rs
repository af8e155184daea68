//! Diff collection: running `git diff` and splitting the output.

use std::process::Command;

use crate::metrics;

use super::{
    git_output, parse_diff, resolve_revision, worktree_file_stats, DiffReport, RepoError, RepoRoot,
};

/// Source specification for diff comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// Working tree changes vs the target ref (default behavior).
    WorkingTree,
    /// Staged (index) changes vs the target ref.
    Staged,
    /// Commit-to-commit comparison (from..to).
    Range {
        /// Starting commit.
        from: String,
        /// Ending commit.
        to: String,
    },
}

impl Default for DiffSource {
    fn default() -> Self {
        Self::WorkingTree
    }
}

/// Options controlling diff collection.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// What to compare.
    pub source: DiffSource,
    /// Target ref for working-tree and staged comparisons.
    pub target: String,
    /// Context lines around each hunk.
    pub context: u32,
    /// Also diff untracked files against /dev/null.
    pub include_untracked: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            source: DiffSource::WorkingTree,
            target: "HEAD".to_string(),
            context: 3,
            include_untracked: false,
        }
    }
}

/// Verify every user-supplied revision before it reaches `git diff`.
fn validate_revisions(root: &RepoRoot, opts: &DiffOptions) -> Result<(), RepoError> {
    match &opts.source {
        DiffSource::WorkingTree => {
            resolve_revision(root, &opts.target)?;
        }
        DiffSource::Staged => {
            if opts.target != "HEAD" {
                resolve_revision(root, &opts.target)?;
            }
        }
        DiffSource::Range { from, to } => {
            resolve_revision(root, from)?;
            resolve_revision(root, to)?;
        }
    }
    Ok(())
}

/// Build the `git diff` argument list for the given options.
///
/// Revisions are always followed by `--` so they cannot be read as
/// pathspecs; they are verified separately by [`validate_revisions`].
fn diff_args(opts: &DiffOptions) -> Vec<String> {
    let context_arg = format!("-U{}", opts.context);

    let mut args = match &opts.source {
        DiffSource::Staged => {
            let mut args = vec!["diff".to_string(), context_arg, "--staged".to_string()];
            if opts.target != "HEAD" {
                args.push(opts.target.clone());
            }
            args
        }
        DiffSource::WorkingTree => {
            vec!["diff".to_string(), context_arg, opts.target.clone()]
        }
        DiffSource::Range { from, to } => {
            vec![
                "diff".to_string(),
                context_arg,
                format!("{}..{}", from, to),
            ]
        }
    };
    args.push("--".to_string());
    args
}

/// Run `git diff` per the options and return the raw unified-diff text.
///
/// When the working-tree-vs-HEAD diff comes back empty, falls back to the
/// staged diff before reporting nothing.
#[must_use = "this returns a Result that should be checked"]
pub fn collect_diff(root: &RepoRoot, opts: &DiffOptions) -> Result<String, RepoError> {
    let mut phase = metrics::Phase::start("collect_diff");

    validate_revisions(root, opts)?;

    let args = diff_args(opts);
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let mut diff_text = git_output(root, &arg_refs)?;

    if opts.include_untracked {
        append_untracked_diffs(root, opts.context, &mut diff_text)?;
    }

    if diff_text.trim().is_empty()
        && opts.source == DiffSource::WorkingTree
        && opts.target == "HEAD"
    {
        let context_arg = format!("-U{}", opts.context);
        if let Ok(staged) = git_output(root, &["diff", &context_arg, "--cached", "--"]) {
            if !staged.trim().is_empty() {
                diff_text = staged;
            }
        }
    }

    if let Some(phase) = phase.as_mut() {
        phase.record(format!("{} bytes", diff_text.len()));
    }

    Ok(diff_text)
}

/// Diff each untracked file against /dev/null and append the output.
fn append_untracked_diffs(
    root: &RepoRoot,
    context: u32,
    diff_text: &mut String,
) -> Result<(), RepoError> {
    let untracked = git_output(root, &["ls-files", "--others", "--exclude-standard"])?;
    let context_arg = format!("-U{}", context);

    for file in untracked.lines().map(str::trim).filter(|f| !f.is_empty()) {
        // `git diff --no-index` exits 1 when the files differ; that is the
        // expected case, so take stdout regardless of status.
        let output = Command::new("git")
            .args(["diff", "--no-index", &context_arg, "/dev/null", file])
            .current_dir(root.path())
            .output()?;

        let chunk = String::from_utf8_lossy(&output.stdout);
        if chunk.trim().is_empty() {
            continue;
        }
        if !diff_text.trim().is_empty() {
            diff_text.push('\n');
        }
        diff_text.push_str(&chunk);
    }

    Ok(())
}

/// Collect a diff and split it into a [`DiffReport`].
#[must_use = "this returns a Result that should be checked"]
pub fn diff_report(root: &RepoRoot, opts: &DiffOptions) -> Result<DiffReport, RepoError> {
    let diff_text = collect_diff(root, opts)?;

    let mut phase = metrics::Phase::start("parse_diff");
    let report = parse_diff(&diff_text, |path| worktree_file_stats(root, path));
    if let Some(phase) = phase.as_mut() {
        phase.record(format!(
            "{} hunks in {} files",
            report.hunks.len(),
            report.totals.files
        ));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_tree_args() {
        let opts = DiffOptions::default();
        assert_eq!(diff_args(&opts), vec!["diff", "-U3", "HEAD", "--"]);
    }

    #[test]
    fn working_tree_against_branch() {
        let opts = DiffOptions {
            target: "origin/main".to_string(),
            ..Default::default()
        };
        assert_eq!(diff_args(&opts), vec!["diff", "-U3", "origin/main", "--"]);
    }

    #[test]
    fn staged_args_omit_default_target() {
        let opts = DiffOptions {
            source: DiffSource::Staged,
            ..Default::default()
        };
        assert_eq!(diff_args(&opts), vec!["diff", "-U3", "--staged", "--"]);

        let opts = DiffOptions {
            source: DiffSource::Staged,
            target: "v1.0".to_string(),
            ..Default::default()
        };
        assert_eq!(
            diff_args(&opts),
            vec!["diff", "-U3", "--staged", "v1.0", "--"]
        );
    }

    #[test]
    fn range_args() {
        let opts = DiffOptions {
            source: DiffSource::Range {
                from: "abc123".to_string(),
                to: "def456".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(diff_args(&opts), vec!["diff", "-U3", "abc123..def456", "--"]);
    }

    #[test]
    fn context_flows_into_args() {
        let opts = DiffOptions {
            context: 10,
            ..Default::default()
        };
        assert_eq!(diff_args(&opts)[1], "-U10");
    }
}
