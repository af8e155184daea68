//! Git repository discovery and command plumbing.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepoError {
    /// Path is not inside a git repository.
    #[error("not inside a git repository")]
    NotARepo,
    /// Git command failed with an error message.
    #[error("git command failed: {0}")]
    GitError(String),
    /// I/O error during git operation.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Git output contained invalid UTF-8.
    #[error("invalid utf-8 in git output")]
    InvalidUtf8,
    /// Invalid revision specified.
    #[error("invalid revision: {0}")]
    InvalidRevision(String),
}

/// Canonicalized path to a git repository root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Discover the git repository containing the given path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hunkview::core::RepoRoot;
    /// use std::path::Path;
    ///
    /// let repo = RepoRoot::discover(Path::new(".")).expect("not in a git repo");
    /// println!("Repo at: {}", repo.path().display());
    /// ```
    #[must_use = "this returns a Result that should be checked"]
    pub fn discover(path: &Path) -> Result<Self, RepoError> {
        let output = Command::new("git")
            .arg("rev-parse")
            .arg("--show-toplevel")
            .current_dir(path)
            .output()?;

        if !output.status.success() {
            return Err(RepoError::NotARepo);
        }

        let root = std::str::from_utf8(&output.stdout)
            .map_err(|_| RepoError::InvalidUtf8)?
            .trim();

        let canonical = PathBuf::from(root)
            .canonicalize()
            .map_err(|_| RepoError::NotARepo)?;

        Ok(Self(canonical))
    }

    /// Get the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// A repository-relative path. Never absolute.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RelPath(String);

impl RelPath {
    /// Create a new RelPath. The path must be relative; callers pass paths
    /// taken from git output, which are always repo-relative.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        debug_assert!(
            !path.starts_with('/'),
            "RelPath must not be absolute: {}",
            path
        );
        Self(path)
    }

    /// Get the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to an absolute path given a repo root.
    #[must_use]
    pub fn to_absolute(&self, root: &RepoRoot) -> PathBuf {
        root.path().join(&self.0)
    }

    /// Get the file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.0).extension().and_then(|s| s.to_str())
    }

    /// Get the file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        Path::new(&self.0)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run a git command in the repository and return stdout.
pub(crate) fn git_output(root: &RepoRoot, args: &[&str]) -> Result<String, RepoError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root.path())
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RepoError::GitError(stderr.to_string()));
    }

    String::from_utf8(output.stdout).map_err(|_| RepoError::InvalidUtf8)
}

/// Resolve a revision to its full SHA.
///
/// Anything git cannot verify as a single revision is rejected, so
/// option-looking input (`--no-index`, `-Ofoo`) never reaches a diff
/// command line.
#[must_use = "this returns a Result that should be checked"]
pub fn resolve_revision(root: &RepoRoot, revision: &str) -> Result<String, RepoError> {
    // --end-of-options keeps revisions like "-x" from being read as flags
    let output = Command::new("git")
        .args(["rev-parse", "--verify", "--end-of-options", revision])
        .current_dir(root.path())
        .output()?;

    if !output.status.success() {
        return Err(RepoError::InvalidRevision(revision.to_string()));
    }

    let sha = std::str::from_utf8(&output.stdout)
        .map_err(|_| RepoError::InvalidUtf8)?
        .trim()
        .to_string();

    Ok(sha)
}

/// Kind of git ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// A local or remote branch.
    Branch,
    /// A commit from the recent history.
    Commit,
}

/// A named ref usable as a diff target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitRef {
    /// Display name (branch name, or "hash - subject" for commits).
    pub name: String,
    /// What kind of ref this is.
    pub kind: RefKind,
    /// Abbreviated commit hash, when known.
    pub short_hash: Option<String>,
    /// Commit subject, when known.
    pub message: Option<String>,
}

/// Branches and recent commits of a repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoRefs {
    /// All local and remote branches.
    pub branches: Vec<GitRef>,
    /// The 20 most recent commits.
    pub recent_commits: Vec<GitRef>,
}

/// List branches and recent commits usable as diff targets.
///
/// Either listing may come back empty (e.g. a repository with no commits);
/// that is not an error.
#[must_use = "this returns a Result that should be checked"]
pub fn list_refs(root: &RepoRoot) -> Result<RepoRefs, RepoError> {
    let mut refs = RepoRefs::default();

    if let Ok(branch_text) = git_output(root, &["branch", "-a", "--format=%(refname:short)"]) {
        refs.branches = parse_branches(&branch_text);
    }

    if let Ok(log_text) = git_output(root, &["log", "--oneline", "-20", "--pretty=format:%h|%s"]) {
        refs.recent_commits = parse_commit_log(&log_text);
    }

    Ok(refs)
}

/// Parse `git branch -a --format=%(refname:short)` output.
fn parse_branches(text: &str) -> Vec<GitRef> {
    text.lines()
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with("origin/HEAD"))
        .map(|name| GitRef {
            name: name.to_string(),
            kind: RefKind::Branch,
            short_hash: None,
            message: None,
        })
        .collect()
}

/// Parse `git log --pretty=format:%h|%s` output.
fn parse_commit_log(text: &str) -> Vec<GitRef> {
    text.lines()
        .filter_map(|line| {
            let (hash, subject) = line.split_once('|')?;
            Some(GitRef {
                name: format!("{} - {}", hash, subject),
                kind: RefKind::Commit,
                short_hash: Some(hash.to_string()),
                message: Some(subject.to_string()),
            })
        })
        .collect()
}

/// Size and modification time of a worktree file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// File size in bytes. 0 when the file is missing.
    pub size: u64,
    /// Modification time as RFC 3339, or `"unknown"`.
    pub modified: String,
}

impl FileStats {
    /// Stats for a file that could not be inspected.
    pub fn unknown() -> Self {
        Self {
            size: 0,
            modified: "unknown".to_string(),
        }
    }
}

/// Look up size and mtime for a worktree file.
///
/// Deleted or otherwise unreadable files report size 0 and `"unknown"`.
pub fn worktree_file_stats(root: &RepoRoot, path: &RelPath) -> FileStats {
    let full = path.to_absolute(root);
    let Ok(metadata) = std::fs::metadata(&full) else {
        return FileStats::unknown();
    };

    let modified = metadata
        .modified()
        .ok()
        .map(|time| DateTime::<Utc>::from(time).to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    FileStats {
        size: metadata.len(),
        modified,
    }
}
