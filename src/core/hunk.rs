//! Hunk locating and unified-diff splitting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{FileStats, RelPath};

/// Pattern for a unified-diff hunk header. The optional count fields are
/// recognized but not captured; only the two start lines matter.
static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("invalid hunk header regex")
});

/// Pattern that trims a raw header line down to its `@@ ... @@` prefix,
/// dropping the function context git appends after the second `@@`.
static HEADER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(@@[^@]*@@)").expect("invalid header prefix regex"));

/// Starting line numbers extracted from a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkLocation {
    /// First affected line in the old file version.
    pub old_start: u32,
    /// First affected line in the new file version.
    pub new_start: u32,
}

impl Default for HunkLocation {
    fn default() -> Self {
        Self {
            old_start: 1,
            new_start: 1,
        }
    }
}

/// Extract old/new start lines from a unified-diff hunk header.
///
/// Total over all inputs: any string that does not contain a
/// `@@ -n[,c] +m[,c] @@` pattern maps to the default `{1, 1}`, so callers
/// cannot distinguish "no hunk info found" from "hunk starts at line 1".
/// The match may appear anywhere in the string; only the first one is used.
///
/// # Examples
///
/// ```
/// use hunkview::core::{parse_hunk_header, HunkLocation};
///
/// let loc = parse_hunk_header("@@ -10,5 +12,7 @@ fn main() {");
/// assert_eq!(loc, HunkLocation { old_start: 10, new_start: 12 });
///
/// assert_eq!(parse_hunk_header("not a header"), HunkLocation::default());
/// ```
pub fn parse_hunk_header(header: &str) -> HunkLocation {
    let Some(caps) = HUNK_HEADER.captures(header) else {
        return HunkLocation::default();
    };

    // Digit runs longer than u32 only occur in garbage input; treat them
    // like a non-match.
    match (caps[1].parse(), caps[2].parse()) {
        (Ok(old_start), Ok(new_start)) => HunkLocation {
            old_start,
            new_start,
        },
        _ => HunkLocation::default(),
    }
}

/// Added/removed counts and worktree stats for one hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HunkStats {
    /// Lines added in this hunk.
    pub added: usize,
    /// Lines removed in this hunk.
    pub removed: usize,
    /// Current worktree size of the file in bytes.
    pub size: u64,
    /// Worktree mtime as RFC 3339, or `"unknown"`.
    pub modified: String,
}

/// One hunk of one changed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileHunk {
    /// Repository-relative path of the file.
    pub file_name: RelPath,
    /// File extension, empty when there is none.
    pub file_ext: String,
    /// The `@@ ... @@` header line, without trailing function context.
    pub header: String,
    /// Start lines parsed from the header.
    pub location: HunkLocation,
    /// Body lines, with their leading `+`/`-`/space markers.
    pub lines: Vec<String>,
    /// Stable id: `"<file_name>-<index>"` with a per-file hunk index.
    pub id: String,
    /// Line counts and file stats.
    pub stats: HunkStats,
}

/// Aggregate counts across a whole diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TotalStats {
    /// Total lines added.
    pub added: usize,
    /// Total lines removed.
    pub removed: usize,
    /// Number of distinct files touched.
    pub files: usize,
}

/// A fully split diff: every hunk of every file, plus totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffReport {
    /// All hunks, in the order git emitted them.
    pub hunks: Vec<FileHunk>,
    /// Aggregate counts.
    pub totals: TotalStats,
}

impl DiffReport {
    /// Whether the diff contained any hunks.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }
}

/// Split raw `git diff` output into per-file hunks.
///
/// `stats_for` supplies worktree size/mtime per file path, keeping this
/// function free of filesystem access.
///
/// Splits on line-anchored `diff --git ` boundaries so file content that
/// happens to contain the string cannot cause false splits.
pub fn parse_diff(diff_text: &str, stats_for: impl Fn(&RelPath) -> FileStats) -> DiffReport {
    if diff_text.trim().is_empty() {
        return DiffReport::default();
    }

    let mut hunks = Vec::new();
    let mut chunk: Vec<&str> = Vec::new();

    for line in diff_text.lines() {
        if line.starts_with("diff --git ") && !chunk.is_empty() {
            split_file_chunk(&chunk, &stats_for, &mut hunks);
            chunk.clear();
        }
        chunk.push(line);
    }
    if !chunk.is_empty() {
        split_file_chunk(&chunk, &stats_for, &mut hunks);
    }

    let added = hunks.iter().map(|h| h.stats.added).sum();
    let removed = hunks.iter().map(|h| h.stats.removed).sum();
    let files: HashSet<&str> = hunks.iter().map(|h| h.file_name.as_str()).collect();

    DiffReport {
        totals: TotalStats {
            added,
            removed,
            files: files.len(),
        },
        hunks,
    }
}

/// Split one file's diff block into hunks and append them to `out`.
fn split_file_chunk(
    lines: &[&str],
    stats_for: &impl Fn(&RelPath) -> FileStats,
    out: &mut Vec<FileHunk>,
) {
    let file_name = extract_file_name(lines);
    let file_ext = file_name.extension().unwrap_or("").to_string();
    let file_stats = stats_for(&file_name);

    let mut i = 0;
    let mut hunk_index = 0;

    while i < lines.len() {
        if !lines[i].starts_with("@@") {
            i += 1;
            continue;
        }

        let header = match HEADER_PREFIX.captures(lines[i]) {
            Some(caps) => caps[1].to_string(),
            None => lines[i].to_string(),
        };
        let location = parse_hunk_header(&header);

        let mut body = Vec::new();
        i += 1;
        while i < lines.len() && !lines[i].starts_with("@@") {
            // Git's "No newline at end of file" notice is not a diff line.
            if !lines[i].starts_with("\\ No newline at end of file") {
                body.push(lines[i].to_string());
            }
            i += 1;
        }

        let added = body.iter().filter(|line| line.starts_with('+')).count();
        let removed = body.iter().filter(|line| line.starts_with('-')).count();

        out.push(FileHunk {
            id: format!("{}-{}", file_name, hunk_index),
            file_name: file_name.clone(),
            file_ext: file_ext.clone(),
            header,
            location,
            lines: body,
            stats: HunkStats {
                added,
                removed,
                size: file_stats.size,
                modified: file_stats.modified.clone(),
            },
        });

        hunk_index += 1;
    }
}

/// Pull the file name out of the `+++`/`---` lines of a file block.
///
/// Prefers the new side; falls back to the old side for deletions.
fn extract_file_name(lines: &[&str]) -> RelPath {
    let plus = lines.iter().find(|line| line.starts_with("+++ "));
    let minus = lines.iter().find(|line| line.starts_with("--- "));

    if let Some(plus) = plus {
        if !plus.contains("/dev/null") {
            return RelPath::new(plus.replacen("+++ b/", "", 1));
        }
    }

    if let Some(minus) = minus {
        if !minus.contains("/dev/null") {
            return RelPath::new(minus.replacen("--- a/", "", 1));
        }
    }

    RelPath::new("Unknown file")
}
