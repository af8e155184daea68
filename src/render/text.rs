//! Plain-text rendering of diff reports.

use crate::core::{format_relative_time, DiffReport};

/// Render a diff report as a human-readable summary.
///
/// One block per hunk: file, header, start lines, counts, and how long ago
/// the file was touched; totals at the end.
pub fn render_text(report: &DiffReport) -> String {
    let mut out = String::new();
    let mut last_file = "";

    for hunk in &report.hunks {
        if hunk.file_name.as_str() != last_file {
            out.push_str(&format!(
                "{} (modified {})\n",
                hunk.file_name,
                format_relative_time(&hunk.stats.modified)
            ));
            last_file = hunk.file_name.as_str();
        }

        out.push_str(&format!(
            "  {} old:{} new:{} +{} -{}\n",
            hunk.header,
            hunk.location.old_start,
            hunk.location.new_start,
            hunk.stats.added,
            hunk.stats.removed
        ));

        for line in &hunk.lines {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "{} changed, {}(+), {}(-)\n",
        plural(report.totals.files, "file"),
        plural(report.totals.added, "insertion"),
        plural(report.totals.removed, "deletion")
    ));

    out
}

/// `1 file`, `2 files` — git's totals-line pluralization.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_diff, FileStats};

    #[test]
    fn summary_shape() {
        let diff = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -3,2 +5,3 @@\n ctx\n+added\n ctx\n";
        let report = parse_diff(diff, |_| FileStats::unknown());
        let text = render_text(&report);

        assert!(text.contains("f.txt (modified unknown)"));
        assert!(text.contains("@@ -3,2 +5,3 @@ old:3 new:5 +1 -0"));
        assert!(text.contains("    +added"));
        assert!(text.ends_with("1 file changed, 1 insertion(+), 0 deletions(-)\n"));
    }

    #[test]
    fn file_line_emitted_once_per_file() {
        let diff = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1 +1 @@\n-a\n+b\n@@ -9 +9 @@\n-c\n+d\n";
        let report = parse_diff(diff, |_| FileStats::unknown());
        let text = render_text(&report);
        assert_eq!(text.matches("f.txt (modified").count(), 1);
    }

    #[test]
    fn empty_report_prints_zero_totals() {
        let report = parse_diff("", |_| FileStats::unknown());
        let text = render_text(&report);
        assert_eq!(
            text,
            "0 files changed, 0 insertions(+), 0 deletions(-)\n"
        );
    }

    #[test]
    fn totals_pluralize_like_git() {
        let diff = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1,2 +1,3 @@\n-a\n-b\n+c\n+d\n+e\n";
        let text = render_text(&parse_diff(diff, |_| FileStats::unknown()));
        assert!(text.ends_with("1 file changed, 3 insertions(+), 2 deletions(-)\n"));

        let diff = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1 +1 @@\n-a\n+b\n";
        let text = render_text(&parse_diff(diff, |_| FileStats::unknown()));
        assert!(text.ends_with("1 file changed, 1 insertion(+), 1 deletion(-)\n"));
    }
}
