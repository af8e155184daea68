//! HTML rendering of diff reports.

use crate::core::{DiffReport, FileHunk};
use crate::highlight::{HighlighterCache, LanguageId};

/// Escape the five HTML-significant characters: `&`, `<`, `>`, `"`, `'`.
///
/// # Examples
///
/// ```
/// use hunkview::render::escape_html;
///
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Highlight one line of code and emit it as escaped HTML.
///
/// Unstyled languages (and anything the grammar cannot handle) come back as
/// a single default span, so the result degrades to plain escaped content.
fn highlight_line_html(highlighters: &HighlighterCache, lang: LanguageId, line: &str) -> String {
    let spans = highlighters.highlight(lang, line);
    let mut out = String::with_capacity(line.len());

    for span in spans {
        let Some(text) = line.get(span.start..span.end) else {
            continue;
        };
        match span.style_id.css_class() {
            Some(class) => {
                out.push_str("<span class=\"");
                out.push_str(class);
                out.push_str("\">");
                out.push_str(&escape_html(text));
                out.push_str("</span>");
            }
            None => out.push_str(&escape_html(text)),
        }
    }

    out
}

/// Render a diff report as an HTML fragment.
///
/// Each hunk becomes a `<div class="hunk">` with its header and a table of
/// diff lines annotated with absolute old/new line numbers computed from
/// the hunk's [`HunkLocation`](crate::core::HunkLocation): context lines
/// advance both counters, removals only the old one, additions only the
/// new one.
pub fn render_html(report: &DiffReport, highlighters: &HighlighterCache) -> String {
    let mut out = String::new();

    for hunk in &report.hunks {
        render_hunk_html(hunk, highlighters, &mut out);
    }

    out.push_str(&format!(
        "<div class=\"diff-totals\">{} files, +{} -{}</div>\n",
        report.totals.files, report.totals.added, report.totals.removed
    ));

    out
}

fn render_hunk_html(hunk: &FileHunk, highlighters: &HighlighterCache, out: &mut String) {
    let lang = LanguageId::from_extension(&hunk.file_ext);

    out.push_str(&format!(
        "<div class=\"hunk\" id=\"{}\">\n",
        escape_html(&hunk.id)
    ));
    out.push_str(&format!(
        "<div class=\"hunk-file\">{}</div>\n",
        escape_html(hunk.file_name.as_str())
    ));
    out.push_str(&format!(
        "<div class=\"hunk-header\">{}</div>\n",
        escape_html(&hunk.header)
    ));
    out.push_str("<table class=\"hunk-lines\">\n");

    let mut old_no = hunk.location.old_start;
    let mut new_no = hunk.location.new_start;

    for line in &hunk.lines {
        let (class, old_cell, new_cell, content) = match line.as_bytes().first() {
            Some(b'+') => {
                let cells = (String::new(), new_no.to_string());
                new_no += 1;
                ("add", cells.0, cells.1, &line[1..])
            }
            Some(b'-') => {
                let cells = (old_no.to_string(), String::new());
                old_no += 1;
                ("del", cells.0, cells.1, &line[1..])
            }
            _ => {
                let cells = (old_no.to_string(), new_no.to_string());
                old_no += 1;
                new_no += 1;
                // Context lines carry a leading space; tolerate bare ones.
                let content = line.strip_prefix(' ').unwrap_or(line.as_str());
                ("ctx", cells.0, cells.1, content)
            }
        };

        out.push_str(&format!(
            "<tr class=\"{}\"><td class=\"lineno old\">{}</td><td class=\"lineno new\">{}</td><td class=\"code\">{}</td></tr>\n",
            class,
            old_cell,
            new_cell,
            highlight_line_html(highlighters, lang, content)
        ));
    }

    out.push_str("</table>\n</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_diff, FileStats};

    fn report_from(diff: &str) -> DiffReport {
        parse_diff(diff, |_| FileStats::unknown())
    }

    #[test]
    fn escapes_all_five_entities() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html(""), "");
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn ampersand_escaped_first() {
        // Must not double-escape entities produced by other replacements
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn line_numbers_follow_hunk_location() {
        let diff = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -10,3 +20,4 @@\n ctx one\n-removed\n+added\n+also added\n ctx two\n";
        let report = report_from(diff);
        let html = render_html(&report, &HighlighterCache::new());

        // Context line: both counters at their starts
        assert!(html.contains(
            "<tr class=\"ctx\"><td class=\"lineno old\">10</td><td class=\"lineno new\">20</td>"
        ));
        // Removal advances only the old counter
        assert!(html.contains(
            "<tr class=\"del\"><td class=\"lineno old\">11</td><td class=\"lineno new\"></td>"
        ));
        // Additions advance only the new counter
        assert!(html.contains(
            "<tr class=\"add\"><td class=\"lineno old\"></td><td class=\"lineno new\">21</td>"
        ));
        assert!(html.contains(
            "<tr class=\"add\"><td class=\"lineno old\"></td><td class=\"lineno new\">22</td>"
        ));
        // Trailing context: both counters past the changed block
        assert!(html.contains(
            "<tr class=\"ctx\"><td class=\"lineno old\">12</td><td class=\"lineno new\">23</td>"
        ));
    }

    #[test]
    fn content_is_escaped() {
        let diff =
            "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1 +1 @@\n-<b>&\n+\"quoted\"\n";
        let report = report_from(diff);
        let html = render_html(&report, &HighlighterCache::new());

        assert!(html.contains("&lt;b&gt;&amp;"));
        assert!(html.contains("&quot;quoted&quot;"));
        assert!(!html.contains("<b>&"));
    }

    #[test]
    fn totals_footer_present() {
        let diff = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1 +1 @@\n-a\n+b\n";
        let html = render_html(&report_from(diff), &HighlighterCache::new());
        assert!(html.contains("1 files, +1 -1"));
    }

    #[cfg(feature = "lang-rust")]
    #[test]
    fn rust_lines_get_keyword_spans() {
        let diff =
            "diff --git a/m.rs b/m.rs\n--- a/m.rs\n+++ b/m.rs\n@@ -1 +1 @@\n-fn old() {}\n+fn main() {}\n";
        let report = report_from(diff);
        let html = render_html(&report, &HighlighterCache::new());
        assert!(html.contains("<span class=\"hl-keyword\">fn</span>"));
    }

    #[test]
    fn unknown_extension_renders_plain() {
        let diff = "diff --git a/notes.xyz b/notes.xyz\n--- a/notes.xyz\n+++ b/notes.xyz\n@@ -1 +1 @@\n-old note\n+new note\n";
        let html = render_html(&report_from(diff), &HighlighterCache::new());
        assert!(html.contains("<td class=\"code\">new note</td>"));
        assert!(!html.contains("hl-keyword"));
    }
}
