//! Syntax highlighting using Tree-sitter.
//!
//! Highlighting is best-effort: an unrecognized extension or a grammar
//! failure degrades to a single default-styled span covering the whole
//! input, which renders as plain escaped text.

use std::collections::HashMap;

use parking_lot::Mutex;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter as TsHighlighter};

/// Language identifier for syntax highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// Rust source files.
    #[cfg(feature = "lang-rust")]
    Rust,
    /// TypeScript source files.
    #[cfg(feature = "lang-typescript")]
    TypeScript,
    /// TypeScript with JSX.
    #[cfg(feature = "lang-typescript")]
    TypeScriptReact,
    /// JavaScript source files.
    #[cfg(feature = "lang-typescript")]
    JavaScript,
    /// JavaScript with JSX.
    #[cfg(feature = "lang-typescript")]
    JavaScriptReact,
    /// Go source files.
    #[cfg(feature = "lang-go")]
    Go,
    /// Python source files.
    #[cfg(feature = "lang-python")]
    Python,
    /// JSON files.
    #[cfg(feature = "lang-json")]
    Json,
    /// YAML files.
    #[cfg(feature = "lang-yaml")]
    Yaml,
    /// Bash/shell scripts.
    #[cfg(feature = "lang-bash")]
    Bash,
    /// Plain text (no highlighting).
    Plain,
}

impl LanguageId {
    /// Detect language from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            #[cfg(feature = "lang-rust")]
            "rs" => Self::Rust,
            #[cfg(feature = "lang-typescript")]
            "ts" => Self::TypeScript,
            #[cfg(feature = "lang-typescript")]
            "tsx" => Self::TypeScriptReact,
            #[cfg(feature = "lang-typescript")]
            "js" | "mjs" | "cjs" => Self::JavaScript,
            #[cfg(feature = "lang-typescript")]
            "jsx" => Self::JavaScriptReact,
            #[cfg(feature = "lang-go")]
            "go" => Self::Go,
            #[cfg(feature = "lang-python")]
            "py" | "pyi" => Self::Python,
            #[cfg(feature = "lang-json")]
            "json" => Self::Json,
            #[cfg(feature = "lang-yaml")]
            "yaml" | "yml" => Self::Yaml,
            #[cfg(feature = "lang-bash")]
            "sh" | "bash" | "zsh" => Self::Bash,
            _ => Self::Plain,
        }
    }
}

/// A styled span in highlighted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Byte start offset in the source.
    pub start: usize,
    /// Byte end offset in the source.
    pub end: usize,
    /// Style identifier (maps to a CSS class).
    pub style_id: StyleId,
}

/// Style identifiers for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleId {
    /// Default/unstyled text.
    #[default]
    Default,
    /// Language keywords.
    Keyword,
    /// Type names.
    Type,
    /// Function names.
    Function,
    /// String literals.
    String,
    /// Numeric literals.
    Number,
    /// Comments.
    Comment,
    /// Operators.
    Operator,
    /// Punctuation.
    Punctuation,
    /// Variable names.
    Variable,
    /// Constants.
    Constant,
    /// Property access.
    Property,
    /// Attributes/decorators.
    Attribute,
}

impl StyleId {
    /// CSS class for this style, or None for unstyled text.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Keyword => Some("hl-keyword"),
            Self::Type => Some("hl-type"),
            Self::Function => Some("hl-function"),
            Self::String => Some("hl-string"),
            Self::Number => Some("hl-number"),
            Self::Comment => Some("hl-comment"),
            Self::Operator => Some("hl-operator"),
            Self::Punctuation => Some("hl-punctuation"),
            Self::Variable => Some("hl-variable"),
            Self::Constant => Some("hl-constant"),
            Self::Property => Some("hl-property"),
            Self::Attribute => Some("hl-attribute"),
        }
    }
}

/// Highlight names recognized by tree-sitter-highlight.
const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "string",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// Map highlight name to StyleId.
fn highlight_name_to_style(name: &str) -> StyleId {
    match name {
        "keyword" => StyleId::Keyword,
        "type" | "type.builtin" => StyleId::Type,
        "function" | "function.builtin" | "function.method" | "constructor" => StyleId::Function,
        "string" => StyleId::String,
        "number" => StyleId::Number,
        "comment" => StyleId::Comment,
        "operator" => StyleId::Operator,
        "punctuation" | "punctuation.bracket" | "punctuation.delimiter" => StyleId::Punctuation,
        "variable" | "variable.builtin" | "variable.parameter" => StyleId::Variable,
        "constant" | "constant.builtin" => StyleId::Constant,
        "property" => StyleId::Property,
        "attribute" => StyleId::Attribute,
        _ => StyleId::Default,
    }
}

/// Trait for syntax highlighters.
pub trait HighlighterTrait: Send + Sync {
    /// Highlight source code, returning styled spans for each byte range.
    fn highlight(&self, source: &str) -> Vec<StyledSpan>;
}

/// No-op highlighter (plain text).
#[derive(Debug, Default)]
pub struct PlainHighlighter;

impl HighlighterTrait for PlainHighlighter {
    fn highlight(&self, source: &str) -> Vec<StyledSpan> {
        vec![StyledSpan {
            start: 0,
            end: source.len(),
            style_id: StyleId::Default,
        }]
    }
}

/// Tree-sitter based highlighter.
pub struct TreeSitterHighlighter {
    config: HighlightConfiguration,
    highlighter: Mutex<TsHighlighter>,
}

impl TreeSitterHighlighter {
    /// Create a new highlighter for the given language.
    pub fn new(lang: LanguageId) -> Option<Self> {
        let (language, highlights_query) = match lang {
            #[cfg(feature = "lang-rust")]
            LanguageId::Rust => (
                tree_sitter_rust::LANGUAGE.into(),
                tree_sitter_rust::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-typescript")]
            LanguageId::TypeScript | LanguageId::JavaScript => (
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-typescript")]
            LanguageId::TypeScriptReact | LanguageId::JavaScriptReact => (
                tree_sitter_typescript::LANGUAGE_TSX.into(),
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-go")]
            LanguageId::Go => (
                tree_sitter_go::LANGUAGE.into(),
                tree_sitter_go::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-python")]
            LanguageId::Python => (
                tree_sitter_python::LANGUAGE.into(),
                tree_sitter_python::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-json")]
            LanguageId::Json => (
                tree_sitter_json::LANGUAGE.into(),
                tree_sitter_json::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-yaml")]
            LanguageId::Yaml => (
                tree_sitter_yaml::LANGUAGE.into(),
                tree_sitter_yaml::HIGHLIGHTS_QUERY,
            ),
            #[cfg(feature = "lang-bash")]
            LanguageId::Bash => (
                tree_sitter_bash::LANGUAGE.into(),
                tree_sitter_bash::HIGHLIGHT_QUERY,
            ),
            // Plain or disabled languages
            _ => return None,
        };

        let mut config =
            HighlightConfiguration::new(language, "source", highlights_query, "", "").ok()?;

        config.configure(HIGHLIGHT_NAMES);
        Some(Self {
            config,
            highlighter: Mutex::new(TsHighlighter::new()),
        })
    }
}

impl HighlighterTrait for TreeSitterHighlighter {
    fn highlight(&self, source: &str) -> Vec<StyledSpan> {
        let mut highlighter = self.highlighter.lock();
        let source_bytes = source.as_bytes();

        let highlights = match highlighter.highlight(&self.config, source_bytes, None, |_| None) {
            Ok(h) => h,
            Err(_) => {
                return vec![StyledSpan {
                    start: 0,
                    end: source.len(),
                    style_id: StyleId::Default,
                }];
            }
        };

        let mut spans = Vec::new();
        let mut style_stack: Vec<StyleId> = vec![StyleId::Default];
        let mut current_pos = 0;

        for event in highlights {
            match event {
                Ok(HighlightEvent::Source { start, end }) => {
                    let style = *style_stack.last().unwrap_or(&StyleId::Default);
                    // Bounds check to prevent reading past source on grammar bugs
                    let safe_start = start.min(source.len());
                    let safe_end = end.min(source.len());
                    if safe_start < safe_end {
                        spans.push(StyledSpan {
                            start: safe_start,
                            end: safe_end,
                            style_id: style,
                        });
                    }
                    current_pos = safe_end;
                }
                Ok(HighlightEvent::HighlightStart(highlight)) => {
                    let name = HIGHLIGHT_NAMES.get(highlight.0).copied().unwrap_or("");
                    style_stack.push(highlight_name_to_style(name));
                }
                Ok(HighlightEvent::HighlightEnd) => {
                    style_stack.pop();
                }
                Err(_) => break,
            }
        }

        // Fill any remaining content
        if current_pos < source.len() {
            spans.push(StyledSpan {
                start: current_pos,
                end: source.len(),
                style_id: StyleId::Default,
            });
        }

        if spans.is_empty() {
            spans.push(StyledSpan {
                start: 0,
                end: source.len(),
                style_id: StyleId::Default,
            });
        }

        spans
    }
}

/// Highlighter cache to avoid re-creating highlighters.
/// Uses interior mutability for use in render functions.
pub struct HighlighterCache {
    highlighters: std::cell::RefCell<HashMap<LanguageId, Box<dyn HighlighterTrait>>>,
    plain: PlainHighlighter,
}

impl Default for HighlighterCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlighterCache {
    /// Create a new empty highlighter cache.
    pub fn new() -> Self {
        Self {
            highlighters: std::cell::RefCell::new(HashMap::new()),
            plain: PlainHighlighter,
        }
    }

    /// Highlight source code for the given language.
    pub fn highlight(&self, lang: LanguageId, source: &str) -> Vec<StyledSpan> {
        if lang == LanguageId::Plain {
            return self.plain.highlight(source);
        }

        let mut highlighters = self.highlighters.borrow_mut();
        let highlighter =
            highlighters
                .entry(lang)
                .or_insert_with(|| match TreeSitterHighlighter::new(lang) {
                    Some(h) => Box::new(h),
                    None => Box::new(PlainHighlighter),
                });

        highlighter.highlight(source)
    }
}
