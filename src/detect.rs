//! Producers of [`ErrorContext`] values: a typed-in message, a text
//! selection, or a message pointing at a line of a source file.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::RegexSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::{ErrorContext, QueryError, PLAINTEXT};

/// Lines of context taken on each side of the error line.
const SNIPPET_RADIUS: usize = 2;

static ERROR_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)error:",
        r"(?i)exception:",
        r"(?i)typeerror",
        r"(?i)referenceerror",
        r"(?i)syntaxerror",
        r"(?i)is not defined",
        r"(?i)cannot read propert(?:y|ies)",
        r"(?i)undefined is not a function",
        r"(?i)unexpected token",
        r"(?i)failed to",
        r"(?i)not found",
        r"(?i)panicked at",
        r"(?i)traceback \(most recent call last\)",
    ])
    .unwrap_or_else(|err| panic!("invalid error pattern set: {err}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    CSharp,
    Php,
    Ruby,
    Go,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Language::Rust,
            "py" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "java" => Language::Java,
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Language::Cpp,
            "cs" => Language::CSharp,
            "php" => Language::Php,
            "rb" => Language::Ruby,
            "go" => Language::Go,
            _ => Language::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Identifier used as the bracketed language tag in queries.
    pub fn id(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Unknown => PLAINTEXT,
        }
    }
}

/// A source file the error was observed in.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
    pub language: Language,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self {
            path,
            contents: contents.into(),
            language,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file {:?}", path))?;
        Ok(Self::new(path, contents))
    }

    /// Up to two lines either side of `line` (zero-based), trimmed.
    pub fn snippet_around(&self, line: usize) -> String {
        let lines: Vec<&str> = self.contents.lines().collect();
        if lines.is_empty() {
            return String::new();
        }
        let line = line.min(lines.len() - 1);
        let start = line.saturating_sub(SNIPPET_RADIUS);
        let end = (line + SNIPPET_RADIUS).min(lines.len() - 1);
        lines[start..=end].join("\n").trim().to_string()
    }
}

pub struct ErrorDetector;

impl ErrorDetector {
    pub fn looks_like_error_message(text: &str) -> bool {
        ERROR_PATTERNS.is_match(text)
    }

    /// Context for an error reported at `line` of `file`.
    pub fn from_source(
        message: &str,
        file: &SourceFile,
        line: usize,
    ) -> Result<ErrorContext, QueryError> {
        ErrorContext::new(
            message.trim(),
            file.snippet_around(line),
            file.language.id(),
            file.path.to_string_lossy(),
            u32::try_from(line).unwrap_or(u32::MAX),
        )
    }

    /// Context for a selected piece of text, if it reads like an error
    /// message. Without a source file the context is plain text.
    pub fn from_selection(
        selection: &str,
        file: Option<&SourceFile>,
        line: usize,
    ) -> Option<ErrorContext> {
        let selection = selection.trim();
        if selection.is_empty() || !Self::looks_like_error_message(selection) {
            return None;
        }
        match file {
            Some(file) => Self::from_source(selection, file, line).ok(),
            None => ErrorContext::from_message(selection).ok(),
        }
    }
}
