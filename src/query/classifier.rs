use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::compile_regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Syntax,
    Reference,
    Type,
    Runtime,
    Import,
    Unknown,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "syntax",
            ErrorType::Reference => "reference",
            ErrorType::Type => "type",
            ErrorType::Runtime => "runtime",
            ErrorType::Import => "import",
            ErrorType::Unknown => "unknown",
        }
    }

    /// Fixed phrase appended to the query to bias results toward this kind
    /// of error.
    pub fn boost_phrase(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "syntax fix example",
            ErrorType::Reference => "undefined variable declaration reference",
            ErrorType::Type => "type checking typescript",
            ErrorType::Runtime => "runtime error solution",
            ErrorType::Import => "module import require",
            ErrorType::Unknown => "solution fix example",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// First match wins. `Type` sits ahead of `Reference` so that
// "cannot read property 'x' of undefined" is a type error.
static RULES: Lazy<Vec<(ErrorType, Regex)>> = Lazy::new(|| {
    [
        (
            ErrorType::Syntax,
            r"(?i)syntax ?error|unexpected token|unexpected end of input|expected",
        ),
        (
            ErrorType::Type,
            r"(?i)type ?error|is not a function|cannot read propert(?:y|ies)|is not assignable",
        ),
        (
            ErrorType::Reference,
            r"(?i)reference ?error|not defined|cannot find name|undefined",
        ),
        (
            ErrorType::Runtime,
            r"(?i)runtime ?error|maximum call stack|stack overflow|out of memory",
        ),
        (
            ErrorType::Import,
            r"(?i)cannot find module|import ?error|module not found|no module named|require is not defined",
        ),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, compile_regex(pattern)))
    .collect()
});

pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify(message: &str) -> ErrorType {
        RULES
            .iter()
            .find(|(_, pattern)| pattern.is_match(message))
            .map(|(kind, _)| *kind)
            .unwrap_or(ErrorType::Unknown)
    }
}
