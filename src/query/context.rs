use serde::Serialize;
use validator::{Validate, ValidationError};

use super::error::QueryError;

/// Language tag that carries no search signal.
pub const PLAINTEXT: &str = "plaintext";

/// One observed error: the message plus whatever surrounding code and
/// location the producer could supply. Only constructed through
/// [`ErrorContext::new`], so the message is never blank.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ErrorContext {
    #[validate(custom = "not_blank")]
    error_message: String,
    code_snippet: String,
    language: String,
    file_path: String,
    line_number: u32,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Error message cannot be empty".into());
        return Err(error);
    }
    Ok(())
}

impl ErrorContext {
    pub fn new(
        error_message: impl Into<String>,
        code_snippet: impl Into<String>,
        language: impl Into<String>,
        file_path: impl Into<String>,
        line_number: u32,
    ) -> Result<Self, QueryError> {
        let context = Self {
            error_message: error_message.into(),
            code_snippet: code_snippet.into(),
            language: language.into(),
            file_path: file_path.into(),
            line_number,
        };
        context.validate()?;
        Ok(context)
    }

    /// A context typed in by hand: no code, no location.
    pub fn from_message(error_message: impl Into<String>) -> Result<Self, QueryError> {
        Self::new(error_message, "", PLAINTEXT, "", 0)
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn code_snippet(&self) -> &str {
        &self.code_snippet
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn has_language_tag(&self) -> bool {
        let language = self.language.trim();
        !language.is_empty() && language != PLAINTEXT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_message() {
        assert!(matches!(
            ErrorContext::from_message(""),
            Err(QueryError::Validation(_))
        ));
        assert!(matches!(
            ErrorContext::new("  \n", "let a = 1;", "javascript", "a.js", 3),
            Err(QueryError::Validation(_))
        ));
    }

    #[test]
    fn test_manual_context_defaults() {
        let context = ErrorContext::from_message("TypeError: boom").unwrap();
        assert_eq!(context.language(), PLAINTEXT);
        assert_eq!(context.code_snippet(), "");
        assert_eq!(context.line_number(), 0);
        assert!(!context.has_language_tag());
    }

    #[test]
    fn test_language_tag() {
        let context = ErrorContext::new("boom", "", "rust", "src/main.rs", 1).unwrap();
        assert!(context.has_language_tag());
    }
}
