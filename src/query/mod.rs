use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod classifier;
mod context;
mod error;
mod keywords;
mod sanitizer;

pub use classifier::{ErrorClassifier, ErrorType};
pub use context::{ErrorContext, PLAINTEXT};
pub use error::QueryError;
pub use keywords::CodeKeywordExtractor;
pub use sanitizer::TextSanitizer;

use sanitizer::collapse_whitespace;

const DEFAULT_MAX_QUERY_LENGTH: usize = 200;
const DEFAULT_MAX_KEYWORDS: usize = 8;
/// Upper bound on code identifiers appended to a query, whatever
/// `max_keywords` allows.
const MAX_CODE_KEYWORDS: usize = 3;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| compile_regex(r"[^\w\s\[\]-]"));

pub(crate) fn compile_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid regex literal {pattern}: {err}"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QueryBuilderConfig {
    /// Hard cap on the query length, in characters.
    #[validate(range(min = 1, message = "max_query_length must be greater than zero"))]
    pub max_query_length: usize,
    /// Cap on identifiers pulled from the code snippet.
    pub max_keywords: usize,
    /// Whether identifiers from the code snippet are added to the query.
    pub preserve_code_structure: bool,
}

impl Default for QueryBuilderConfig {
    fn default() -> Self {
        Self {
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            preserve_code_structure: true,
        }
    }
}

/// Turns an [`ErrorContext`] into a bounded search query.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    config: QueryBuilderConfig,
}

impl QueryBuilder {
    pub fn new(config: QueryBuilderConfig) -> Result<Self, QueryError> {
        config
            .validate()
            .map_err(|e| QueryError::Configuration(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QueryBuilderConfig {
        &self.config
    }

    pub fn build(&self, context: &ErrorContext) -> String {
        let error_type = ErrorClassifier::classify(context.error_message());
        debug!(%error_type, "classified error message");

        let mut segments = vec![
            TextSanitizer::clean(context.error_message()),
            error_type.boost_phrase().to_string(),
        ];

        if self.config.preserve_code_structure && !context.code_snippet().is_empty() {
            let keywords = self.code_keywords(context.code_snippet());
            if !keywords.is_empty() {
                segments.push(keywords.join(" "));
            }
        }

        if context.has_language_tag() {
            segments.push(format!("[{}]", context.language().trim()));
        }

        let joined = segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let query = finalize(&joined, self.config.max_query_length);
        debug!(%query, "built search query");
        query
    }

    /// Longest identifiers first; equal lengths keep snippet order.
    fn code_keywords(&self, code: &str) -> Vec<String> {
        let mut keywords: Vec<String> =
            CodeKeywordExtractor::extract(code, self.config.max_keywords)
                .into_iter()
                .collect();
        keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        keywords.truncate(MAX_CODE_KEYWORDS.min(self.config.max_keywords));
        keywords
    }
}

fn finalize(query: &str, max_length: usize) -> String {
    let collapsed = collapse_whitespace(query);
    let stripped = DISALLOWED.replace_all(&collapsed, "");
    collapse_whitespace(&stripped)
        .chars()
        .take(max_length)
        .collect::<String>()
        .trim_end()
        .to_string()
}
