//! Noise reduction for error messages.
//!
//! Paths, URLs, quoted identifier values and numeric locators rarely match
//! anything useful in a search index, while type names and standard
//! diagnostic phrases do. Load-bearing tokens are swapped for placeholders
//! before the removal passes run and restored afterwards. Placeholders are
//! fenced by private-use characters that none of the removal patterns
//! accept, and those characters are dropped from the input up front.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::compile_regex;

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

static WHITESPACE: Lazy<Regex> = Lazy::new(|| compile_regex(r"\s+"));

/// Matched in order; each pass only sees the placeholders left by the
/// earlier ones, never the text they captured.
static PRESERVE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // standardized diagnostic phrases
        r"(?i)is not assignable to(?: type| parameter of type)?|is not a function|is not defined|cannot read propert(?:y|ies)|cannot find (?:name|module)|unexpected token|has no exported member|does not exist on type|is possibly (?:null|undefined)|maximum call stack size exceeded",
        // error class names
        r"\b\w*(?:Error|Exception)\b",
        // primitive and built-in type names
        r"(?i)\b(?:string|number|boolean|undefined|null|void|any|unknown|never|object|symbol|bigint)\b",
        // declaration keywords
        r"(?i)\b(?:const|let|var|function|class|interface|type|enum|import|export|async|await)\b",
    ]
    .into_iter()
    .map(compile_regex)
    .collect()
});

static URL: Lazy<Regex> = Lazy::new(|| compile_regex(r"(?i)\b(?:https?|file|ftp)://\S+"));

static FILE_PATH: Lazy<Regex> = Lazy::new(|| {
    compile_regex(r"(?:\b[A-Za-z]:)?(?:[\w.~@-]*[/\\])+[\w.@-]*")
});

// The leading group stands in for a lookbehind so apostrophes inside words
// ("can't") are not taken as opening quotes.
static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| compile_regex(r"(^|[^\w])'([^'\n]*)'"));
static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| compile_regex(r#""([^"\n]*)""#));
static BACKTICK_QUOTED: Lazy<Regex> = Lazy::new(|| compile_regex(r"`([^`\n]*)`"));

static IDENTIFIER_VALUE: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"^[\w$.@~:/\\-]*$"));

static LINE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    compile_regex(r"(?i)\b(?:at\s+)?(?:line|position|column|col)\s+\d+")
});

static NUMERIC_LOCATOR: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"\(\d+(?:\s*[,:]\s*\d+)*\)|:\d+(?::\d+)*:?"));

static STANDALONE_INTEGER: Lazy<Regex> = Lazy::new(|| compile_regex(r"\b\d+\b"));

/// Quoted content made only of placeholders, e.g. `'string/number'` after
/// the path pass has eaten the separator.
static PLACEHOLDERS_ONLY: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"^\x{E000}[A-Z]+\x{E001}(?:\s*\x{E000}[A-Z]+\x{E001})*$"));

pub struct TextSanitizer;

impl TextSanitizer {
    pub fn clean(message: &str) -> String {
        let fenced: String = message
            .chars()
            .filter(|c| *c != PLACEHOLDER_OPEN && *c != PLACEHOLDER_CLOSE)
            .collect();
        let collapsed = collapse_whitespace(&fenced);
        let (mut text, preserved) = protect(&collapsed);

        text = URL.replace_all(&text, " ").into_owned();
        text = FILE_PATH.replace_all(&text, " ").into_owned();
        text = strip_quoted(&text);
        text = LINE_REFERENCE.replace_all(&text, " ").into_owned();
        text = NUMERIC_LOCATOR.replace_all(&text, " ").into_owned();
        text = STANDALONE_INTEGER.replace_all(&text, " ").into_owned();

        let mut cleaned = collapse_whitespace(&text);
        for (placeholder, original) in &preserved {
            cleaned = cleaned.replace(placeholder.as_str(), original);
        }
        cleaned
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Letters only inside the fence so the integer and locator passes can
/// never match inside one.
fn placeholder(index: usize) -> String {
    let mut suffix = String::new();
    let mut n = index;
    loop {
        suffix.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    format!("{PLACEHOLDER_OPEN}{suffix}{PLACEHOLDER_CLOSE}")
}

fn protect(text: &str) -> (String, Vec<(String, String)>) {
    let mut preserved: Vec<(String, String)> = Vec::new();
    let mut current = text.to_string();

    for pattern in PRESERVE.iter() {
        current = pattern
            .replace_all(&current, |caps: &Captures| {
                let token = placeholder(preserved.len());
                preserved.push((token.clone(), caps[0].to_string()));
                token
            })
            .into_owned();
    }

    (current, preserved)
}

fn strip_quoted(text: &str) -> String {
    let text = SINGLE_QUOTED.replace_all(text, |caps: &Captures| {
        format!("{}{}", &caps[1], unquote(&caps[2], "'"))
    });
    let text = DOUBLE_QUOTED.replace_all(&text, |caps: &Captures| unquote(&caps[1], "\""));
    BACKTICK_QUOTED
        .replace_all(&text, |caps: &Captures| unquote(&caps[1], "`"))
        .into_owned()
}

fn unquote(content: &str, quote: &str) -> String {
    let trimmed = content.trim();
    if PLACEHOLDERS_ONLY.is_match(trimmed) {
        format!(" {trimmed} ")
    } else if IDENTIFIER_VALUE.is_match(trimmed) {
        " ".to_string()
    } else {
        format!("{quote}{content}{quote}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleans_type_error_message() {
        let cleaned =
            TextSanitizer::clean("TypeError: Cannot read property 'foo' of undefined at line 42");
        assert!(cleaned.contains("TypeError"));
        assert!(cleaned.contains("property"));
        assert!(cleaned.contains("undefined"));
        assert!(!cleaned.contains("42"));
        assert!(!cleaned.contains("at line"));
        assert!(!cleaned.contains("foo"));
        assert_eq!(cleaned, "TypeError: Cannot read property of undefined");
    }

    #[test]
    fn test_keeps_quoted_type_names() {
        let cleaned = TextSanitizer::clean(
            "Type 'string' is not assignable to type 'number'.",
        );
        assert_eq!(cleaned, "Type string is not assignable to type number .");
    }

    #[test]
    fn test_keeps_natural_language_quotes() {
        let cleaned = TextSanitizer::clean(r#"Expected "a closing brace" here"#);
        assert_eq!(cleaned, r#"Expected "a closing brace" here"#);
    }

    #[test]
    fn test_removes_paths_and_urls() {
        let cleaned = TextSanitizer::clean(
            "Module not found in /home/dev/app/src/index.js see https://example.com/docs/errors",
        );
        assert!(!cleaned.contains("/home"));
        assert!(!cleaned.contains("index.js"));
        assert!(!cleaned.contains("https"));
        assert!(cleaned.starts_with("Module not found in"));
    }

    #[test]
    fn test_removes_numeric_locators() {
        let cleaned = TextSanitizer::clean("app.ts(12,5): error TS2304: Cannot find name 'foo'.");
        assert!(!cleaned.contains("12"));
        assert!(!cleaned.contains("(12,5)"));
        assert!(cleaned.contains("Cannot find name"));
        assert!(cleaned.contains("TS2304"));

        let cleaned = TextSanitizer::clean("panic in main.rs:10:4 at position 7");
        assert!(!cleaned.contains("10"));
        assert!(!cleaned.contains("position"));
    }

    #[test]
    fn test_apostrophes_are_not_quotes() {
        let cleaned = TextSanitizer::clean("Property doesn't exist on 'config'");
        assert_eq!(cleaned, "Property doesn't exist on");
    }

    #[test]
    fn test_collapses_whitespace_and_handles_empty() {
        assert_eq!(TextSanitizer::clean("  a \n\t  b  "), "a b");
        assert_eq!(TextSanitizer::clean(""), "");
        assert_eq!(TextSanitizer::clean("42 'x' 7"), "");
    }

    #[test]
    fn test_placeholders_are_unique_and_letter_only() {
        let tokens: Vec<String> = (0..60).map(placeholder).collect();
        let unique: std::collections::HashSet<&String> = tokens.iter().collect();
        assert_eq!(unique.len(), tokens.len());
        assert!(tokens.iter().all(|t| !t.chars().any(|c| c.is_ascii_digit())));
        assert!(tokens.iter().all(|t| PLACEHOLDERS_ONLY.is_match(t)));
        assert!(tokens.iter().all(|t| !FILE_PATH.is_match(t) && !URL.is_match(t)));
    }

    #[test]
    fn test_preserved_tokens_survive_path_separators() {
        assert_eq!(
            TextSanitizer::clean("Type 'string/number' is not assignable to type 'never'"),
            "Type string number is not assignable to type never"
        );
        assert_eq!(
            TextSanitizer::clean("TypeError/RangeError happened"),
            "TypeError RangeError happened"
        );
    }

    #[test]
    fn test_placeholder_lookalikes_in_input_are_plain_text() {
        assert_eq!(
            TextSanitizer::clean("__KEEPA__ literal in message with TypeError"),
            "__KEEPA__ literal in message with TypeError"
        );
        let fenced = format!("{} leaked TypeError", placeholder(0));
        assert_eq!(TextSanitizer::clean(&fenced), "A leaked TypeError");
    }

    #[test]
    fn test_restores_many_preserved_tokens() {
        let message = "string number boolean null void any never object symbol bigint undefined unknown";
        assert_eq!(TextSanitizer::clean(message), message);
    }
}
