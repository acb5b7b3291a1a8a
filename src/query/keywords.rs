use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use super::compile_regex;

/// Snippets shorter than this carry no identifiers worth scanning for.
const MIN_CODE_LENGTH: usize = 5;

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    compile_regex(r"\b(?:function|class|interface|enum|type|const|let|var|def)\s+([A-Za-z_$][\w$]*)")
});
static METHOD_CALL: Lazy<Regex> = Lazy::new(|| compile_regex(r"\.([A-Za-z_$][\w$]*)\s*\("));
static TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    compile_regex(r"\b(?:type|interface)\s+([A-Za-z_$][\w$]*)\s*(?:<[^>{=]*>)?\s*[={]")
});

const STOPWORDS: &[&str] = &[
    "if", "for", "while", "switch", "case", "return", "break", "continue", "const", "let", "var",
    "function", "class", "interface", "type",
];

const UNIVERSAL_MEMBERS: &[&str] = &["length", "toString", "valueOf", "constructor", "prototype"];

pub struct CodeKeywordExtractor;

impl CodeKeywordExtractor {
    /// Identifiers declared or called in `code`, in order of first
    /// appearance, capped at `max_keywords`.
    pub fn extract(code: &str, max_keywords: usize) -> IndexSet<String> {
        if max_keywords == 0 || code.trim().chars().count() < MIN_CODE_LENGTH {
            return IndexSet::new();
        }

        let mut candidates: Vec<(usize, &str)> = Vec::new();
        for pattern in [&*DECLARATION, &*METHOD_CALL, &*TYPE_NAME] {
            candidates.extend(
                pattern
                    .captures_iter(code)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| (m.start(), m.as_str())),
            );
        }
        candidates.sort_by_key(|(position, _)| *position);

        candidates
            .into_iter()
            .map(|(_, name)| name)
            .filter(|name| Self::is_valid_keyword(name))
            .map(str::to_string)
            .collect::<IndexSet<String>>()
            .into_iter()
            .take(max_keywords)
            .collect()
    }

    pub fn is_valid_keyword(word: &str) -> bool {
        word.chars().count() > 2
            && !STOPWORDS.contains(&word)
            && !UNIVERSAL_MEMBERS.contains(&word)
            && !word.chars().all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(code: &str, max: usize) -> Vec<String> {
        CodeKeywordExtractor::extract(code, max).into_iter().collect()
    }

    #[test]
    fn test_extracts_declaration_and_skips_stoplisted_members() {
        let found = keywords("function doThing(x) { return x.toString(); }", 8);
        assert_eq!(found, vec!["doThing".to_string()]);
    }

    #[test]
    fn test_order_of_first_appearance() {
        let code = "const items = fetchAll();\nitems.forEach(render);\nclass Renderer {}\nitems.forEach(x => x);";
        assert_eq!(keywords(code, 8), vec!["items", "forEach", "Renderer"]);
    }

    #[test]
    fn test_type_declarations() {
        let code = "interface UserProps { name: string }\ntype Handler<T> = (t: T) => void;";
        assert_eq!(keywords(code, 8), vec!["UserProps", "Handler"]);
    }

    #[test]
    fn test_python_def() {
        assert_eq!(keywords("def parse_config(path):\n    pass", 8), vec!["parse_config"]);
    }

    #[test]
    fn test_truncates_to_max_keywords() {
        let code = "let alpha = 1; let bravo = 2; let charlie = 3; let delta = 4;";
        assert_eq!(keywords(code, 2), vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_short_or_empty_code_is_skipped() {
        assert!(keywords("", 8).is_empty());
        assert!(keywords("  a.b ", 8).is_empty());
    }

    #[test]
    fn test_zero_max_keywords() {
        let code = "function handleRequestWithAVeryLongName() { server.listen(); }";
        assert!(keywords(code, 0).is_empty());
    }

    #[test]
    fn test_is_valid_keyword() {
        assert!(CodeKeywordExtractor::is_valid_keyword("fetchUser"));
        assert!(!CodeKeywordExtractor::is_valid_keyword("x"));
        assert!(!CodeKeywordExtractor::is_valid_keyword("id"));
        assert!(!CodeKeywordExtractor::is_valid_keyword("while"));
        assert!(!CodeKeywordExtractor::is_valid_keyword("prototype"));
        assert!(!CodeKeywordExtractor::is_valid_keyword("12345"));
    }
}
