//! Terminal presentation of a [`SearchResult`].
//!
//! Everything coming back from the API is untrusted: markup is stripped,
//! entities decoded and control characters dropped before anything reaches
//! the terminal.

use colored::*;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt::Write;

use crate::query::compile_regex;
use crate::search::{Answer, Question, SearchResult};

const EXCERPT_LENGTH: usize = 400;
const MIN_CODE_BLOCK_LENGTH: usize = 10;

static TAG: Lazy<Regex> = Lazy::new(|| compile_regex(r"(?s)<[^>]*>"));
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| compile_regex(r"(?is)<code[^>]*>(.*?)</code>"));
static ENTITY: Lazy<Regex> = Lazy::new(|| compile_regex(r"&(#[xX][0-9a-fA-F]+|#\d+|[a-zA-Z]+);"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| compile_regex(r"\n\s*\n+"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreClass {
    Positive,
    Negative,
    Neutral,
}

impl ScoreClass {
    pub fn of(score: i64) -> Self {
        match score {
            s if s > 0 => ScoreClass::Positive,
            s if s < 0 => ScoreClass::Negative,
            _ => ScoreClass::Neutral,
        }
    }

    fn paint(&self, text: String) -> ColoredString {
        match self {
            ScoreClass::Positive => text.green(),
            ScoreClass::Negative => text.red(),
            ScoreClass::Neutral => text.normal(),
        }
    }
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Drops terminal control sequences while keeping line structure.
pub fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Plain text of an HTML fragment.
pub fn strip_html_tags(html: &str) -> String {
    let text = decode_entities(&TAG.replace_all(html, ""));
    let text = strip_control(&text);
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}

/// Contents of `<code>` blocks long enough to be worth showing.
pub fn extract_code_blocks(html: &str) -> Vec<String> {
    CODE_BLOCK
        .captures_iter(html)
        .map(|caps| strip_html_tags(&caps[1]))
        .filter(|code| code.chars().count() > MIN_CODE_BLOCK_LENGTH)
        .collect()
}

/// First `max_chars` characters of the answer text, with an ellipsis when
/// anything was cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_html_tags(html);
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

pub struct Renderer {
    max_answers: usize,
}

impl Renderer {
    pub fn new(max_answers: usize) -> Self {
        Self { max_answers }
    }

    pub fn render(&self, result: &SearchResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", "Query:".bold(), strip_control(result.query()).cyan());

        if result.is_empty() {
            let _ = writeln!(out, "\n{}", "No results found".yellow().bold());
            let _ = writeln!(
                out,
                "The error message might be too specific; try a more general search term."
            );
            return out;
        }

        let _ = writeln!(
            out,
            "Found {} results from Stack Overflow\n",
            result.questions().len()
        );
        for (question, answers) in result.iter() {
            self.render_question(&mut out, question, answers);
        }
        out
    }

    fn render_question(&self, out: &mut String, question: &Question, answers: &[Answer]) {
        let title = strip_control(&decode_entities(&question.title));
        let _ = writeln!(out, "{}", title.bold());
        let _ = writeln!(
            out,
            "  {} • {} answers • {} views • {}",
            ScoreClass::of(question.score).paint(format!("▲ {}", question.score)),
            question.answer_count,
            question.view_count,
            if question.is_answered {
                "✓ Answered".green()
            } else {
                "Unanswered".dimmed()
            }
        );
        if !question.tags.is_empty() {
            let tags = question
                .tags
                .iter()
                .map(|tag| format!("[{}]", strip_control(tag)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "  {}", tags.blue());
        }
        let _ = writeln!(out, "  {}", strip_control(&question.link).underline());

        if answers.is_empty() {
            let _ = writeln!(out, "  {}\n", "No answers yet".italic().dimmed());
            return;
        }
        for answer in answers.iter().take(self.max_answers) {
            self.render_answer(out, answer);
        }
        if answers.len() > self.max_answers {
            let _ = writeln!(
                out,
                "  … {} more answers at {}#answers",
                answers.len() - self.max_answers,
                strip_control(&question.link)
            );
        }
        let _ = writeln!(out);
    }

    fn render_answer(&self, out: &mut String, answer: &Answer) {
        let mut meta = vec![ScoreClass::of(answer.score)
            .paint(format!("▲ {}", answer.score))
            .to_string()];
        if answer.is_accepted {
            meta.push("✓ ACCEPTED".green().bold().to_string());
        }
        if let Some(owner) = &answer.owner {
            meta.push(format!("by {}", strip_control(&decode_entities(&owner.display_name))));
        }
        let _ = writeln!(out, "  ┃ {}", meta.join("  "));

        for line in excerpt(&answer.body, EXCERPT_LENGTH).lines() {
            let _ = writeln!(out, "  ┃ {}", line);
        }
        if let Some(code) = extract_code_blocks(&answer.body).first() {
            let _ = writeln!(out, "  ┃ {}", "Code example:".dimmed());
            for line in code.lines() {
                let _ = writeln!(out, "  ┃   {}", line.yellow());
            }
        }
        let _ = writeln!(out, "  ┃ https://stackoverflow.com/a/{}", answer.id);
    }
}
