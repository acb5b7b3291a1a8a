use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

mod aggregate;
mod client;
mod error;
mod response;

pub use aggregate::{AnswerGroups, ResultAggregator};
pub use client::{SearchBackend, SearchOptions, StackExchangeClient, DEFAULT_BASE_URL, DEFAULT_SITE};
pub use error::SearchError;
pub use response::{Answer, ApiResponse, Owner, Question};

use crate::config::Config;
use crate::query::{ErrorContext, QueryBuilder};

/// Outcome of one search: the query that was sent, the questions in the
/// order the backend ranked them, and their answers keyed in that same
/// question order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    query: String,
    questions: Vec<Question>,
    answers: AnswerGroups,
    timestamp: DateTime<Utc>,
}

impl SearchResult {
    pub fn new(
        query: impl Into<String>,
        questions: Vec<Question>,
        answers: Vec<Answer>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let answers =
            ResultAggregator::order_by_questions(ResultAggregator::group(answers), &questions);
        Self {
            query: query.into(),
            questions,
            answers,
            timestamp,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerGroups {
        &self.answers
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Ranked answers for `question_id`; empty when none were fetched.
    pub fn answers_for(&self, question_id: u64) -> &[Answer] {
        self.answers
            .get(&question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Questions paired with their ranked answers, in question order.
    pub fn iter(&self) -> impl Iterator<Item = (&Question, &[Answer])> + '_ {
        self.questions
            .iter()
            .map(move |question| (question, self.answers_for(question.id)))
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Runs a full search: query synthesis, question search, answer fetch and
/// aggregation.
pub struct Searcher<B: SearchBackend> {
    backend: B,
    builder: QueryBuilder,
    options: SearchOptions,
    min_score: i64,
}

impl Searcher<StackExchangeClient> {
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let backend = StackExchangeClient::new(&config.search.base_url, &config.search.site)?;
        let builder = QueryBuilder::new(config.query.clone())?;
        Ok(Self::new(
            backend,
            builder,
            config.search.options(),
            config.search.min_score(),
        ))
    }
}

impl<B: SearchBackend> Searcher<B> {
    pub fn new(backend: B, builder: QueryBuilder, options: SearchOptions, min_score: i64) -> Self {
        Self {
            backend,
            builder,
            options,
            min_score,
        }
    }

    pub fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub async fn search(&self, context: &ErrorContext) -> Result<SearchResult, SearchError> {
        let query = self.builder.build(context);
        info!(%query, "searching stack overflow");

        let questions: Vec<Question> = self
            .backend
            .search_questions(&query, &self.options)
            .await?
            .into_iter()
            .filter(|question| question.score >= self.min_score)
            .collect();

        let question_ids: Vec<u64> = questions.iter().map(|q| q.id).collect();
        let answers = if question_ids.is_empty() {
            Vec::new()
        } else {
            match self.backend.fetch_answers(&question_ids, &self.options).await {
                Ok(answers) => answers,
                Err(e) => {
                    warn!(error = %e, "failed to fetch answers, showing questions only");
                    Vec::new()
                }
            }
        };

        info!(
            questions = questions.len(),
            answers = answers.len(),
            "search complete"
        );
        Ok(SearchResult::new(query, questions, answers, Utc::now()))
    }
}
