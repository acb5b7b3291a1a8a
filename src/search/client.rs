use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::SearchError;
use super::response::{Answer, ApiResponse, Question};

pub const DEFAULT_BASE_URL: &str = "https://api.stackexchange.com/2.3";
pub const DEFAULT_SITE: &str = "stackoverflow";

/// Stack Exchange reports throttling as a 400 with this error id.
const THROTTLE_VIOLATION: u32 = 502;
const ANSWERS_PER_QUESTION: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

/// Per-request knobs handed to a [`SearchBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub page_size: u32,
    pub timeout_ms: u64,
    pub api_key: Option<String>,
    /// Only return questions that have an accepted answer.
    pub accepted_only: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            timeout_ms: 15_000,
            api_key: None,
            accepted_only: false,
        }
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search_questions(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Question>, SearchError>;

    async fn fetch_answers(
        &self,
        question_ids: &[u64],
        options: &SearchOptions,
    ) -> Result<Vec<Answer>, SearchError>;
}

pub struct StackExchangeClient {
    client: reqwest::Client,
    base_url: String,
    site: String,
}

impl StackExchangeClient {
    pub fn new(base_url: impl Into<String>, site: impl Into<String>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stackscrap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            site: site.into(),
        })
    }

    fn base_params(&self, options: &SearchOptions) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("site", self.site.clone()),
            ("order", "desc".to_string()),
            ("filter", "withbody".to_string()),
        ];
        if let Some(key) = options.api_key.as_deref().filter(|k| !k.is_empty()) {
            params.push(("key", key.to_string()));
        }
        params
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        options: &SearchOptions,
    ) -> Result<Vec<T>, SearchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting");

        let response = self
            .client
            .get(&url)
            .query(params)
            .timeout(Duration::from_millis(options.timeout_ms))
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.text().await?;
        let parsed: ApiResponse<T> = serde_json::from_str(&body)?;

        if let Some(remaining) = parsed.quota_remaining {
            debug!(quota_remaining = remaining, "stack exchange quota");
        }

        Ok(parsed.items)
    }
}

async fn check_status(response: Response) -> Result<Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SearchError::RateLimited("Rate limit exceeded".to_string()));
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());

    match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
        Ok(envelope) if envelope.error_id == Some(THROTTLE_VIOLATION) => {
            Err(SearchError::RateLimited(envelope.error_message.unwrap_or_default()))
        }
        Ok(envelope) => Err(SearchError::Api {
            status: status.as_u16(),
            message: envelope.error_message.unwrap_or(body),
        }),
        Err(_) => Err(SearchError::Api {
            status: status.as_u16(),
            message: body,
        }),
    }
}

#[async_trait]
impl SearchBackend for StackExchangeClient {
    async fn search_questions(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Question>, SearchError> {
        let mut params = self.base_params(options);
        params.extend([
            ("sort", "relevance".to_string()),
            ("q", query.to_string()),
            ("pagesize", options.page_size.to_string()),
            ("answers", "1".to_string()),
        ]);
        if options.accepted_only {
            params.push(("accepted", "True".to_string()));
        }

        self.get("/search/advanced", &params, options).await
    }

    async fn fetch_answers(
        &self,
        question_ids: &[u64],
        options: &SearchOptions,
    ) -> Result<Vec<Answer>, SearchError> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = question_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(";");
        let page_size = (question_ids.len() * ANSWERS_PER_QUESTION).min(MAX_PAGE_SIZE);

        let mut params = self.base_params(options);
        params.extend([
            ("sort", "votes".to_string()),
            ("pagesize", page_size.to_string()),
        ]);

        self.get(&format!("/questions/{ids}/answers"), &params, options)
            .await
    }
}
