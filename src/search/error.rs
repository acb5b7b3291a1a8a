use thiserror::Error;

use crate::query::QueryError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Rate limit error: {0}")]
    RateLimited(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            SearchError::Parse(error.to_string())
        } else {
            SearchError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::Parse(format!("JSON deserialization error: {}", error))
    }
}
