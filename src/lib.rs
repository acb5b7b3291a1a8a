pub mod config;
pub mod detect;
pub mod query;
pub mod render;
pub mod search;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::Config;
pub use detect::{ErrorDetector, SourceFile};
pub use query::{ErrorContext, ErrorType, QueryBuilder, QueryBuilderConfig};
pub use search::{ResultAggregator, SearchResult, Searcher};
