use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ValidationErrors> for QueryError {
    fn from(errors: ValidationErrors) -> Self {
        QueryError::Validation(errors.to_string())
    }
}
