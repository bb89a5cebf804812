use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReasoningError>;

#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("Similarity search failed: {0}")]
    SearchFailed(String),

    #[error("Context value error: {0}")]
    Value(#[from] serde_json::Error),
}
