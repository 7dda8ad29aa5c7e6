use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OpenAI API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OpenAI returned no completion choices")]
    NoChoices,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Network(err.to_string())
    }
}
