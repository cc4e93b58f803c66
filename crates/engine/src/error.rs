use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Knowledge corpus is empty")]
    EmptyCorpus,

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("{0}")]
    Other(String),
}
