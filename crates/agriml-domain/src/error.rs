use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Invalid soil moisture reading: {0}")]
    InvalidReading(String),

    #[error("Publish error: {0}")]
    PublishError(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
