use thiserror::Error;
use crate::persona::Persona;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RocketError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("The {0} thread is already waiting for a reply")]
    Busy(Persona),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl From<serde_json::Error> for RocketError {
    fn from(e: serde_json::Error) -> Self {
        RocketError::Serialization(e.to_string())
    }
}
