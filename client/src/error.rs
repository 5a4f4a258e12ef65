use thiserror::Error;

use crate::problem::ApiError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(ApiError),

    #[error("API error: {0}")]
    Api(ApiError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to deserialize response: {0}")]
    Deserialization(String),
}

impl ClientError {
    /// Problem data of a rejected request, for either rejection kind.
    pub fn problem(&self) -> Option<&ApiError> {
        match self {
            ClientError::Auth(err) | ClientError::Api(err) => Some(err),
            ClientError::Request(_) | ClientError::Deserialization(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
