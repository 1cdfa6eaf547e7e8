use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("request failed"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Message suitable for a toast. Server-supplied text wins over the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api {
                message: Some(msg), ..
            } => msg.clone(),
            AppError::Rejected(msg) if !msg.is_empty() => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
