use std::time::Duration;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failure of a single provider attempt. None of these escape the cascade;
/// they only decide whether the next provider gets a turn.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API key not configured")]
    Configuration { provider: &'static str },
    #[error("{provider} request failed: {status} - {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("no image found in {provider}")]
    NoResult { provider: &'static str },
    #[error("{provider} did not answer within {after:?}")]
    Timeout {
        provider: &'static str,
        after: Duration,
    },
    #[error("{provider} returned a url marked as broken: {url}")]
    RejectedUrl { provider: &'static str, url: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Configuration { .. } => "configuration",
            ProviderError::Status { .. } => "status",
            ProviderError::NoResult { .. } => "no_result",
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::RejectedUrl { .. } => "rejected_url",
            ProviderError::Transport(_) => "transport",
        }
    }
}
