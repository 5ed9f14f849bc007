use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
