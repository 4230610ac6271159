use crate::http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Unknown paste service at {url}")]
    UnknownService { url: String },

    #[error("Failed to fetch paste data: {0}")]
    Fetch(#[from] HttpError),

    #[error("Failed to read fiddle at {url}: {message}")]
    Fiddle { url: String, message: String },
}

pub type PasteResult<T> = Result<T, PasteError>;
