use std::time::Duration;
use thiserror::Error;

/// Why a page could not be rendered
#[derive(Debug, Error)]
pub enum RenderCause {
    #[error("could not open a browser session: {0}")]
    Session(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("page did not render within {0:?}")]
    Timeout(Duration),

    #[error("DOM access failed: {0}")]
    Dom(String),
}

/// A page failed to render. Fatal to the request.
#[derive(Debug, Error)]
#[error("failed to render {address}: {cause}")]
pub struct RenderError {
    pub address: String,
    #[source]
    pub cause: RenderCause,
}

impl RenderError {
    pub fn new(address: impl Into<String>, cause: RenderCause) -> Self {
        Self {
            address: address.into(),
            cause,
        }
    }
}

/// A single image download failed. Never aborts the pipeline.
#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The output sink or the container writer failed
#[derive(Debug, Error)]
pub enum ArchiveWriteError {
    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),

    #[error("zip encoding failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("receiver closed the stream")]
    ReceiverClosed,
}

/// Top-level failure of an archiving request
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("URL is required")]
    InvalidInput,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("archive stream aborted: {0}")]
    ArchiveWrite(#[from] ArchiveWriteError),
}

impl ArchiveError {
    /// Whether the error happened before any archive bytes could have been emitted
    pub fn is_before_output(&self) -> bool {
        matches!(self, ArchiveError::InvalidInput | ArchiveError::Render(_))
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
