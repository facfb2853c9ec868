use thiserror::Error;

/// A failed round-trip to the explorer API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-success status. The message is the body's
    /// `error` field, or the status reason when the body has none.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// `API_URL` does not form a usable base URL.
    #[error("invalid API_URL: {0}")]
    InvalidUrl(String),

    /// Connection, timeout or body decoding failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// The query looked like a payment string but could not be decoded.
#[derive(Debug, Error)]
#[error("could not decode {variant}: {reason}")]
pub struct DecodeError {
    pub variant: &'static str,
    pub reason: String,
}

impl DecodeError {
    pub fn new(variant: &'static str, reason: impl Into<String>) -> Self {
        Self {
            variant,
            reason: reason.into(),
        }
    }
}

/// No node could be resolved for the query.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The single search call failed.
    #[error("{0}")]
    Search(#[from] FetchError),

    /// Every key lookup failed. Reasons are kept in key order.
    #[error("{}", .0.join(", "))]
    AllKeysFailed(Vec<String>),
}

/// Query-level failure of the search pipeline.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A newer query was issued on the same session before this one finished.
    #[error("query was superseded by a newer one")]
    Superseded,
}
