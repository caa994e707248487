use docketline_core::DocketError;
use thiserror::Error;

/// Outcome of [`ResilientFetcher::find_case`](crate::ResilientFetcher::find_case)
/// that the caller must handle. Transport failures never appear here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no case found for {case_number}")]
    NotFound { case_number: String },

    #[error(transparent)]
    Docket(#[from] DocketError),
}

/// Failure to obtain an answer from the registry at all.
#[derive(Debug, Error)]
pub enum TransportError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("registry payload could not be decoded: {0}")]
    Decode(String),

    #[error("registry unreachable: {0}")]
    Unreachable(String),
}

/// Coarse failure class recorded when the fetcher falls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Network,
    Status(u16),
    Decode,
}

impl TransportError {
    pub fn class(&self) -> FailureClass {
        match self {
            #[cfg(feature = "http")]
            Self::Http(e) => match e.status() {
                Some(status) => FailureClass::Status(status.as_u16()),
                None if e.is_decode() => FailureClass::Decode,
                None => FailureClass::Network,
            },
            Self::Status { status, .. } => FailureClass::Status(*status),
            Self::Decode(_) => FailureClass::Decode,
            Self::Unreachable(_) => FailureClass::Network,
        }
    }
}

impl FailureClass {
    /// Whether the status points at a rejected API key.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Status(401 | 403))
    }
}
