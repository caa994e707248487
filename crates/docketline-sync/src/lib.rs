//! Registry layer: the `DocketSource` seam, the Datajud HTTP client, and the
//! single-attempt fetch policy with synthetic fallback.

mod error;
pub mod fetcher;

#[cfg(feature = "http")]
pub mod datajud;

pub use error::{FailureClass, FetchError, TransportError};
pub use fetcher::{DocketSource, FetchResult, ResilientFetcher};

#[cfg(feature = "http")]
pub use datajud::{DatajudClient, DatajudConfig};
