//! Single-attempt case lookup with a deterministic offline fallback.

use std::sync::Arc;

use async_trait::async_trait;
use docketline_core::{Case, DocketNormalizer, RawDocket, SyntheticDocket, canonicalize};
use tracing::{info, warn};

use crate::error::{FailureClass, FetchError, TransportError};

/// A registry that can be searched by bare case number.
///
/// `Ok(None)` means the registry answered and has no such case.
#[async_trait]
pub trait DocketSource: Send + Sync {
    async fn search(&self, case_id: &str) -> Result<Option<RawDocket>, TransportError>;
}

#[async_trait]
impl<T: DocketSource + ?Sized> DocketSource for Arc<T> {
    async fn search(&self, case_id: &str) -> Result<Option<RawDocket>, TransportError> {
        self.as_ref().search(case_id).await
    }
}

/// A normalized case and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub case: Case,
    /// `true` when the registry was unreachable and the case was synthesised
    /// from the query.
    pub is_synthetic: bool,
    /// Failure class that triggered the fallback, if any.
    pub fallback: Option<FailureClass>,
}

/// Looks a case up in a [`DocketSource`], falling back to a
/// [`SyntheticDocket`] when the source cannot be reached.
///
/// Makes exactly one upstream attempt per call; retries are the caller's
/// policy. A "not found" answer is returned as an error and never masked.
pub struct ResilientFetcher<S> {
    source: S,
    normalizer: DocketNormalizer,
    synthetic: SyntheticDocket,
}

impl<S: DocketSource> ResilientFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            normalizer: DocketNormalizer::default(),
            synthetic: SyntheticDocket::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: DocketNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_synthetic(mut self, synthetic: SyntheticDocket) -> Self {
        self.synthetic = synthetic;
        self
    }

    pub fn normalizer(&self) -> &DocketNormalizer {
        &self.normalizer
    }

    /// Find and normalize the case for a user-typed case number.
    pub async fn find_case(&self, query: &str) -> Result<FetchResult, FetchError> {
        let case_id = canonicalize(query);
        info!(case_id = %case_id, "searching registry");

        match self.source.search(&case_id).await {
            Ok(Some(raw)) => {
                let case = self.normalizer.normalize(&raw)?;
                info!(
                    case_number = %case.case_number,
                    stage = case.current_stage.as_str(),
                    "case found"
                );
                Ok(FetchResult {
                    case,
                    is_synthetic: false,
                    fallback: None,
                })
            }
            Ok(None) => {
                info!(case_id = %case_id, "case not found");
                Err(FetchError::NotFound {
                    case_number: case_id,
                })
            }
            Err(err) => {
                let class = err.class();
                match class {
                    FailureClass::Network => warn!(
                        error = %err,
                        "registry unreachable (network error), falling back to synthetic docket"
                    ),
                    FailureClass::Status(status) => warn!(
                        status,
                        auth = class.is_auth(),
                        error = %err,
                        "registry returned an error status, falling back to synthetic docket"
                    ),
                    FailureClass::Decode => warn!(
                        error = %err,
                        "registry payload malformed, falling back to synthetic docket"
                    ),
                }
                let case = self.synthetic_case(query)?;
                Ok(FetchResult {
                    case,
                    is_synthetic: true,
                    fallback: Some(class),
                })
            }
        }
    }

    /// The case the fallback would produce for `query`, without touching the
    /// registry.
    pub fn synthetic_case(&self, query: &str) -> Result<Case, FetchError> {
        let raw = self.synthetic.for_query(query);
        Ok(self.normalizer.normalize(&raw)?)
    }
}
