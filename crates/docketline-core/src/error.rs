use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocketError {
    /// The docket produced no events after normalization, which only happens
    /// when the filing date itself is missing or unparseable.
    #[error("docket for {case_number} has an empty history")]
    EmptyHistory { case_number: String },
}
