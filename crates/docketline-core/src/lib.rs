pub mod case_number;
pub mod classifier;
pub mod docket;
pub mod error;
pub mod normalize;
pub mod stage;
pub mod synthetic;

pub use case_number::{CaseNumber, canonicalize, format_case_number};
pub use classifier::{EventClassifier, StageClassification};
pub use docket::{Case, Event, RawDocket, RawEvent, Severity};
pub use error::DocketError;
pub use normalize::{DocketNormalizer, FILED_TITLE};
pub use stage::{Stage, StageNames, StageState, StageView, stage_views};
pub use synthetic::SyntheticDocket;
