//! Deterministic placeholder dockets for offline use.
//!
//! When the registry is unreachable the fetcher substitutes a docket built
//! purely from the query string, so the same query always produces the same
//! case. Handy for demos and tests too.

use chrono::{DateTime, TimeZone, Utc};

use crate::case_number::canonicalize;
use crate::docket::{RawDocket, RawEvent};

/// Template for synthetic dockets: a filing date plus a fixed movement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticDocket {
    filed_at: DateTime<Utc>,
    events: Vec<RawEvent>,
}

impl Default for SyntheticDocket {
    /// A case filed on 2024-07-01, served, with a petition and a conciliation
    /// hearing scheduled.
    fn default() -> Self {
        let at = |m, d, h, min| Utc.with_ymd_and_hms(2024, m, d, h, min, 0).single();
        let events = [
            (at(7, 15, 14, 30), "Ato Ordinatório - Citação"),
            (at(7, 20, 11, 0), "Juntada de Petição Inicial"),
            (at(8, 25, 9, 0), "Audiência de Conciliação Designada"),
        ]
        .into_iter()
        .filter_map(|(ts, title)| ts.map(|ts| RawEvent::new(ts, title)))
        .collect();

        Self {
            filed_at: at(7, 1, 10, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            events,
        }
    }
}

impl SyntheticDocket {
    pub fn new(filed_at: DateTime<Utc>, events: Vec<RawEvent>) -> Self {
        Self { filed_at, events }
    }

    /// Build the synthetic docket for a user query.
    ///
    /// The case number is the canonicalised query; everything else comes from
    /// the template.
    pub fn for_query(&self, query: &str) -> RawDocket {
        RawDocket {
            case_number: canonicalize(query),
            filed_at: Some(self.filed_at),
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DocketNormalizer;
    use crate::stage::Stage;

    #[test]
    fn uses_canonical_query_as_case_number() {
        let raw = SyntheticDocket::default().for_query("0012345-67.2024.8.26.0001");
        assert_eq!(raw.case_number, "00123456720248260001");
        assert_eq!(raw.events.len(), 3);
        assert!(raw.filed_at.is_some());
    }

    #[test]
    fn same_query_same_docket() {
        let template = SyntheticDocket::default();
        assert_eq!(template.for_query("42"), template.for_query("42"));
        assert_eq!(
            SyntheticDocket::default().for_query("42"),
            template.for_query("4-2")
        );
    }

    #[test]
    fn default_template_normalizes_to_hearing() {
        let raw = SyntheticDocket::default().for_query("0012345-67.2024.8.26.0001");
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(case.case_number, "0012345-67.2024.8.26.0001");
        assert_eq!(case.current_stage, Stage::Hearing);
        assert_eq!(case.history.len(), 3);
    }

    #[test]
    fn custom_template() {
        let filed = Utc.with_ymd_and_hms(2023, 1, 10, 12, 0, 0).unwrap();
        let template = SyntheticDocket::new(filed, vec![]);
        let raw = template.for_query("1");
        assert_eq!(raw.filed_at, Some(filed));
        assert!(raw.events.is_empty());
    }
}
