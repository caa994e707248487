//! Docket normalization: raw registry movements → citizen-readable [`Case`].

use chrono::{DateTime, FixedOffset, Offset, Utc};
use tracing::debug;

use crate::case_number::format_case_number;
use crate::classifier::EventClassifier;
use crate::docket::{Case, Event, RawDocket};
use crate::error::DocketError;

/// Title of the pseudo-event injected at the filing date of every docket.
pub const FILED_TITLE: &str = "Processo Distribuído";

/// Day-first short date, as used in pt-BR.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Brasília time, UTC−03:00.
const DEFAULT_OFFSET_SECS: i32 = -3 * 3600;

struct Entry {
    at: DateTime<Utc>,
    title: String,
}

/// Turns a [`RawDocket`] into a [`Case`].
///
/// Stateless apart from its configuration; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct DocketNormalizer {
    classifier: EventClassifier,
    display_offset: FixedOffset,
    date_format: String,
}

impl Default for DocketNormalizer {
    fn default() -> Self {
        Self::new(EventClassifier::default())
    }
}

impl DocketNormalizer {
    pub fn new(classifier: EventClassifier) -> Self {
        Self {
            classifier,
            display_offset: FixedOffset::east_opt(DEFAULT_OFFSET_SECS).unwrap_or(Utc.fix()),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Set the timezone in which event dates are rendered.
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// Set the `chrono` strftime pattern for event dates.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    /// Normalize a registry docket.
    ///
    /// Every movement is relabelled, the filing pseudo-event is added, and the
    /// result is sorted newest first (stable, so equal timestamps keep input
    /// order). The newest entry becomes the latest event, enriched with a
    /// description and the severity of the stage inferred from all titles.
    pub fn normalize(&self, raw: &RawDocket) -> Result<Case, DocketError> {
        // The filed pseudo-event must be present exactly once, so a docket
        // without a valid filing date is rejected even when it has movements.
        let Some(filed_at) = raw.filed_at else {
            return Err(DocketError::EmptyHistory {
                case_number: raw.case_number.clone(),
            });
        };

        let mut entries: Vec<Entry> = raw
            .events
            .iter()
            .map(|ev| Entry {
                at: ev.timestamp,
                title: self.classifier.simplify_title(&ev.title),
            })
            .collect();
        entries.push(Entry {
            at: filed_at,
            title: FILED_TITLE.to_string(),
        });

        entries.sort_by(|a, b| b.at.cmp(&a.at));

        let classification = self
            .classifier
            .classify_stage(entries.iter().map(|e| e.title.as_str()));

        let mut entries = entries.into_iter();
        let Some(latest) = entries.next() else {
            return Err(DocketError::EmptyHistory {
                case_number: raw.case_number.clone(),
            });
        };

        let latest_event = Event {
            description: Some(self.classifier.describe(&latest.title).to_string()),
            severity: Some(classification.severity),
            date: self.display_date(latest.at),
            title: latest.title,
        };

        let history: Vec<Event> = entries
            .map(|e| Event {
                date: self.display_date(e.at),
                title: e.title,
                description: None,
                severity: None,
            })
            .collect();

        debug!(
            case_number = %raw.case_number,
            stage = classification.stage.as_str(),
            history = history.len(),
            "normalized docket"
        );

        Ok(Case {
            case_number: format_case_number(&raw.case_number),
            current_stage: classification.stage,
            latest_event,
            history,
        })
    }

    fn display_date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.display_offset)
            .format(&self.date_format)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docket::{RawEvent, Severity};
    use crate::stage::Stage;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn docket(events: Vec<RawEvent>) -> RawDocket {
        RawDocket {
            case_number: "00123456720248260001".into(),
            filed_at: Some(at(2024, 7, 1, 10)),
            events,
        }
    }

    fn scenario_a() -> RawDocket {
        docket(vec![
            RawEvent::new(at(2024, 7, 15, 14), "Ato Ordinatório - Citação"),
            RawEvent::new(at(2024, 7, 20, 11), "Juntada de Petição Inicial"),
            RawEvent::new(at(2024, 8, 25, 9), "Audiência de Conciliação Designada"),
        ])
    }

    #[test]
    fn scenario_a_hearing_scheduled() {
        let case = DocketNormalizer::default().normalize(&scenario_a()).unwrap();

        assert_eq!(case.case_number, "0012345-67.2024.8.26.0001");
        assert_eq!(case.current_stage, Stage::Hearing);
        assert_eq!(case.current_stage_index(), 2);

        assert_eq!(case.latest_event.title, "Audiência de Conciliação Marcada");
        assert_eq!(case.latest_event.date, "25/08/2024");
        assert_eq!(case.latest_event.severity, Some(Severity::Medium));
        assert!(
            case.latest_event
                .description
                .as_deref()
                .unwrap()
                .starts_with("Sua audiência foi agendada")
        );

        let titles: Vec<&str> = case.history.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Novo Documento Adicionado",
                "Citação do Réu Realizada",
                "Processo Distribuído",
            ]
        );
        let dates: Vec<&str> = case.history.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["20/07/2024", "15/07/2024", "01/07/2024"]);
    }

    #[test]
    fn scenario_b_empty_events() {
        let case = DocketNormalizer::default().normalize(&docket(vec![])).unwrap();
        assert_eq!(case.latest_event.title, FILED_TITLE);
        assert_eq!(case.latest_event.date, "01/07/2024");
        assert_eq!(case.current_stage, Stage::Filed);
        assert_eq!(case.latest_event.severity, Some(Severity::Medium));
        assert!(case.history.is_empty());
    }

    #[test]
    fn history_length_matches_event_count() {
        let n = DocketNormalizer::default();
        for count in 0..6u32 {
            let events = (0..count)
                .map(|i| RawEvent::new(at(2024, 8, 1 + i, 12), format!("Movimento {i}")))
                .collect::<Vec<_>>();
            let case = n.normalize(&docket(events)).unwrap();
            assert_eq!(case.history.len(), count as usize);
        }
    }

    #[test]
    fn only_latest_carries_description_and_severity() {
        let case = DocketNormalizer::default().normalize(&scenario_a()).unwrap();
        assert!(case.latest_event.description.is_some());
        assert!(case.latest_event.severity.is_some());
        for event in &case.history {
            assert!(event.description.is_none());
            assert!(event.severity.is_none());
        }
    }

    #[test]
    fn history_excludes_latest() {
        let case = DocketNormalizer::default().normalize(&scenario_a()).unwrap();
        assert!(
            !case
                .history
                .iter()
                .any(|e| e.title == case.latest_event.title && e.date == case.latest_event.date)
        );
    }

    #[test]
    fn scenario_e_archived_after_judgment() {
        let raw = docket(vec![
            RawEvent::new(at(2024, 9, 2, 10), "Sentença Registrada"),
            RawEvent::new(at(2024, 10, 10, 10), "Arquivado Definitivamente"),
        ]);
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(case.current_stage, Stage::Closed);
        assert_eq!(case.latest_event.title, "Arquivado Definitivamente");
        assert_eq!(case.latest_event.severity, Some(Severity::Low));
        // Unmapped label falls back to the generic description.
        assert!(
            case.latest_event
                .description
                .as_deref()
                .unwrap()
                .starts_with("Esta é uma atualização padrão")
        );
    }

    #[test]
    fn stage_uses_all_titles_not_only_latest() {
        // Latest movement is a generic one; the archive entry is older.
        let raw = docket(vec![
            RawEvent::new(at(2024, 9, 1, 10), "Baixado Definitivamente"),
            RawEvent::new(at(2024, 9, 5, 10), "Certidão expedida"),
        ]);
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(case.latest_event.title, "Certidão expedida");
        assert_eq!(case.current_stage, Stage::Closed);
    }

    #[test]
    fn ties_keep_input_order() {
        let same = at(2024, 7, 1, 10);
        let raw = docket(vec![
            RawEvent::new(same, "Primeiro"),
            RawEvent::new(same, "Segundo"),
        ]);
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        // Filed pseudo-event shares the timestamp and was appended last.
        assert_eq!(case.latest_event.title, "Primeiro");
        let titles: Vec<&str> = case.history.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Segundo", FILED_TITLE]);
    }

    #[test]
    fn unsorted_input_is_sorted_newest_first() {
        let raw = docket(vec![
            RawEvent::new(at(2024, 8, 25, 9), "C"),
            RawEvent::new(at(2024, 7, 15, 9), "A"),
            RawEvent::new(at(2024, 8, 1, 9), "B"),
        ]);
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(case.latest_event.title, "C");
        let titles: Vec<&str> = case.history.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A", FILED_TITLE]);
    }

    #[test]
    fn missing_filing_date_is_empty_history() {
        let raw = RawDocket {
            case_number: "123".into(),
            filed_at: None,
            events: vec![],
        };
        let err = DocketNormalizer::default().normalize(&raw).unwrap_err();
        assert_eq!(
            err,
            DocketError::EmptyHistory {
                case_number: "123".into()
            }
        );
    }

    #[test]
    fn malformed_case_number_passes_through() {
        let mut raw = docket(vec![]);
        raw.case_number = "12345".into();
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(case.case_number, "12345");
    }

    #[test]
    fn dates_render_in_display_offset() {
        // 01:00 UTC is still the previous day in Brasília.
        let mut raw = docket(vec![]);
        raw.filed_at = Some(at(2024, 7, 2, 1));
        let case = DocketNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(case.latest_event.date, "01/07/2024");

        let utc = DocketNormalizer::default()
            .with_display_offset(FixedOffset::east_opt(0).unwrap())
            .with_date_format("%Y-%m-%d");
        let case = utc.normalize(&raw).unwrap();
        assert_eq!(case.latest_event.date, "2024-07-02");
    }

    #[test]
    fn normalization_is_deterministic() {
        let n = DocketNormalizer::default();
        assert_eq!(n.normalize(&scenario_a()), n.normalize(&scenario_a()));
    }
}
