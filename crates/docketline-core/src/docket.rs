//! Raw registry dockets and the normalized case they become.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A single movement as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub timestamp: DateTime<Utc>,
    pub title: String,
}

impl RawEvent {
    pub fn new(timestamp: DateTime<Utc>, title: impl Into<String>) -> Self {
        Self {
            timestamp,
            title: title.into(),
        }
    }
}

/// One registry hit: the case identifier, filing date and movements.
///
/// `filed_at` is `None` when the registry supplied a filing date that could
/// not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocket {
    pub case_number: String,
    pub filed_at: Option<DateTime<Utc>>,
    pub events: Vec<RawEvent>,
}

/// Coarse status indicator attached to the latest event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Traffic-light colour shown next to the latest event.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "yellow",
            Self::High => "red",
        }
    }
}

/// A display-ready docket event.
///
/// `description` and `severity` are only set on [`Case::latest_event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// A normalized case, ready for a progress timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    /// Punctuated CNJ number, or the registry value verbatim if malformed.
    pub case_number: String,
    pub current_stage: Stage,
    pub latest_event: Event,
    /// Older events, newest first. Never contains `latest_event`.
    pub history: Vec<Event>,
}

impl Case {
    pub fn current_stage_index(&self) -> usize {
        self.current_stage.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_colours() {
        assert_eq!(Severity::Low.color(), "green");
        assert_eq!(Severity::Medium.color(), "yellow");
        assert_eq!(Severity::High.color(), "red");
    }

    #[test]
    fn history_event_omits_optional_fields() {
        let event = Event {
            title: "Processo Distribuído".into(),
            date: "01/07/2024".into(),
            description: None,
            severity: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"title":"Processo Distribuído","date":"01/07/2024"}"#);
    }

    #[test]
    fn latest_event_serializes_severity() {
        let event = Event {
            title: "Sentença Publicada".into(),
            date: "02/09/2024".into(),
            description: Some("O juiz(a) analisou o caso.".into()),
            severity: Some(Severity::Low),
        };
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["severity"], "low");
        assert_eq!(value["description"], "O juiz(a) analisou o caso.");
    }
}
