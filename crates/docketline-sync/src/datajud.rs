//! HTTP client for the CNJ Datajud public search API.
//!
//! Each tribunal has its own Elasticsearch `_search` endpoint. A case is
//! looked up by bare case number; the best hit carries the filing date and
//! the list of movements.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use docketline_core::{RawDocket, RawEvent};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::TransportError;
use crate::fetcher::DocketSource;

/// São Paulo state court (TJSP) search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api-publica.datajud.cnj.jus.br/api_publica_tjsp/_search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for [`DatajudClient`].
#[derive(Debug, Clone)]
pub struct DatajudConfig {
    /// Full `_search` URL of the tribunal index.
    pub endpoint: String,
    /// Optional CORS-style proxy prefix, prepended verbatim to `endpoint`.
    pub proxy_prefix: Option<String>,
    /// Public API key, sent as `Authorization: APIKey <key>`.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for DatajudConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            proxy_prefix: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DatajudConfig {
    /// The URL actually requested, including any proxy prefix.
    pub fn request_url(&self) -> String {
        match &self.proxy_prefix {
            Some(prefix) => format!("{}{}", prefix, self.endpoint),
            None => self.endpoint.clone(),
        }
    }
}

/// Datajud search client.
pub struct DatajudClient {
    client: reqwest::Client,
    config: DatajudConfig,
}

// ── Wire format ──

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Source,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Source {
    numero_processo: String,
    #[serde(default)]
    data_ajuizamento: Option<String>,
    #[serde(default)]
    movimentos: Vec<Movimento>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movimento {
    #[serde(default)]
    data_hora: Option<String>,
    #[serde(default)]
    nome: String,
}

impl DatajudClient {
    pub fn new(config: DatajudConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DatajudConfig {
        &self.config
    }
}

#[async_trait]
impl DocketSource for DatajudClient {
    async fn search(&self, case_id: &str) -> Result<Option<RawDocket>, TransportError> {
        let url = self.config.request_url();
        info!(url = %url, case_id, "querying datajud");

        let mut req = self.client.post(&url).json(&search_body(case_id));
        if let Some(key) = &self.config.api_key {
            req = req.header(reqwest::header::AUTHORIZATION, format!("APIKey {key}"));
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        parse_response(&body)
    }
}

/// Elasticsearch query for one case, most recently filed hit first.
fn search_body(case_id: &str) -> serde_json::Value {
    json!({
        "query": { "match": { "numeroProcesso": case_id } },
        "sort": [ { "dataAjuizamento": "desc" } ],
        "size": 1
    })
}

/// Decode a `_search` response into the first hit's docket.
///
/// Zero hits is `Ok(None)`. Movements whose timestamp cannot be parsed are
/// dropped; an unparseable filing date leaves `filed_at` empty.
pub fn parse_response(body: &str) -> Result<Option<RawDocket>, TransportError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;

    let Some(hit) = response.hits.hits.into_iter().next() else {
        return Ok(None);
    };
    let source = hit.source;

    let filed_at = source.data_ajuizamento.as_deref().and_then(parse_timestamp);
    if filed_at.is_none() {
        warn!(
            case_number = %source.numero_processo,
            raw = ?source.data_ajuizamento,
            "unparseable filing date"
        );
    }

    let mut events = Vec::with_capacity(source.movimentos.len());
    for mov in source.movimentos {
        match mov.data_hora.as_deref().and_then(parse_timestamp) {
            Some(ts) => events.push(RawEvent::new(ts, mov.nome)),
            None => warn!(
                case_number = %source.numero_processo,
                title = %mov.nome,
                raw = ?mov.data_hora,
                "dropping movement with unparseable timestamp"
            ),
        }
    }

    Ok(Some(RawDocket {
        case_number: source.numero_processo,
        filed_at,
        events,
    }))
}

/// Parse the timestamp shapes Datajud tribunals emit.
///
/// Accepts RFC 3339 (`2024-07-01T10:00:00.000Z`), naive ISO
/// (`2024-07-01T10:00:00`, read as UTC), compact (`20240701100000`) and
/// bare dates (`2024-07-01`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y%m%d%H%M%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
