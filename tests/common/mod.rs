//! In-memory stand-in for the ANEEL datastore
//!
//! Serves generated outage rows through both actions: the structured query
//! is interpreted from the SQL text produced by the query builder, the row
//! search emulates the portal's free-text `q` matching.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use powermap::adapters::aneel::{OutageSource, RowSearch};
use powermap::config::PowerMapConfig;
use powermap::domain::{RawRecord, UpstreamError};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const RESOURCE_2020: &str = "58201617-8364-4e7f-975d-21f8b8c7436f";
pub const RESOURCE_2021: &str = "42d778de-4a10-4b54-a00a-87c8ff35db6f";
pub const RESOURCE_2022: &str = "7d081751-3f4c-4ede-96b5-1bf2e46b61ca";

const COMPANIES: [(&str, &str); 3] = [
    ("Cemig Distribuição S.A", "CEMIG-D"),
    ("Light Serviços de Eletricidade S.A", "LIGHT"),
    ("Copel Distribuição S.A", "COPEL-DIS"),
];

/// How the structured query action answers for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlBehavior {
    Serve,
    /// Envelope with a "forbidden" error message
    Forbidden,
    /// HTTP 403
    Denied,
    /// Any other unsuccessful envelope
    Broken,
}

pub struct FakeDatastore {
    datasets: HashMap<String, Vec<RawRecord>>,
    behavior: Mutex<HashMap<String, SqlBehavior>>,
    pending_timeouts: AtomicUsize,
    pub sql_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeDatastore {
    /// Rows every third day of 2020-2022, rotating companies and units
    pub fn new() -> Self {
        let mut datasets = HashMap::new();
        for (year, resource) in [
            (2020, RESOURCE_2020),
            (2021, RESOURCE_2021),
            (2022, RESOURCE_2022),
        ] {
            datasets.insert(resource.to_string(), year_rows(year));
        }
        Self {
            datasets,
            behavior: Mutex::new(HashMap::new()),
            pending_timeouts: AtomicUsize::new(0),
            sql_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_behavior(self, resource: &str, behavior: SqlBehavior) -> Self {
        self.behavior
            .lock()
            .unwrap()
            .insert(resource.to_string(), behavior);
        self
    }

    /// The next `n` row searches time out
    pub fn with_search_timeouts(self, n: usize) -> Self {
        self.pending_timeouts.store(n, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.sql_calls.load(Ordering::SeqCst) + self.search_calls.load(Ordering::SeqCst)
    }

    fn rows(&self, resource: &str) -> &[RawRecord] {
        self.datasets
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn year_rows(year: i32) -> Vec<RawRecord> {
    let mut rows = Vec::new();
    let mut day = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let mut n = 0usize;
    while day.year() == year {
        let (name, abbreviation) = COMPANIES[n % COMPANIES.len()];
        let cause = if n % 2 == 0 {
            "Vento"
        } else {
            "Descarga atmosférica"
        };
        rows.push(RawRecord::from(json!({
            "DatInicioInterrupcao": format!("{} {:02}:15:00", day, n % 24),
            "DatFimInterrupcao": format!("{} {:02}:45:00", day, n % 24),
            "DscFatoGeradorInterrupcao": cause,
            "DscTipoInterrupcao": "Não Programada",
            "NumOrdemInterrupcao": year as usize * 10_000 + n,
            "DscConjuntoUnidadeConsumidora": "Centro",
            "NomAgenteRegulado": name,
            "SigAgente": abbreviation,
            "NumUnidadeConsumidora": 3_000_000 + n * 7,
        })));
        day += Duration::days(3);
        n += 1;
    }
    rows
}

fn text(row: &RawRecord, column: &str) -> String {
    row.text(column).unwrap_or_default()
}

fn captures<'a>(pattern: &str, haystack: &'a str) -> Option<regex::Captures<'a>> {
    Regex::new(pattern).unwrap().captures(haystack)
}

#[async_trait]
impl OutageSource for FakeDatastore {
    async fn query_sql(&self, sql: &str) -> Result<Vec<RawRecord>, UpstreamError> {
        self.sql_calls.fetch_add(1, Ordering::SeqCst);

        let resource = captures(r#"FROM "([^"]+)""#, sql).unwrap()[1].to_string();
        let behavior = self
            .behavior
            .lock()
            .unwrap()
            .get(&resource)
            .copied()
            .unwrap_or(SqlBehavior::Serve);
        match behavior {
            SqlBehavior::Serve => {}
            SqlBehavior::Forbidden => {
                return Err(UpstreamError::QueryForbidden(
                    "Access denied: Action datastore_search_sql forbidden".to_string(),
                ))
            }
            SqlBehavior::Denied => {
                return Err(UpstreamError::AccessDenied {
                    status: 403,
                    message: "Forbidden".to_string(),
                })
            }
            SqlBehavior::Broken => {
                return Err(UpstreamError::Rejected("syntax error at or near".to_string()))
            }
        }

        let low = captures(r">= '([^']+)'", sql).unwrap()[1].to_string();
        let high = captures(r"<= '([^']+)'", sql).unwrap()[1].to_string();
        let paging = captures(r"LIMIT (\d+) OFFSET (\d+)", sql).unwrap();
        let limit: usize = paging[1].parse().unwrap();
        let offset: usize = paging[2].parse().unwrap();
        let unit_mode = sql.contains("CAST(\"NumUnidadeConsumidora\"");
        let term = captures(r"LIKE (?:LOWER\()?'%([^%]*)%'", sql).map(|c| c[1].to_lowercase());

        let mut matched: Vec<RawRecord> = self
            .rows(&resource)
            .iter()
            .filter(|row| {
                let start = text(row, "DatInicioInterrupcao");
                low <= start && start <= high
            })
            .filter(|row| match &term {
                None => true,
                Some(term) if unit_mode => text(row, "NumUnidadeConsumidora").contains(term.as_str()),
                Some(term) => {
                    text(row, "NomAgenteRegulado").to_lowercase().contains(term.as_str())
                        || text(row, "SigAgente").to_lowercase().contains(term.as_str())
                }
            })
            .cloned()
            .collect();
        matched.sort_by_key(|row| text(row, "DatInicioInterrupcao"));

        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn search_rows(&self, request: &RowSearch) -> Result<Vec<RawRecord>, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let pending = self.pending_timeouts.load(Ordering::SeqCst);
        if pending > 0
            && self
                .pending_timeouts
                .compare_exchange(pending, pending - 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            return Err(UpstreamError::Timeout("operation timed out".to_string()));
        }

        let (month, term) = match request.q.split_once(' ') {
            Some((month, term)) => (month.to_string(), Some(term.to_lowercase())),
            None => (request.q.clone(), None),
        };

        Ok(self
            .rows(request.resource_id.as_str())
            .iter()
            .filter(|row| text(row, "DatInicioInterrupcao").starts_with(&month))
            .filter(|row| match &term {
                None => true,
                Some(term) => serde_json::to_value(row)
                    .ok()
                    .and_then(|v| v.as_object().cloned())
                    .map(|fields| {
                        fields.values().any(|value| match value {
                            Value::String(s) => s.to_lowercase().contains(term.as_str()),
                            Value::Number(n) => n.to_string().contains(term.as_str()),
                            _ => false,
                        })
                    })
                    .unwrap_or(false),
            })
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect())
    }
}

/// Default configuration with a small structured page so paging is exercised
pub fn test_config() -> PowerMapConfig {
    let mut config = PowerMapConfig::default();
    config.query.page_size = 100;
    config
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
