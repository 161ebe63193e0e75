//! Outage record shapes
//!
//! Upstream rows arrive as loosely typed JSON objects whose columns differ in
//! type between yearly datasets (numbers in one year, strings in the next).
//! [`RawRecord`] absorbs that, and [`OutageRecord`] is the normalized row
//! served to callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Upstream column names
pub mod fields {
    pub const START: &str = "DatInicioInterrupcao";
    pub const END: &str = "DatFimInterrupcao";
    pub const CAUSE: &str = "DscFatoGeradorInterrupcao";
    pub const KIND: &str = "DscTipoInterrupcao";
    pub const ORDER_NUMBER: &str = "NumOrdemInterrupcao";
    pub const CONSUMER_SET: &str = "DscConjuntoUnidadeConsumidora";
    pub const COMPANY_NAME: &str = "NomAgenteRegulado";
    pub const COMPANY_ABBREVIATION: &str = "SigAgente";
    pub const CONSUMER_UNIT: &str = "NumUnidadeConsumidora";

    /// Columns selected in every mode
    pub const COMMON: [&str; 6] = [START, END, CAUSE, KIND, ORDER_NUMBER, CONSUMER_SET];
}

/// Which dimension a search targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Regulated company, matched by name or abbreviation
    #[default]
    Company,
    /// Consumer unit number
    Unit,
}

impl SearchMode {
    /// Canonical name used in cache keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Company => "company",
            SearchMode::Unit => "unit",
        }
    }

    /// Upstream columns specific to this mode
    pub fn mode_columns(&self) -> &'static [&'static str] {
        match self {
            SearchMode::Company => &[fields::COMPANY_NAME, fields::COMPANY_ABBREVIATION],
            SearchMode::Unit => &[fields::CONSUMER_UNIT],
        }
    }

    /// Case-insensitive substring match of `term` against the mode's columns
    pub fn matches(&self, raw: &RawRecord, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.mode_columns().iter().any(|column| {
            raw.text(column)
                .map(|value| value.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company" | "cia" => Ok(SearchMode::Company),
            "unit" | "uc" => Ok(SearchMode::Unit),
            other => Err(format!(
                "Invalid mode '{other}'. Must be one of: company, unit"
            )),
        }
    }
}

/// One upstream row as returned by the datastore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Wraps a JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the raw JSON value of a column
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Returns a column rendered as text; `None` for null, missing or structured values
    pub fn text(&self, column: &str) -> Option<String> {
        match self.0.get(column)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Like [`RawRecord::text`] but empty when absent
    pub fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Mode-dependent columns of an [`OutageRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModeFields {
    Company {
        #[serde(rename = "NomAgenteRegulado")]
        company_name: Option<String>,
        #[serde(rename = "SigAgente")]
        company_abbreviation: Option<String>,
    },
    Unit {
        #[serde(rename = "NumUnidadeConsumidora")]
        consumer_unit_number: Option<String>,
    },
}

impl ModeFields {
    /// The mode this field group belongs to
    pub fn mode(&self) -> SearchMode {
        match self {
            ModeFields::Company { .. } => SearchMode::Company,
            ModeFields::Unit { .. } => SearchMode::Unit,
        }
    }
}

/// Normalized outage (interruption) event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutageRecord {
    /// Display date `dd/mm/yyyy` derived from the start timestamp
    #[serde(rename = "dia")]
    pub day: String,

    #[serde(rename = "DatInicioInterrupcao")]
    pub start_timestamp: String,

    #[serde(rename = "DatFimInterrupcao")]
    pub end_timestamp: String,

    #[serde(rename = "DscFatoGeradorInterrupcao")]
    pub cause: String,

    #[serde(rename = "DscTipoInterrupcao")]
    pub kind: String,

    #[serde(rename = "NumOrdemInterrupcao")]
    pub order_number: Option<String>,

    #[serde(rename = "DscConjuntoUnidadeConsumidora")]
    pub consumer_set_description: Option<String>,

    #[serde(flatten)]
    pub mode_fields: ModeFields,
}

impl OutageRecord {
    /// Normalizes an upstream row for the given mode
    pub fn from_raw(raw: &RawRecord, mode: SearchMode) -> Self {
        let start_timestamp = raw.text_or_empty(fields::START);
        let mode_fields = match mode {
            SearchMode::Company => ModeFields::Company {
                company_name: raw.text(fields::COMPANY_NAME),
                company_abbreviation: raw.text(fields::COMPANY_ABBREVIATION),
            },
            SearchMode::Unit => ModeFields::Unit {
                consumer_unit_number: raw.text(fields::CONSUMER_UNIT),
            },
        };

        Self {
            day: super::dates::display_date(&start_timestamp),
            start_timestamp,
            end_timestamp: raw.text_or_empty(fields::END),
            cause: raw.text_or_empty(fields::CAUSE),
            kind: raw.text_or_empty(fields::KIND),
            order_number: raw.text(fields::ORDER_NUMBER),
            consumer_set_description: raw.text(fields::CONSUMER_SET),
            mode_fields,
        }
    }

    /// Company name, present only in company mode
    pub fn company_name(&self) -> Option<&str> {
        match &self.mode_fields {
            ModeFields::Company { company_name, .. } => company_name.as_deref(),
            ModeFields::Unit { .. } => None,
        }
    }

    /// Company abbreviation, present only in company mode
    pub fn company_abbreviation(&self) -> Option<&str> {
        match &self.mode_fields {
            ModeFields::Company {
                company_abbreviation,
                ..
            } => company_abbreviation.as_deref(),
            ModeFields::Unit { .. } => None,
        }
    }

    /// Consumer unit number, present only in unit mode
    pub fn consumer_unit_number(&self) -> Option<&str> {
        match &self.mode_fields {
            ModeFields::Unit {
                consumer_unit_number,
            } => consumer_unit_number.as_deref(),
            ModeFields::Company { .. } => None,
        }
    }

    /// Every field value joined by spaces, used by the local export filter
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            self.day.as_str(),
            self.start_timestamp.as_str(),
            self.end_timestamp.as_str(),
            self.cause.as_str(),
            self.kind.as_str(),
        ];
        parts.extend(self.order_number.as_deref());
        parts.extend(self.consumer_set_description.as_deref());
        parts.extend(self.company_name());
        parts.extend(self.company_abbreviation());
        parts.extend(self.consumer_unit_number());
        parts.join(" ")
    }
}

/// Per-year summary returned alongside search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMeta {
    #[serde(rename = "ano")]
    pub year: i32,

    #[serde(rename = "total_ano")]
    pub total_count_for_year: usize,
}

impl YearMeta {
    pub fn new(year: i32, total_count_for_year: usize) -> Self {
        Self {
            year,
            total_count_for_year,
        }
    }
}
