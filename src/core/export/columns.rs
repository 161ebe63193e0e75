//! Spreadsheet column layouts

use crate::domain::{OutageRecord, SearchMode};

/// One exported column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Day,
    OrderNumber,
    CompanyName,
    CompanyAbbreviation,
    ConsumerUnit,
    Cause,
    Kind,
    ConsumerSet,
}

const COMPANY_COLUMNS: [Column; 7] = [
    Column::Day,
    Column::OrderNumber,
    Column::CompanyName,
    Column::CompanyAbbreviation,
    Column::Cause,
    Column::Kind,
    Column::ConsumerSet,
];

const UNIT_COLUMNS: [Column; 6] = [
    Column::Day,
    Column::OrderNumber,
    Column::ConsumerUnit,
    Column::Cause,
    Column::Kind,
    Column::ConsumerSet,
];

impl Column {
    /// Header text shown to users
    pub fn header(&self) -> &'static str {
        match self {
            Column::Day => "Data",
            Column::OrderNumber => "Registro",
            Column::CompanyName => "Companhia",
            Column::CompanyAbbreviation => "Sigla",
            Column::ConsumerUnit => "Unidade",
            Column::Cause => "Fato Gerador",
            Column::Kind => "Tipo",
            Column::ConsumerSet => "Conjunto/UC",
        }
    }

    /// Cell text for `record`; empty when the field is absent
    pub fn value<'a>(&self, record: &'a OutageRecord) -> &'a str {
        match self {
            Column::Day => &record.day,
            Column::OrderNumber => record.order_number.as_deref().unwrap_or(""),
            Column::CompanyName => record.company_name().unwrap_or(""),
            Column::CompanyAbbreviation => record.company_abbreviation().unwrap_or(""),
            Column::ConsumerUnit => record.consumer_unit_number().unwrap_or(""),
            Column::Cause => &record.cause,
            Column::Kind => &record.kind,
            Column::ConsumerSet => record.consumer_set_description.as_deref().unwrap_or(""),
        }
    }
}

/// Columns exported for a search mode, in order
pub fn columns_for(mode: SearchMode) -> &'static [Column] {
    match mode {
        SearchMode::Company => &COMPANY_COLUMNS,
        SearchMode::Unit => &UNIT_COLUMNS,
    }
}
