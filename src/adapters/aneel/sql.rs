//! Structured query builder for `datastore_search_sql`
//!
//! User-supplied text only ever reaches the query through [`escape_literal`],
//! and identifiers only through [`quote_ident`].

use crate::domain::dates::{day_end, day_start};
use crate::domain::record::fields;
use crate::domain::{ResourceId, SearchMode};
use chrono::NaiveDate;

/// Escapes a value for use inside a single-quoted SQL literal
///
/// # Examples
///
/// ```
/// use powermap::adapters::aneel::sql::escape_literal;
///
/// assert_eq!(escape_literal("D'Oeste"), "D''Oeste");
/// ```
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quotes an identifier (column or resource name)
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}

/// One year's filtered, sorted query over a single datastore resource
#[derive(Debug, Clone)]
pub struct YearQuery {
    resource_id: ResourceId,
    columns: Vec<&'static str>,
    predicates: Vec<String>,
}

impl YearQuery {
    /// Starts a query selecting the common columns plus the mode's columns
    pub fn new(resource_id: ResourceId, mode: SearchMode) -> Self {
        let mut columns: Vec<&'static str> = fields::COMMON.to_vec();
        columns.extend_from_slice(mode.mode_columns());
        Self {
            resource_id,
            columns,
            predicates: Vec::new(),
        }
    }

    /// Restricts the start timestamp to whole days `[start, end]`
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        let column = quote_ident(fields::START);
        self.predicates
            .push(format!("{column} >= {}", literal(&day_start(start))));
        self.predicates
            .push(format!("{column} <= {}", literal(&day_end(end))));
        self
    }

    /// Adds a case-insensitive substring condition on the mode's columns
    ///
    /// Blank terms add nothing.
    pub fn matching(mut self, term: Option<&str>, mode: SearchMode) -> Self {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return self;
        };
        let pattern = literal(&format!("%{term}%"));

        let predicate = match mode {
            SearchMode::Company => {
                let alternatives: Vec<String> = mode
                    .mode_columns()
                    .iter()
                    .map(|column| {
                        format!(
                            "LOWER(COALESCE({}, '')) LIKE LOWER({pattern})",
                            quote_ident(column)
                        )
                    })
                    .collect();
                format!("({})", alternatives.join(" OR "))
            }
            SearchMode::Unit => format!(
                "CAST({} AS TEXT) LIKE {pattern}",
                quote_ident(fields::CONSUMER_UNIT)
            ),
        };
        self.predicates.push(predicate);
        self
    }

    /// Renders the SQL text of one page
    pub fn page(&self, limit: usize, offset: usize) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| quote_ident(c)).collect();
        let mut sql = format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            quote_ident(self.resource_id.as_str())
        );
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        sql.push_str(&format!(
            " ORDER BY {} ASC LIMIT {limit} OFFSET {offset}",
            quote_ident(fields::START)
        ));
        sql
    }
}
