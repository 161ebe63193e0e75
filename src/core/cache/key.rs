//! Cache keys

use crate::core::fetch::OutageQuery;
use crate::domain::SearchMode;
use chrono::NaiveDate;
use std::fmt;

/// Fingerprint of a search; the term is trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    mode: SearchMode,
    term: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl QueryKey {
    pub fn new(mode: SearchMode, term: Option<&str>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            mode,
            term: term.map(|t| t.trim().to_lowercase()).unwrap_or_default(),
            start,
            end,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl From<&OutageQuery> for QueryKey {
    fn from(query: &OutageQuery) -> Self {
        Self::new(query.mode, query.term.as_deref(), query.start, query.end)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}|{}", self.mode, self.term, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january(mode: SearchMode, term: Option<&str>) -> QueryKey {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
        QueryKey::new(mode, term, start, end)
    }

    #[test]
    fn test_key_normalizes_term() {
        let a = january(SearchMode::Company, Some("  CEMIG"));
        let b = january(SearchMode::Company, Some("cemig"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "company|cemig|2021-01-01|2021-01-31");
    }

    #[test]
    fn test_key_distinguishes_mode() {
        let base = january(SearchMode::Company, None);
        assert_ne!(base, january(SearchMode::Unit, None));
        assert_eq!(base, january(SearchMode::Company, Some("")));
        assert_eq!(base.term(), "");
    }

    #[test]
    fn test_key_from_query() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
        let query = OutageQuery::new(start, end, Some(" Light "), SearchMode::Company);
        assert_eq!(QueryKey::from(&query), january(SearchMode::Company, Some("light")));
    }
}
