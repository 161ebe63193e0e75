//! Year to datastore resource lookup

use crate::domain::{PowerMapError, ResourceId, Result};
use std::collections::BTreeMap;

/// Maps calendar years to the datastore resource publishing that year
///
/// Years without an entry are valid and simply have no data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearResourceMap {
    resources: BTreeMap<i32, ResourceId>,
}

impl YearResourceMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from the `[aneel.resources]` configuration table
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-numeric keys or invalid ids.
    pub fn from_config(resources: &BTreeMap<String, String>) -> Result<Self> {
        let mut map = Self::new();
        for (year, id) in resources {
            let year: i32 = year.trim().parse().map_err(|_| {
                PowerMapError::Configuration(format!("Invalid resource year '{year}'"))
            })?;
            let id = ResourceId::new(id.as_str()).map_err(PowerMapError::Configuration)?;
            map.insert(year, id);
        }
        Ok(map)
    }

    /// Registers (or replaces) a year's resource
    pub fn insert(&mut self, year: i32, id: ResourceId) {
        self.resources.insert(year, id);
    }

    /// Builder-style [`YearResourceMap::insert`]
    pub fn with(mut self, year: i32, id: ResourceId) -> Self {
        self.insert(year, id);
        self
    }

    pub fn get(&self, year: i32) -> Option<&ResourceId> {
        self.resources.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.resources.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AneelConfig;

    #[test]
    fn test_from_default_config() {
        let map = YearResourceMap::from_config(&AneelConfig::default().resources).unwrap();
        assert_eq!(map.len(), 9);
        assert_eq!(
            map.get(2021).map(ResourceId::as_str),
            Some("42d778de-4a10-4b54-a00a-87c8ff35db6f")
        );
        assert!(map.get(2016).is_none());
        assert_eq!(map.years().next(), Some(2017));
    }

    #[test]
    fn test_from_config_rejects_bad_year() {
        let mut table = BTreeMap::new();
        table.insert("next".to_string(), "abc".to_string());
        assert!(YearResourceMap::from_config(&table).is_err());
    }
}
