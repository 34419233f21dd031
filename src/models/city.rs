use serde::{Deserialize, Serialize};

use crate::utils::{cmp_ignore_case, contains_ignore_case};

/// One municipality from the IBGE localidades directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// In-memory index over the fetched municipality list.
/// Lookup is a linear scan; the full list is ~5500 entries.
pub struct CityIndex {
    cities: Vec<Municipality>,
}

impl CityIndex {
    pub fn new(mut cities: Vec<Municipality>) -> Self {
        cities.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        Self { cities }
    }

    /// Case-insensitive substring filter over city names.
    /// An empty query returns every city.
    pub fn filter(&self, query: &str) -> Vec<&Municipality> {
        self.cities
            .iter()
            .filter(|city| contains_ignore_case(&city.name, query))
            .collect()
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Municipality> {
        self.cities.iter().find(|city| city.id == id)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
