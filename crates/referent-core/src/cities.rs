use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::config::ListOverride;

/// Abbreviated place names that GOST references conventionally use for
/// publishing cities.
pub(crate) static CITY_ABBREVIATIONS: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    [
        ("М.", "Москва"),
        ("СПб.", "Санкт-Петербург"),
        ("Л.", "Ленинград"),
        ("К.", "Киев"),
        ("Мн.", "Минск"),
        ("Екб.", "Екатеринбург"),
        ("Новосиб.", "Новосибирск"),
        ("Н. Новгород", "Нижний Новгород"),
        ("Ростов н/Д", "Ростов-на-Дону"),
        ("N.Y.", "New York"),
        ("NY", "New York"),
    ]
    .into_iter()
    .map(|(abbr, full)| (abbr.to_string(), full.to_string()))
    .collect()
});

/// Lookup table from abbreviated to full city names.
///
/// Keys are compared case-insensitively with whitespace removed, so `спб.`
/// and `Н.Новгород` both resolve.
#[derive(Debug, Clone)]
pub struct CityTable {
    entries: HashMap<String, String>,
}

impl Default for CityTable {
    fn default() -> Self {
        Self::from_override(&ListOverride::Default)
    }
}

impl CityTable {
    pub fn from_override(list: &ListOverride<(String, String)>) -> Self {
        let entries = list
            .resolve(&CITY_ABBREVIATIONS)
            .into_iter()
            .map(|(abbr, full)| (lookup_key(&abbr), full))
            .collect();
        Self { entries }
    }

    /// Expand `city` if it is a known abbreviation, otherwise return it as is.
    pub fn expand(&self, city: &str) -> String {
        let city = city.trim();
        self.entries
            .get(&lookup_key(city))
            .cloned()
            .unwrap_or_else(|| city.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_city(city: &str) -> String {
        CityTable::default().expand(city)
    }

    #[test]
    fn expands_known_abbreviations() {
        assert_eq!(expand_city("М."), "Москва");
        assert_eq!(expand_city("СПб."), "Санкт-Петербург");
        assert_eq!(expand_city("Ростов н/Д"), "Ростов-на-Дону");
    }

    #[test]
    fn lookup_ignores_case_and_spacing() {
        assert_eq!(expand_city("спб."), "Санкт-Петербург");
        assert_eq!(expand_city("Н.Новгород"), "Нижний Новгород");
    }

    #[test]
    fn unknown_city_is_returned_unchanged() {
        assert_eq!(expand_city("Казань"), "Казань");
        assert_eq!(expand_city("  Томск "), "Томск");
    }

    #[test]
    fn extend_adds_entries() {
        let table = CityTable::from_override(&ListOverride::Extend(vec![(
            "Влад.".to_string(),
            "Владивосток".to_string(),
        )]));
        assert_eq!(table.expand("Влад."), "Владивосток");
        assert_eq!(table.expand("М."), "Москва");
    }

    #[test]
    fn replace_drops_defaults() {
        let table = CityTable::from_override(&ListOverride::Replace(vec![(
            "Влад.".to_string(),
            "Владивосток".to_string(),
        )]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.expand("М."), "М.");
    }
}
