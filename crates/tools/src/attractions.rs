//! Attractions lookup backed by a small built-in database.

use tracing::debug;
use voyager_core::tool::{AttractionList, LookupStatus};

const DATABASE: &[(&str, &[&str])] = &[
    ("paris", &["Eiffel Tower", "Louvre Museum", "Montmartre"]),
    ("tokyo", &["Shibuya Crossing", "Senso-ji Temple", "Meiji Shrine"]),
    ("london", &["British Museum", "Tower of London", "London Eye"]),
    (
        "new york",
        &["Statue of Liberty", "Central Park", "Empire State Building"],
    ),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct AttractionsTool;

impl AttractionsTool {
    /// Top attractions for `city`. Unknown cities give an empty list.
    pub fn lookup(&self, city: &str) -> AttractionList {
        let city = city.trim();
        let key = city.to_lowercase();

        let items: Vec<String> = DATABASE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, items)| items.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        debug!(city, found = !items.is_empty(), "Attractions lookup");

        AttractionList {
            status: LookupStatus::Mock,
            city: city.to_string(),
            items,
            detail: None,
        }
    }

    /// Cities with entries.
    pub fn known_cities() -> impl Iterator<Item = &'static str> {
        DATABASE.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let list = AttractionsTool.lookup("  PARIS ");
        assert_eq!(list.city, "PARIS");
        assert_eq!(list.items, vec!["Eiffel Tower", "Louvre Museum", "Montmartre"]);
        assert_eq!(list.status, LookupStatus::Mock);
    }

    #[test]
    fn multi_word_city() {
        let list = AttractionsTool.lookup("New York");
        assert_eq!(list.items.len(), 3);
        assert!(list.items.contains(&"Central Park".to_string()));
    }

    #[test]
    fn unknown_city_is_empty() {
        let list = AttractionsTool.lookup("Atlantis");
        assert!(list.items.is_empty());
        assert!(list.status.is_usable());
    }

    #[test]
    fn four_cities_known() {
        assert_eq!(AttractionsTool::known_cities().count(), 4);
    }
}
