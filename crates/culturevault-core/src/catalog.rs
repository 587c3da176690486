//! The bundled place catalog: id lookups, substring filtering, and the
//! default slice shown while the query is still empty.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};

use crate::models::PlaceRecord;

/// Culture categories used by the bundled catalog.
pub const CATEGORIES: [&str; 12] = [
    "Folk Stories",
    "Rituals & Ceremonies",
    "Traditional Medicine",
    "Oral Histories",
    "Dance Forms",
    "Songs & Music",
    "Craft Techniques",
    "Indigenous Knowledge",
    "Festivals",
    "Cuisine",
    "Architecture",
    "Clothing & Textiles",
];

/// Regions recognized by the catalog and the remote lookup prompt.
pub const REGIONS: [&str; 12] = [
    "South Asia",
    "Middle East",
    "Europe",
    "East Asia",
    "South America",
    "Africa",
    "North America",
    "Southeast Asia",
    "Oceania",
    "Central Asia",
    "Caribbean",
    "Central America",
];

/// Map a region name to its continent. Unknown regions fall back to "Asia",
/// matching the original catalog data.
pub fn continent_for_region(region: &str) -> &'static str {
    match region {
        "South Asia" | "East Asia" | "Southeast Asia" | "Middle East" | "Central Asia" => "Asia",
        "Europe" => "Europe",
        "Africa" => "Africa",
        "North America" | "Central America" | "Caribbean" => "North America",
        "South America" => "South America",
        "Oceania" => "Oceania",
        _ => "Asia",
    }
}

/// An ordered, immutable collection of place records with unique ids.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<PlaceRecord>,
}

impl Catalog {
    /// Build a catalog, rejecting records with empty or duplicate ids.
    pub fn new(records: Vec<PlaceRecord>) -> Result<Self> {
        let mut seen: HashSet<String> = HashSet::new();
        for record in &records {
            if record.id.trim().is_empty() {
                bail!("catalog record '{}' has an empty id", record.name);
            }
            if !seen.insert(record.id.clone()) {
                bail!("catalog contains duplicate id '{}'", record.id);
            }
        }
        Ok(Catalog { records })
    }

    /// Parse a catalog from its JSON representation: an array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PlaceRecord> =
            serde_json::from_str(json).context("failed to parse catalog JSON")?;
        Catalog::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaceRecord> {
        self.records.iter()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&PlaceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The first `limit` records in catalog order. Shown when the query is
    /// empty instead of filtering.
    pub fn default_slice(&self, limit: usize) -> Vec<&PlaceRecord> {
        self.records.iter().take(limit).collect()
    }

    /// Case-insensitive substring filter over names, countries, culture
    /// titles, culture categories, foods, and landmarks. Record order is
    /// preserved and at most `cap` records are returned. The query is matched
    /// verbatim, whitespace included; only an empty query matches nothing.
    pub fn filter(&self, query: &str, cap: usize) -> Vec<&PlaceRecord> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| record_matches(r, &needle))
            .take(cap)
            .collect()
    }
}

/// True when any searchable field of `record` contains `needle`, which must
/// already be lowercased.
fn record_matches(record: &PlaceRecord, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&record.name)
        || contains(&record.country)
        || record
            .cultures
            .iter()
            .any(|c| contains(&c.title) || contains(&c.category))
        || record.famous_food.iter().any(|f| contains(f))
        || record.tourist_places.iter().any(|t| contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CultureEntry;

    fn make_record(id: &str, name: &str, country: &str, region: &str) -> PlaceRecord {
        PlaceRecord::new(id, name, country, region, continent_for_region(region))
    }

    fn make_catalog() -> Catalog {
        let mut kyoto = make_record("kyoto", "Kyoto", "Japan", "East Asia");
        kyoto.cultures.push(CultureEntry {
            title: "Tea Ceremony".to_string(),
            category: "Rituals & Ceremonies".to_string(),
            description: "The way of tea.".to_string(),
            religion: None,
            celebration_date: None,
        });
        kyoto.famous_food.push("Kaiseki".to_string());
        kyoto.tourist_places.push("Fushimi Inari Shrine".to_string());

        let tokyo = make_record("tokyo", "Tokyo", "Japan", "East Asia");
        let paris = make_record("paris", "Paris", "France", "Europe");
        Catalog::new(vec![kyoto, tokyo, paris]).unwrap()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let records = vec![
            make_record("x", "One", "A", "Europe"),
            make_record("x", "Two", "B", "Europe"),
        ];
        let err = Catalog::new(records).unwrap_err();
        assert!(err.to_string().contains("duplicate id 'x'"));
    }

    #[test]
    fn test_rejects_empty_id() {
        let records = vec![make_record("  ", "Nameless", "A", "Europe")];
        assert!(Catalog::new(records).is_err());
    }

    #[test]
    fn test_get_and_contains() {
        let catalog = make_catalog();
        assert_eq!(catalog.get("tokyo").map(|r| r.name.as_str()), Some("Tokyo"));
        assert!(catalog.contains("paris"));
        assert!(!catalog.contains("atlantis"));
    }

    #[test]
    fn test_filter_matches_name_case_insensitive() {
        let catalog = make_catalog();
        let hits = catalog.filter("KYO", 20);
        assert_eq!(hits.len(), 2, "expected Kyoto and Tokyo to match 'KYO'");
        assert_eq!(hits[0].id, "kyoto");
        assert_eq!(hits[1].id, "tokyo");
    }

    #[test]
    fn test_filter_matches_culture_food_and_landmark_fields() {
        let catalog = make_catalog();
        assert_eq!(catalog.filter("tea cere", 20).len(), 1);
        assert_eq!(catalog.filter("rituals", 20).len(), 1);
        assert_eq!(catalog.filter("kaiseki", 20).len(), 1);
        assert_eq!(catalog.filter("fushimi", 20).len(), 1);
        assert_eq!(catalog.filter("france", 20).len(), 1);
    }

    #[test]
    fn test_filter_preserves_order_and_cap() {
        let records: Vec<PlaceRecord> = (0..30)
            .map(|i| make_record(&format!("p{i}"), &format!("Place {i}"), "X", "Europe"))
            .collect();
        let catalog = Catalog::new(records).unwrap();
        let hits = catalog.filter("place", 20);
        assert_eq!(hits.len(), 20);
        assert_eq!(hits[0].id, "p0");
        assert_eq!(hits[19].id, "p19");
    }

    #[test]
    fn test_filter_empty_query_matches_nothing() {
        let catalog = make_catalog();
        assert!(catalog.filter("", 20).is_empty());
    }

    #[test]
    fn test_filter_matches_whitespace_literally() {
        let catalog = make_catalog();
        // Surrounding whitespace is part of the needle, not stripped
        assert!(catalog.filter(" kyo ", 20).is_empty());
        let hits = catalog.filter(" cere", 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "kyoto");
    }

    #[test]
    fn test_default_slice_respects_catalog_order() {
        let catalog = make_catalog();
        let slice = catalog.default_slice(2);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].id, "kyoto");
        assert_eq!(slice[1].id, "tokyo");
        assert_eq!(catalog.default_slice(24).len(), 3);
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(Catalog::from_json("not json").is_err());
        assert!(Catalog::from_json(r#"{"id": "solo"}"#).is_err());
    }

    #[test]
    fn test_continent_for_region_covers_all_regions() {
        assert_eq!(continent_for_region("South Asia"), "Asia");
        assert_eq!(continent_for_region("Caribbean"), "North America");
        assert_eq!(continent_for_region("Oceania"), "Oceania");
        assert_eq!(continent_for_region("Nowhere"), "Asia");
        for region in REGIONS {
            assert!(!continent_for_region(region).is_empty());
        }
    }
}
