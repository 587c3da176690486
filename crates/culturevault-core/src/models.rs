//! Core data models for CultureVault.

use serde::{Deserialize, Serialize};

/// A single cultural entry attached to a place: a festival, a cuisine, a
/// craft tradition, and so on. `category` is free text but the catalog
/// sticks to the values in [`crate::catalog::CATEGORIES`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureEntry {
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celebration_date: Option<String>,
}

/// A named festival with an approximate date ("March", "October-November").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Festival {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// A place with its geography and cultural profile.
///
/// This one shape backs both the bundled catalog and payloads returned by the
/// remote lookup, so field names follow the upstream JSON contract
/// (camelCase, `population` as prose like "32 million"). Everything beyond
/// the identity fields is optional; absent fields deserialize to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub id: String,
    pub name: String,
    pub country: String,
    pub region: String,
    pub continent: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub population: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cultures: Vec<CultureEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tourist_places: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub famous_food: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub famous_restaurants: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beaches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rivers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub malls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dressing_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traditions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub festivals: Vec<Festival>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practices: Option<String>,
}

/// Payload returned by a remote lookup. Same shape as a catalog record; the
/// alias marks which side of the seam a value came from.
pub type PlaceInfo = PlaceRecord;

impl PlaceRecord {
    /// Minimal record with identity and geography only. Used by tests and
    /// by callers that build records programmatically.
    pub fn new(id: &str, name: &str, country: &str, region: &str, continent: &str) -> Self {
        PlaceRecord {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            region: region.to_string(),
            continent: continent.to_string(),
            lat: 0.0,
            lng: 0.0,
            population: String::new(),
            languages: Vec::new(),
            cultures: Vec::new(),
            tourist_places: Vec::new(),
            famous_food: Vec::new(),
            famous_restaurants: Vec::new(),
            beaches: Vec::new(),
            rivers: Vec::new(),
            parks: Vec::new(),
            malls: Vec::new(),
            history: None,
            dressing_style: None,
            traditions: None,
            festivals: Vec::new(),
            practices: None,
        }
    }
}
