//! GBFS wire types.
//!
//! Operators disagree on a few encodings: station ids arrive as strings or
//! integers, and renting/returning flags as booleans (GBFS 2.x) or 0/1
//! (GBFS 1.x). Both are accepted.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use super::error::InventoryError;

const STATION_INFORMATION: &str = "station_information";
const STATION_STATUS: &str = "station_status";

/// Root discovery document (`gbfs.json`).
#[derive(Debug, Deserialize)]
pub struct Discovery {
    /// Feeds keyed by language code
    pub data: HashMap<String, LanguageFeeds>,
}

impl Discovery {
    /// URLs of the `station_information` and `station_status` feeds.
    ///
    /// Fails if the language section or either feed is missing.
    pub fn station_feed_urls(&self, language: &str) -> Result<(String, String), InventoryError> {
        let feeds = self
            .data
            .get(language)
            .ok_or_else(|| InventoryError::MissingLanguage(language.to_string()))?;

        let info = feeds
            .url_of(STATION_INFORMATION)
            .ok_or(InventoryError::MissingFeed(STATION_INFORMATION))?;
        let status = feeds
            .url_of(STATION_STATUS)
            .ok_or(InventoryError::MissingFeed(STATION_STATUS))?;

        Ok((info.to_string(), status.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct LanguageFeeds {
    pub feeds: Vec<FeedEntry>,
}

/// One entry of the discovery feed list.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub name: String,
    pub url: String,
}

impl LanguageFeeds {
    /// URL of the feed with the given name.
    pub fn url_of(&self, name: &str) -> Option<&str> {
        self.feeds
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.url.as_str())
    }
}

/// Envelope shared by `station_information` and `station_status`.
#[derive(Debug, Deserialize)]
pub struct StationFeed<T> {
    pub data: StationList<T>,
}

#[derive(Debug, Deserialize)]
pub struct StationList<T> {
    pub stations: Vec<T>,
}

/// Static station metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInformationDto {
    #[serde(deserialize_with = "string_or_number")]
    pub station_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Live station status.
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatusDto {
    #[serde(deserialize_with = "string_or_number")]
    pub station_id: String,
    #[serde(default)]
    pub num_bikes_available: Option<u32>,
    #[serde(default)]
    pub num_ebikes_available: Option<u32>,
    #[serde(default)]
    pub num_docks_available: Option<u32>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub is_renting: Option<bool>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub is_returning: Option<bool>,
    #[serde(default)]
    pub last_reported: Option<i64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_discovery() {
        let json = r#"{
            "last_updated": 1700000000,
            "ttl": 5,
            "data": {"en": {"feeds": [
                {"name": "system_information", "url": "http://gbfs/system_information.json"},
                {"name": "station_information", "url": "http://gbfs/station_information.json"},
                {"name": "station_status", "url": "http://gbfs/station_status.json"}
            ]}}
        }"#;
        let discovery: Discovery = serde_json::from_str(json).unwrap();
        let en = &discovery.data["en"];
        assert_eq!(
            en.url_of("station_status"),
            Some("http://gbfs/station_status.json")
        );
        assert_eq!(en.url_of("free_bike_status"), None);
    }

    fn discovery(feeds: &str) -> Discovery {
        let json = format!(r#"{{"data": {{"en": {{"feeds": [{feeds}]}}}}}}"#);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn station_feed_urls_resolved() {
        let doc = discovery(
            r#"{"name": "station_status", "url": "http://gbfs/status.json"},
               {"name": "station_information", "url": "http://gbfs/info.json"}"#,
        );
        let (info, status) = doc.station_feed_urls("en").unwrap();
        assert_eq!(info, "http://gbfs/info.json");
        assert_eq!(status, "http://gbfs/status.json");
    }

    #[test]
    fn missing_status_feed_fails_fast() {
        let doc = discovery(r#"{"name": "station_information", "url": "http://gbfs/info.json"}"#);
        assert!(matches!(
            doc.station_feed_urls("en"),
            Err(InventoryError::MissingFeed("station_status"))
        ));
    }

    #[test]
    fn missing_language_fails_fast() {
        let json = r#"{"data": {"fr": {"feeds": [
            {"name": "station_information", "url": "http://gbfs/fr/info.json"},
            {"name": "station_status", "url": "http://gbfs/fr/status.json"}
        ]}}}"#;
        let doc: Discovery = serde_json::from_str(json).unwrap();
        match doc.station_feed_urls("en") {
            Err(InventoryError::MissingLanguage(lang)) => assert_eq!(lang, "en"),
            other => panic!("expected MissingLanguage, got {other:?}"),
        }
    }

    #[test]
    fn station_ids_accept_numbers() {
        let json = r#"{"station_id": 42, "name": "X", "lat": 42.0, "lon": -71.0}"#;
        let info: StationInformationDto = serde_json::from_str(json).unwrap();
        assert_eq!(info.station_id, "42");
        assert_eq!(info.capacity, None);
    }

    #[test]
    fn flags_accept_ints_and_bools() {
        let v1 = r#"{"station_id": "a", "num_bikes_available": 3, "is_renting": 1, "is_returning": 0}"#;
        let status: StationStatusDto = serde_json::from_str(v1).unwrap();
        assert_eq!(status.is_renting, Some(true));
        assert_eq!(status.is_returning, Some(false));
        assert_eq!(status.num_ebikes_available, None);

        let v2 = r#"{"station_id": "a", "is_renting": false, "is_returning": true}"#;
        let status: StationStatusDto = serde_json::from_str(v2).unwrap();
        assert_eq!(status.is_renting, Some(false));
        assert_eq!(status.is_returning, Some(true));
    }

    #[test]
    fn missing_coordinates_reject_the_feed() {
        let json = r#"{"data": {"stations": [{"station_id": "a", "name": "X", "lat": 42.0}]}}"#;
        assert!(serde_json::from_str::<StationFeed<StationInformationDto>>(json).is_err());
    }
}
