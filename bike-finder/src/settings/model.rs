//! Persisted user settings: weather key and saved searches.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geo::{Direction, parse_direction_filter};
use crate::geocode::GeocodeResult;
use crate::nearby::{SearchKind, SearchQuery};

/// Characters of the address kept in a generated favorite name.
const NAME_PREFIX_CHARS: usize = 15;

/// A saved search: where, what for, how far and which way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub address: String,
    pub search_type: SearchKind,
    pub radius: f64,
    /// Stored as `"all"` or a lowercase direction name
    #[serde(with = "direction_or_all")]
    pub direction: Option<Direction>,
    /// Geocoded location, so loading a favorite needs no lookup
    pub location_result: GeocodeResult,
}

impl Favorite {
    /// Generated name, e.g. `"pickup: 100 Summer Stre..."`.
    pub fn default_name(kind: SearchKind, address: &str) -> String {
        let prefix: String = address.chars().take(NAME_PREFIX_CHARS).collect();
        format!("{kind}: {prefix}...")
    }

    /// The nearby search this favorite describes, if its location resolved.
    pub fn to_query(&self) -> Option<SearchQuery> {
        let origin = self.location_result.coord()?;
        Some(
            SearchQuery::new(origin, self.radius)
                .with_direction(self.direction)
                .with_kind(self.search_type)
                .with_label(
                    self.location_result
                        .formatted_address
                        .clone()
                        .unwrap_or_else(|| self.address.clone()),
                ),
        )
    }
}

/// Everything persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    pub favorites: BTreeMap<String, Favorite>,
    /// Whether `api_key` is written to disk
    pub save_api_key: bool,
}

impl Settings {
    /// Set the weather API key and whether it should be persisted.
    pub fn set_api_key(&mut self, key: impl Into<String>, remember: bool) {
        self.api_key = key.into();
        self.save_api_key = remember;
    }

    /// The API key, if one is set.
    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.trim()).filter(|k| !k.is_empty())
    }

    /// Add or replace a favorite, returning the one it replaced.
    pub fn add_favorite(&mut self, name: impl Into<String>, favorite: Favorite) -> Option<Favorite> {
        self.favorites.insert(name.into(), favorite)
    }

    pub fn remove_favorite(&mut self, name: &str) -> Option<Favorite> {
        self.favorites.remove(name)
    }

    /// The form written to disk: the key is blanked unless remembered.
    pub(super) fn persisted(&self) -> Settings {
        let mut out = self.clone();
        if !out.save_api_key {
            out.api_key.clear();
        }
        out
    }
}

mod direction_or_all {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Option<Direction>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(d.map_or("all", |d| d.as_str()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Direction>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_direction_filter(Some(&raw)).map_err(serde::de::Error::custom)
    }
}
