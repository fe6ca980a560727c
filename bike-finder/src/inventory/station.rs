//! Stations and inventory snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::Coord;

use super::types::{StationInformationDto, StationStatusDto};

/// Live availability of a station, from the status feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Availability {
    pub bikes: u32,
    pub ebikes: u32,
    pub docks: u32,
    pub is_renting: bool,
    pub is_returning: bool,
    pub last_reported: Option<DateTime<Utc>>,
}

impl From<&StationStatusDto> for Availability {
    fn from(status: &StationStatusDto) -> Self {
        Self {
            bikes: status.num_bikes_available.unwrap_or(0),
            ebikes: status.num_ebikes_available.unwrap_or(0),
            docks: status.num_docks_available.unwrap_or(0),
            is_renting: status.is_renting.unwrap_or(true),
            is_returning: status.is_returning.unwrap_or(true),
            last_reported: status
                .last_reported
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

/// A bike-share station.
///
/// `availability` is `None` when the status feed had no entry for the
/// station; the accessors then report zero bikes and docks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub coord: Coord,
    pub capacity: Option<u32>,
    pub availability: Option<Availability>,
}

impl Station {
    pub fn bikes_available(&self) -> u32 {
        self.availability.map_or(0, |a| a.bikes)
    }

    pub fn ebikes_available(&self) -> u32 {
        self.availability.map_or(0, |a| a.ebikes)
    }

    /// Classic (non-electric) bikes.
    pub fn regular_bikes_available(&self) -> u32 {
        self.bikes_available()
            .saturating_sub(self.ebikes_available())
    }

    pub fn docks_available(&self) -> u32 {
        self.availability.map_or(0, |a| a.docks)
    }

    pub fn is_renting(&self) -> bool {
        self.availability.is_none_or(|a| a.is_renting)
    }

    pub fn is_returning(&self) -> bool {
        self.availability.is_none_or(|a| a.is_returning)
    }
}

/// Left-join live status onto station information by `station_id`.
///
/// Every information record yields a station; status records without a
/// matching station are ignored.
pub fn join_feeds(info: Vec<StationInformationDto>, status: &[StationStatusDto]) -> Vec<Station> {
    let status_by_id: HashMap<&str, &StationStatusDto> = status
        .iter()
        .map(|s| (s.station_id.as_str(), s))
        .collect();

    info.into_iter()
        .map(|i| {
            let availability = status_by_id
                .get(i.station_id.as_str())
                .map(|s| Availability::from(*s));
            Station {
                coord: Coord::new(i.lat, i.lon),
                availability,
                station_id: i.station_id,
                name: i.name,
                capacity: i.capacity,
            }
        })
        .collect()
}

/// An immutable snapshot of every station from one fetch.
#[derive(Debug, Clone)]
pub struct Inventory {
    stations: Vec<Station>,
    index: HashMap<String, usize>,
    fetched_at: DateTime<Utc>,
}

impl Inventory {
    pub fn new(stations: Vec<Station>, fetched_at: DateTime<Utc>) -> Self {
        let index = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.station_id.clone(), i))
            .collect();
        Self {
            stations,
            index,
            fetched_at,
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, station_id: &str) -> Option<&Station> {
        self.index.get(station_id).map(|&i| &self.stations[i])
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// When the feeds were fetched.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, name: &str) -> StationInformationDto {
        StationInformationDto {
            station_id: id.to_string(),
            name: name.to_string(),
            lat: 42.36,
            lon: -71.06,
            capacity: Some(15),
        }
    }

    fn status(id: &str, bikes: u32, ebikes: u32, docks: u32) -> StationStatusDto {
        StationStatusDto {
            station_id: id.to_string(),
            num_bikes_available: Some(bikes),
            num_ebikes_available: Some(ebikes),
            num_docks_available: Some(docks),
            is_renting: Some(true),
            is_returning: Some(false),
            last_reported: Some(1_700_000_000),
        }
    }

    #[test]
    fn left_join_keeps_stations_without_status() {
        let stations = join_feeds(
            vec![info("a", "Alpha"), info("b", "Bravo")],
            &[status("a", 7, 2, 8), status("z", 1, 0, 1)],
        );

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].bikes_available(), 7);
        assert_eq!(stations[0].ebikes_available(), 2);
        assert_eq!(stations[0].regular_bikes_available(), 5);
        assert_eq!(stations[0].docks_available(), 8);
        assert!(!stations[0].is_returning());
        assert!(stations[0].availability.unwrap().last_reported.is_some());

        assert_eq!(stations[1].station_id, "b");
        assert!(stations[1].availability.is_none());
        assert_eq!(stations[1].bikes_available(), 0);
        assert!(stations[1].is_renting());
        assert!(stations[1].is_returning());
    }

    #[test]
    fn regular_bikes_never_negative() {
        let stations = join_feeds(vec![info("a", "Alpha")], &[status("a", 1, 3, 0)]);
        assert_eq!(stations[0].regular_bikes_available(), 0);
    }

    #[test]
    fn inventory_lookup_by_id() {
        let stations = join_feeds(vec![info("a", "Alpha"), info("b", "Bravo")], &[]);
        let inventory = Inventory::new(stations, Utc::now());

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.get("b").map(|s| s.name.as_str()), Some("Bravo"));
        assert!(inventory.get("c").is_none());
    }
}
