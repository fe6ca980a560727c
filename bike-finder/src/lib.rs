//! Bike-share station finder.
//!
//! A web application that answers: "Which stations can I actually walk to
//! from here, and do they have bikes (or free docks) right now?"
//!
//! Stations come from a GBFS feed. Candidates within a straight-line radius
//! are checked against real walking routes so a station across a river
//! doesn't show up as "nearby".

pub mod config;
pub mod geo;
pub mod geocode;
pub mod inventory;
pub mod nearby;
pub mod routing;
pub mod settings;
pub mod weather;
pub mod web;
