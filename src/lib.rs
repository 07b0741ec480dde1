//! placefinder - Find places by name and discover nearby points of interest
//! from OpenStreetMap data

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod osm;
pub mod search;
pub mod web;
