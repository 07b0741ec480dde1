use serde::Serialize;

/// Shown when a feature carries no address tags
pub const NO_ADDRESS: &str = "Address not available";
/// Shown when a feature carries no phone tag
pub const PHONE_UNAVAILABLE: &str = "Not available";

/// The point a nearby search is centered on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOrigin {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl SearchOrigin {
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: name.into(),
        }
    }

    /// (lat, lon) pair
    pub fn point(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A nearby point of interest ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlace {
    pub id: u64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: String,
    pub phone: String,
    pub website: String,
    /// Meters from the search origin, rounded
    pub distance_m: u64,
    pub category: String,
}
