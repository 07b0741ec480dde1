use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::NominatimConfig;
use crate::error::{ApiError, Result};

const SERVICE: &str = "Nominatim";

/// Finer place types preferred when picking a single best match
const SETTLEMENT_TYPES: [&str; 5] = ["city", "town", "village", "municipality", "hamlet"];
/// Broad classes preferred when picking a single best match
const SETTLEMENT_CLASSES: [&str; 2] = ["place", "boundary"];

#[derive(Debug, Deserialize)]
struct NominatimResult {
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default, rename = "type")]
    type_: Option<String>,
}

/// A geocoded place as ranked by Nominatim
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Broad classification ("place", "amenity", ...)
    pub class: String,
    /// Finer type ("city", "restaurant", ...)
    pub kind: String,
}

impl NominatimResult {
    fn into_candidate(self) -> Option<Candidate> {
        let lat: f64 = self.lat?.trim().parse().ok()?;
        let lon: f64 = self.lon?.trim().parse().ok()?;
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        Some(Candidate {
            name: self.display_name.unwrap_or_else(|| "Unnamed".to_string()),
            lat,
            lon,
            class: self.class.unwrap_or_else(|| "general".to_string()),
            kind: self.type_.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

/// Build the free-text query sent to the geocoder.
///
/// A category other than `general` qualifies the place, e.g.
/// `"restaurant near Madrid"`.
pub fn compose_query(place: &str, category: Option<&str>) -> String {
    let place = place.trim();
    match category.map(str::trim) {
        Some(c) if !c.is_empty() && c != "general" => format!("{} near {}", c, place),
        _ => place.to_string(),
    }
}

/// Pick the candidate a nearby search should be centered on.
///
/// Prefers the first settlement-like result (city, town, ... or a place/boundary
/// class); otherwise keeps the service's own top result.
pub fn best_match(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .find(|c| {
            SETTLEMENT_TYPES.contains(&c.kind.as_str())
                || SETTLEMENT_CLASSES.contains(&c.class.as_str())
        })
        .or_else(|| candidates.first())
}

/// Async client for the Nominatim search endpoint
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    url: String,
}

impl NominatimClient {
    pub fn new(config: &NominatimConfig, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    /// Geocode free text to a ranked list of candidates.
    ///
    /// # Arguments
    /// * `query` - Free text, e.g. "Springfield" or "school near Springfield"
    /// * `limit` - Maximum number of candidates requested
    ///
    /// # Returns
    /// * `Ok(candidates)` - Possibly empty, in Nominatim's ranking order
    /// * `Err` - If the service could not be reached or answered with an error
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Candidate>> {
        let response = self.send(query, limit, true).await?;

        let results: Vec<NominatimResult> = response.json().await.map_err(|source| {
            ApiError::Decode {
                service: SERVICE,
                source,
            }
        })?;

        let total = results.len();
        let candidates: Vec<Candidate> = results
            .into_iter()
            .filter_map(NominatimResult::into_candidate)
            .collect();

        if candidates.len() < total {
            debug!(
                skipped = total - candidates.len(),
                "dropped geocoder results without usable coordinates"
            );
        }

        Ok(candidates)
    }

    /// Geocode free text and return the untouched JSON payload
    pub async fn search_raw(&self, query: &str, limit: u32) -> Result<serde_json::Value> {
        let response = self.send(query, limit, false).await?;

        response.json().await.map_err(|source| ApiError::Decode {
            service: SERVICE,
            source,
        })
    }

    async fn send(
        &self,
        query: &str,
        limit: u32,
        address_details: bool,
    ) -> Result<reqwest::Response> {
        let limit = limit.to_string();
        let mut params = vec![("q", query), ("format", "json"), ("limit", limit.as_str())];
        if address_details {
            params.push(("addressdetails", "1"));
        }

        let response = self
            .http
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                service: SERVICE,
                source,
            })?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        Ok(response)
    }
}
