use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::config::OverpassConfig;
use crate::error::{ApiError, Result};

const SERVICE: &str = "Overpass";

/// Overpass API response with every element that could be decoded.
///
/// Elements that are not nodes or ways, or whose fields have unexpected
/// shapes, are dropped one by one instead of failing the whole response.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "RawResponse")]
pub struct OverpassResponse {
    pub elements: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}

impl From<RawResponse> for OverpassResponse {
    fn from(raw: RawResponse) -> Self {
        let total = raw.elements.len();
        let elements: Vec<RawFeature> = raw
            .elements
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        if elements.len() < total {
            debug!(
                skipped = total - elements.len(),
                "dropped Overpass elements that could not be decoded"
            );
        }

        Self { elements }
    }
}

/// A single element from Overpass: a point node or a way referencing nodes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawFeature {
    Node {
        id: u64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Way {
        id: u64,
        #[serde(default)]
        nodes: Vec<u64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
}

impl RawFeature {
    pub fn id(&self) -> u64 {
        match self {
            RawFeature::Node { id, .. } | RawFeature::Way { id, .. } => *id,
        }
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        match self {
            RawFeature::Node { tags, .. } | RawFeature::Way { tags, .. } => tags,
        }
    }
}

/// Build the Overpass QL query for features matching `filter` around a point.
///
/// Both nodes and ways are requested, followed by the member nodes of the
/// ways so their centroids can be resolved.
pub fn build_query(center: (f64, f64), radius_m: u32, filter: &str, timeout_secs: u64) -> String {
    let (lat, lon) = center;
    format!(
        r#"[out:json][timeout:{timeout}];
(
  node{filter}(around:{radius},{lat},{lon});
  way{filter}(around:{radius},{lat},{lon});
);
out body;
>;
out skel qt;"#,
        timeout = timeout_secs,
        filter = filter,
        radius = radius_m,
        lat = lat,
        lon = lon
    )
}

/// Async client for the Overpass interpreter endpoint
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    url: String,
    timeout_secs: u64,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            // Client timeout slightly higher than the server-side query timeout
            .timeout(Duration::from_secs(config.timeout_secs.saturating_add(5)))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            url: config.url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Fetch features matching `filter` within `radius_m` of `center`.
    ///
    /// # Arguments
    /// * `center` - (lat, lon) center point
    /// * `radius_m` - Radius in meters
    /// * `filter` - Overpass QL tag filter, e.g. `["amenity"="cafe"]`
    ///
    /// # Returns
    /// * `OverpassResponse` containing matching nodes and ways plus way members
    pub async fn fetch_features(
        &self,
        center: (f64, f64),
        radius_m: u32,
        filter: &str,
    ) -> Result<OverpassResponse> {
        let query = build_query(center, radius_m, filter, self.timeout_secs);

        // Overpass expects form-encoded POST data: data=<query>
        let response = self
            .http
            .post(&self.url)
            .form(&[("data", query.as_str())])
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

        response.json().await.map_err(|source| ApiError::Decode {
            service: SERVICE,
            source,
        })
    }
}
