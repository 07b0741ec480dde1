//! The geocode → nearby search pipeline shared by every web route.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{Candidate, NominatimClient, OverpassClient, best_match, compose_query};
use crate::config::FileConfig;
use crate::domain::{Category, ResolvedPlace, SearchOrigin};
use crate::error::ApiError;
use crate::osm::build_places;

/// Limit used by the raw JSON passthrough
pub const RAW_SEARCH_LIMIT: u32 = 5;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Nothing to search for; no request was sent
    #[error("please enter a place to search for")]
    EmptyInput,

    #[error("could not reach the search service")]
    Unreachable(#[source] ApiError),

    #[error("no results found for '{query}'")]
    NoResults { query: String },
}

/// Every candidate the geocoder returned for a query
#[derive(Debug, Clone)]
pub struct CandidateSearch {
    pub query: String,
    pub candidates: Vec<Candidate>,
}

/// A best-match origin and the places found around it
#[derive(Debug, Clone)]
pub struct Exploration {
    pub query: String,
    pub origin: SearchOrigin,
    pub places: Vec<ResolvedPlace>,
}

/// Holds the upstream clients and search settings. Immutable once built.
#[derive(Debug, Clone)]
pub struct Finder {
    geocoder: NominatimClient,
    features: OverpassClient,
    geocode_limit: u32,
    radius_m: u32,
}

impl Finder {
    pub fn new(
        geocoder: NominatimClient,
        features: OverpassClient,
        geocode_limit: u32,
        radius_m: u32,
    ) -> Self {
        Self {
            geocoder,
            features,
            geocode_limit,
            radius_m,
        }
    }

    pub fn from_config(config: &FileConfig) -> Result<Self, ApiError> {
        let geocoder = NominatimClient::new(&config.nominatim, &config.user_agent)?;
        let features = OverpassClient::new(&config.overpass, &config.user_agent)?;
        Ok(Self::new(
            geocoder,
            features,
            config.nominatim.limit,
            config.overpass.radius_m,
        ))
    }

    /// Geocode a place, optionally qualified by a category, and keep every
    /// candidate.
    pub async fn candidates(
        &self,
        place: &str,
        category: Option<&str>,
    ) -> Result<CandidateSearch, SearchError> {
        if place.trim().is_empty() {
            return Err(SearchError::EmptyInput);
        }

        let query = compose_query(place, category);
        let candidates = self.geocode(&query).await?;

        Ok(CandidateSearch { query, candidates })
    }

    /// Geocode a place, center on its best match and search nearby places
    /// of `category`.
    pub async fn explore(&self, place: &str, category: &str) -> Result<Exploration, SearchError> {
        if place.trim().is_empty() {
            return Err(SearchError::EmptyInput);
        }

        let query = compose_query(place, None);
        let candidates = self.geocode(&query).await?;
        let best = best_match(&candidates).ok_or_else(|| SearchError::NoResults {
            query: query.clone(),
        })?;

        let origin = SearchOrigin::new(best.lat, best.lon, best.name.clone());
        let places = self.nearby(&origin, category).await;

        Ok(Exploration {
            query,
            origin,
            places,
        })
    }

    /// Places of `category` around `origin`, closest first.
    ///
    /// Never fails: an unreachable or misbehaving feature service yields an
    /// empty list.
    pub async fn nearby(&self, origin: &SearchOrigin, category: &str) -> Vec<ResolvedPlace> {
        let filter = Category::from_key(category).filter();

        match self
            .features
            .fetch_features(origin.point(), self.radius_m, filter)
            .await
        {
            Ok(response) => {
                let places = build_places(origin.point(), &response, category);
                info!(
                    origin = %origin.name,
                    category,
                    elements = response.elements.len(),
                    places = places.len(),
                    "nearby search complete"
                );
                places
            }
            Err(e) => {
                warn!(error = ?e, category, "nearby search failed");
                Vec::new()
            }
        }
    }

    /// Geocoder payload for `query`, untouched
    pub async fn raw_search(&self, query: &str) -> Result<serde_json::Value, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyInput);
        }

        self.geocoder
            .search_raw(query.trim(), RAW_SEARCH_LIMIT)
            .await
            .map_err(|e| {
                warn!(error = ?e, "raw geocoder search failed");
                SearchError::Unreachable(e)
            })
    }

    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, SearchError> {
        let candidates = self
            .geocoder
            .search(query, self.geocode_limit)
            .await
            .map_err(|e| {
                warn!(error = ?e, query, "geocoding failed");
                SearchError::Unreachable(e)
            })?;

        if candidates.is_empty() {
            return Err(SearchError::NoResults {
                query: query.to_string(),
            });
        }

        info!(query, candidates = candidates.len(), "geocoded");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NominatimConfig, OverpassConfig};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn finder_for(server_uri: &str) -> Finder {
        let nominatim = NominatimConfig {
            url: format!("{}/search", server_uri),
            ..NominatimConfig::default()
        };
        let overpass = OverpassConfig {
            url: format!("{}/api/interpreter", server_uri),
            ..OverpassConfig::default()
        };
        Finder::new(
            NominatimClient::new(&nominatim, "placefinder-test/0.1").unwrap(),
            OverpassClient::new(&overpass, "placefinder-test/0.1").unwrap(),
            10,
            1000,
        )
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let finder = finder_for(&server.uri());
        assert!(matches!(
            finder.candidates("  ", Some("school")).await,
            Err(SearchError::EmptyInput)
        ));
        assert!(matches!(
            finder.explore("", "school").await,
            Err(SearchError::EmptyInput)
        ));
        assert!(matches!(
            finder.raw_search("").await,
            Err(SearchError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn test_no_results_is_distinct_from_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let finder = finder_for(&server.uri());
        match finder.candidates("Atlantis", Some("museum")).await {
            Err(SearchError::NoResults { query }) => assert_eq!(query, "museum near Atlantis"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Port 1 is never served in the test environment
        let finder = finder_for("http://127.0.0.1:1");
        assert!(matches!(
            finder.candidates("Springfield", None).await,
            Err(SearchError::Unreachable(_))
        ));

        let origin = SearchOrigin::new(0.0, 0.0, "Nowhere");
        assert!(finder.nearby(&origin, "school").await.is_empty());
    }

    #[tokio::test]
    async fn test_explore_uses_best_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Springfield"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "5.0", "lon": "5.0", "display_name": "Springfield Mall", "class": "shop", "type": "mall"},
                {"lat": "0.0", "lon": "0.0", "display_name": "Springfield", "class": "place", "type": "city"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "elements": [
                    {"type": "node", "id": 1, "lat": 0.0045, "lon": 0.0, "tags": {"name": "Far School"}},
                    {"type": "node", "id": 2, "lat": 0.0009, "lon": 0.0, "tags": {"name": "Near School"}}
                ]
            })))
            .mount(&server)
            .await;

        let finder = finder_for(&server.uri());
        let exploration = finder.explore("Springfield", "school").await.unwrap();

        assert_eq!(exploration.origin.name, "Springfield");
        assert_eq!(exploration.places.len(), 2);
        assert_eq!(exploration.places[0].name, "Near School");
        assert_eq!(exploration.places[0].category, "School");
        assert!(exploration.places[0].distance_m < exploration.places[1].distance_m);
    }

    #[tokio::test]
    async fn test_nearby_failure_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let finder = finder_for(&server.uri());
        let origin = SearchOrigin::new(1.0, 1.0, "Somewhere");
        assert!(finder.nearby(&origin, "atm").await.is_empty());
    }
}
