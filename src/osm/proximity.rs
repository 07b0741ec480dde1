use std::collections::{HashMap, HashSet};

use crate::api::{OverpassResponse, RawFeature};
use crate::domain::{NO_ADDRESS, PHONE_UNAVAILABLE, ResolvedPlace, category_label};
use crate::geometry::{haversine_distance, mean_point};

/// Maximum number of places returned by a nearby search
pub const MAX_RESULTS: usize = 50;

/// Turn an Overpass response into the ranked list of nearby places.
///
/// # Algorithm
/// 1. Build node_id → (lat, lon) lookup map from all node elements
/// 2. Resolve each feature's location; ways use the mean of their known
///    member nodes and are dropped if none are known
/// 3. Skip unnamed features and identifiers that already produced a place
/// 4. Measure the haversine distance from `origin`
/// 5. Sort by distance (stable) and keep the closest [`MAX_RESULTS`]
pub fn build_places(
    origin: (f64, f64),
    response: &OverpassResponse,
    category: &str,
) -> Vec<ResolvedPlace> {
    let nodes = build_node_lookup(response);
    let label = category_label(category);

    let mut seen = HashSet::new();
    let mut places = Vec::new();

    for feature in &response.elements {
        let Some((lat, lon)) = resolve_location(feature, &nodes) else {
            continue;
        };

        let tags = feature.tags();
        let name = match tags.get("name").map(|n| n.trim()) {
            Some(n) if !n.is_empty() => n,
            _ => continue,
        };

        if !seen.insert(feature.id()) {
            continue;
        }

        let distance = haversine_distance(origin, (lat, lon));

        places.push(ResolvedPlace {
            id: feature.id(),
            name: name.to_string(),
            lat,
            lon,
            address: format_address(tags),
            phone: phone(tags),
            website: website(tags),
            distance_m: distance.round() as u64,
            category: label.clone(),
        });
    }

    places.sort_by_key(|p| p.distance_m);
    places.truncate(MAX_RESULTS);
    places
}

fn build_node_lookup(response: &OverpassResponse) -> HashMap<u64, (f64, f64)> {
    response
        .elements
        .iter()
        .filter_map(|e| match e {
            RawFeature::Node { id, lat, lon, .. } => Some((*id, (*lat, *lon))),
            RawFeature::Way { .. } => None,
        })
        .collect()
}

fn resolve_location(
    feature: &RawFeature,
    nodes: &HashMap<u64, (f64, f64)>,
) -> Option<(f64, f64)> {
    match feature {
        RawFeature::Node { lat, lon, .. } => Some((*lat, *lon)),
        RawFeature::Way { nodes: refs, .. } => {
            let points: Vec<(f64, f64)> = refs
                .iter()
                .filter_map(|id| nodes.get(id).copied())
                .collect();
            mean_point(&points)
        }
    }
}

fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// "{street} {housenumber}, {city}", omitting missing parts
pub fn format_address(tags: &HashMap<String, String>) -> String {
    let street_line = [tag(tags, "addr:street"), tag(tags, "addr:housenumber")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let parts: Vec<&str> = [Some(street_line.as_str()), tag(tags, "addr:city")]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        NO_ADDRESS.to_string()
    } else {
        parts.join(", ")
    }
}

pub fn phone(tags: &HashMap<String, String>) -> String {
    tag(tags, "phone")
        .or_else(|| tag(tags, "contact:phone"))
        .unwrap_or(PHONE_UNAVAILABLE)
        .to_string()
}

pub fn website(tags: &HashMap<String, String>) -> String {
    tag(tags, "website")
        .or_else(|| tag(tags, "contact:website"))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EARTH_RADIUS_M;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node(id: u64, lat: f64, lon: f64, name: Option<&str>) -> RawFeature {
        RawFeature::Node {
            id,
            lat,
            lon,
            tags: name.map(|n| tags(&[("name", n)])).unwrap_or_default(),
        }
    }

    fn way(id: u64, nodes: Vec<u64>, name: &str) -> RawFeature {
        RawFeature::Way {
            id,
            nodes,
            tags: tags(&[("name", name)]),
        }
    }

    /// Latitude offset (degrees, along a meridian) for a given distance
    fn lat_for_meters(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_M).to_degrees()
    }

    #[test]
    fn test_sorted_by_distance() {
        let response = OverpassResponse {
            elements: vec![
                node(1, lat_for_meters(500.0), 0.0, Some("Far")),
                node(2, lat_for_meters(100.0), 0.0, Some("Near")),
            ],
        };

        let places = build_places((0.0, 0.0), &response, "restaurant");
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Near");
        assert_eq!(places[0].distance_m, 100);
        assert_eq!(places[1].name, "Far");
        assert_eq!(places[1].distance_m, 500);
    }

    #[test]
    fn test_way_uses_member_centroid() {
        let response = OverpassResponse {
            elements: vec![
                node(10, 10.0, 20.0, None),
                node(11, 10.0, 22.0, None),
                way(100, vec![10, 11, 999], "Park"),
            ],
        };

        let places = build_places((10.0, 21.0), &response, "park");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, 100);
        assert!((places[0].lat - 10.0).abs() < 1e-9);
        assert!((places[0].lon - 21.0).abs() < 1e-9);
        assert_eq!(places[0].distance_m, 0);
    }

    #[test]
    fn test_way_without_known_members_is_dropped() {
        let response = OverpassResponse {
            elements: vec![way(100, vec![1, 2], "Ghost"), way(101, vec![], "Empty")],
        };

        assert!(build_places((0.0, 0.0), &response, "park").is_empty());
    }

    #[test]
    fn test_unnamed_features_are_excluded() {
        let response = OverpassResponse {
            elements: vec![
                node(1, 0.001, 0.0, None),
                node(2, 0.002, 0.0, Some("   ")),
                node(3, 0.003, 0.0, Some("Named")),
            ],
        };

        let places = build_places((0.0, 0.0), &response, "atm");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, 3);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let response = OverpassResponse {
            elements: vec![
                node(1, 0.0, 0.0, None),
                node(7, 0.01, 0.0, Some("First")),
                node(7, 0.001, 0.0, Some("Second")),
                way(7, vec![1], "As way"),
            ],
        };

        let places = build_places((0.0, 0.0), &response, "cinema");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "First");
    }

    #[test]
    fn test_unnamed_duplicate_does_not_block_named() {
        let response = OverpassResponse {
            elements: vec![node(7, 0.0, 0.0, None), node(7, 0.0, 0.0, Some("Named"))],
        };

        let places = build_places((0.0, 0.0), &response, "cinema");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Named");
    }

    #[test]
    fn test_results_are_capped_sorted_and_unique() {
        let elements = (0..120u64)
            .map(|i| {
                // Reverse order and repeat ids to exercise sorting and dedup
                let id = i % 80;
                node(id, 0.0001 * (120 - i) as f64, 0.0, Some("Shop"))
            })
            .collect();
        let response = OverpassResponse { elements };

        let places = build_places((0.0, 0.0), &response, "supermarket");
        assert_eq!(places.len(), MAX_RESULTS);
        assert!(places.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));

        let ids: HashSet<u64> = places.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), places.len());
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let response = OverpassResponse {
            elements: vec![
                node(1, 0.0, 0.001, Some("East")),
                node(2, 0.0, -0.001, Some("West")),
            ],
        };

        let places = build_places((0.0, 0.0), &response, "police");
        assert_eq!(places[0].name, "East");
        assert_eq!(places[1].name, "West");
    }

    #[test]
    fn test_presentation_fields() {
        let response = OverpassResponse {
            elements: vec![RawFeature::Node {
                id: 1,
                lat: 0.0,
                lon: 0.0,
                tags: tags(&[
                    ("name", "Joe's"),
                    ("contact:phone", "+1 555 0100"),
                    ("contact:website", "https://joes.example"),
                ]),
            }],
        };

        let places = build_places((0.0, 0.0), &response, "fast_food");
        let place = &places[0];
        assert_eq!(place.address, NO_ADDRESS);
        assert_eq!(place.phone, "+1 555 0100");
        assert_eq!(place.website, "https://joes.example");
        assert_eq!(place.category, "Fast Food");
    }

    #[test]
    fn test_format_address() {
        let full = tags(&[
            ("addr:street", "Main St"),
            ("addr:housenumber", "5"),
            ("addr:city", "Springfield"),
        ]);
        assert_eq!(format_address(&full), "Main St 5, Springfield");

        assert_eq!(
            format_address(&tags(&[("addr:street", "Main St")])),
            "Main St"
        );
        assert_eq!(
            format_address(&tags(&[("addr:city", "Springfield")])),
            "Springfield"
        );
        assert_eq!(
            format_address(&tags(&[("addr:housenumber", "5"), ("addr:city", "Springfield")])),
            "5, Springfield"
        );
        assert_eq!(format_address(&HashMap::new()), NO_ADDRESS);
    }

    #[test]
    fn test_phone_and_website_fallbacks() {
        let primary = tags(&[
            ("phone", "111"),
            ("contact:phone", "222"),
            ("website", "https://a.example"),
            ("contact:website", "https://b.example"),
        ]);
        assert_eq!(phone(&primary), "111");
        assert_eq!(website(&primary), "https://a.example");

        let empty = HashMap::new();
        assert_eq!(phone(&empty), PHONE_UNAVAILABLE);
        assert_eq!(website(&empty), "");
    }
}
