pub mod nominatim;
pub mod overpass;

pub use nominatim::{Candidate, NominatimClient, best_match, compose_query};
pub use overpass::{OverpassClient, OverpassResponse, RawFeature, build_query};
