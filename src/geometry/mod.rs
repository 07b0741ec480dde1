pub mod centroid;
pub mod distance;

pub use centroid::mean_point;
pub use distance::{EARTH_RADIUS_M, haversine_distance, try_haversine_distance};
