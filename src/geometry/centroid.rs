use geo::{Centroid, MultiPoint, Point};

/// Arithmetic mean of a set of (lat, lon) points.
///
/// Returns `None` for an empty slice.
pub fn mean_point(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    // geo works in (x, y) = (lon, lat)
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|&(lat, lon)| Point::new(lon, lat))
        .collect::<Vec<_>>()
        .into();

    multi.centroid().map(|c| (c.y(), c.x()))
}
