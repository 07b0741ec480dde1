/// Mean Earth radius used for all great-circle distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two WGS84 points using the haversine formula.
///
/// # Arguments
/// * `from` - (lat, lon) in decimal degrees
/// * `to` - (lat, lon) in decimal degrees
///
/// # Returns
/// * `Some(meters)` - Distance along the sphere
/// * `None` - If any coordinate is not a finite number
pub fn try_haversine_distance(from: (f64, f64), to: (f64, f64)) -> Option<f64> {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    if ![lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return None;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` marginally outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    let meters = EARTH_RADIUS_M * c;
    meters.is_finite().then_some(meters)
}

/// Great-circle distance in meters, falling back to `0.0` when the inputs
/// cannot be measured.
///
/// Callers rendering nearby results rely on this never failing: a single bad
/// record is shown at distance 0 instead of aborting the batch. A 0 here means
/// "unknown or zero", so use [`try_haversine_distance`] where the difference
/// matters.
pub fn haversine_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    try_haversine_distance(from, to).unwrap_or(0.0)
}
