const EARTH_RADIUS_KM: f64 = 6_371.0;
const MAX_DISTANCE_KM: f64 = 20_000.0;

/// Great-circle distance between two (latitude, longitude) points in
/// degrees, in kilometres.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Proximity score normalised to a 20,000km maximum (roughly half the
/// Earth's circumference). Absent either location, the neutral 0.5.
pub fn geo_score(client: Option<(f64, f64)>, upstream: Option<(f64, f64)>) -> f64 {
    match (client, upstream) {
        (Some(c), Some(u)) => 1.0 - (haversine_km(c, u) / MAX_DISTANCE_KM).clamp(0.0, 1.0),
        _ => 0.5,
    }
}
