use crate::models::technician::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance in kilometres. NaN coordinates yield NaN.
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let from_lat = from.lat.to_radians();
    let to_lat = to.lat.to_radians();
    let half_dlat = ((to.lat - from.lat).to_radians() / 2.0).sin();
    let half_dlng = ((to.lng - from.lng).to_radians() / 2.0).sin();

    let h = half_dlat * half_dlat + from_lat.cos() * to_lat.cos() * half_dlng * half_dlng;

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
