use crate::models::{BoundingBox, Coordinate};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude, rounded down so boxes err on the wide side
const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers. Inputs are not validated.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two coordinates in kilometers
#[inline]
pub fn distance_between(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Round a distance to 2 decimal places for display
#[inline]
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Calculate a bounding box around a center point
///
/// Used as a cheap pre-filter before exact Haversine checks, so it must
/// contain every point within `radius_km`. Near the poles or across the
/// antimeridian the longitude range widens to the full circle.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let min_lat = (lat - lat_delta).max(-90.0);
    let max_lat = (lat + lat_delta).min(90.0);

    // Longitude degrees shrink towards the poles; size the box on the
    // poleward edge.
    let widest_lat = min_lat.abs().max(max_lat.abs());
    let cos_lat = widest_lat.to_radians().cos();

    let (min_lon, max_lon) = if widest_lat >= 90.0 || cos_lat <= f64::EPSILON {
        (-180.0, 180.0)
    } else {
        let lon_delta = radius_km / (KM_PER_DEGREE * cos_lat);
        let (min_lon, max_lon) = (lon - lon_delta, lon + lon_delta);
        if min_lon < -180.0 || max_lon > 180.0 {
            (-180.0, 180.0)
        } else {
            (min_lon, max_lon)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(
    lat: f64,
    lon: f64,
    bbox: &BoundingBox,
) -> bool {
    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && lon >= bbox.min_lon
        && lon <= bbox.max_lon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let ab = haversine_distance(4.8156, 7.0134, 6.5244, 3.3792);
        let ba = haversine_distance(6.5244, 3.3792, 4.8156, 7.0134);

        assert_eq!(ab, ba);
        assert_eq!(haversine_distance(4.8156, 7.0134, 4.8156, 7.0134), 0.0);
    }

    #[test]
    fn test_meridian_arc() {
        // One radian of latitude along a meridian is exactly one earth radius
        let distance = haversine_distance(0.0, 10.0, 1.0_f64.to_degrees(), 10.0);
        assert!((distance - EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(80.534_9), 80.53);
        assert_eq!(round_km(80.535_1), 80.54);
        assert_eq!(round_km(0.0), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(40.7128, -74.0060, 10.0);

        assert!(bbox.min_lat < 40.7128);
        assert!(bbox.max_lat > 40.7128);
        assert!(bbox.min_lon < -74.0060);
        assert!(bbox.max_lon > -74.0060);

        // Check approximate size (20km / 111km per degree = ~0.18 degrees)
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_bounding_box_near_pole() {
        let bbox = calculate_bounding_box(89.5, 20.0, 100.0);

        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
    }

    #[test]
    fn test_bounding_box_antimeridian() {
        let bbox = calculate_bounding_box(-17.7, 179.9, 50.0);

        assert!(is_within_bounding_box(-17.7, -179.9, &bbox));
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(40.7128, -74.0060, 10.0);

        // Center point should be within
        assert!(is_within_bounding_box(40.7128, -74.0060, &bbox));

        // Close point should be within
        assert!(is_within_bounding_box(40.71, -74.0, &bbox));

        // Far point should not be within
        assert!(!is_within_bounding_box(50.0, -80.0, &bbox));
    }
}
