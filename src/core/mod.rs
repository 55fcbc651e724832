// Core algorithm exports
pub mod distance;
pub mod error;
pub mod filters;
pub mod nearby;
pub mod resolver;
pub mod zones;

pub use distance::{haversine_distance, distance_between, round_km, calculate_bounding_box, is_within_bounding_box};
pub use error::DeliveryError;
pub use filters::{check_zone, validate_zone_set, matches_state};
pub use nearby::{NearbyProductSearch, DEFAULT_RADIUS_KM};
pub use resolver::ZoneResolver;
pub use zones::match_zone;
