//! Market Delivery - delivery-zone resolution for the marketplace backend
//!
//! Given a storefront's state-based and radius-based delivery zones and a
//! buyer's location or state, this library works out which zones apply and
//! which is cheapest. It also annotates nearby product listings with the
//! distance to each seller.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{ZoneResolver, NearbyProductSearch, DeliveryError, match_zone, distance::haversine_distance};
pub use models::{Coordinate, DeliveryZone, DeliveryQuery, DeliveryMatch, DeliveryResolution, SellerLocation};
