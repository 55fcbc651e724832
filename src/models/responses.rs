use serde::{Deserialize, Serialize};
use crate::models::domain::{DeliveryMatch, DeliveryResolution, DeliveryZone, ProductWithDistance};

/// Response for the validate-delivery endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateDeliveryResponse {
    pub available: bool,
    pub zones: Vec<DeliveryMatch>,
    #[serde(rename = "cheapestOption")]
    pub cheapest_option: Option<DeliveryMatch>,
}

impl From<DeliveryResolution> for ValidateDeliveryResponse {
    fn from(resolution: DeliveryResolution) -> Self {
        Self {
            available: resolution.available,
            zones: resolution.zones,
            cheapest_option: resolution.cheapest,
        }
    }
}

/// A store's configured delivery zones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesResponse {
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub zones: Vec<DeliveryZone>,
}

/// Response for nearby product search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyProductsResponse {
    pub products: Vec<ProductWithDistance>,
    pub pagination: Pagination,
    #[serde(rename = "searchLocation")]
    pub search_location: SearchLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit as u64) };
        Self { page, limit, total, pages }
    }
}

/// Echo of the search origin and effective radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
