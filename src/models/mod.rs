// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, Coordinate, DeliveryMatch, DeliveryQuery, DeliveryResolution, DeliveryZone,
    NearbySeller, Product, ProductFilters, ProductSort, ProductWithDistance, SellerLocation,
    ShippingConfig, ZoneCoverage,
};
pub use requests::{NearbyProductsQuery, UpdateZonesRequest, ValidateDeliveryRequest};
pub use responses::{
    ErrorResponse, HealthResponse, NearbyProductsResponse, Pagination, SearchLocation,
    ValidateDeliveryResponse, ZonesResponse,
};
