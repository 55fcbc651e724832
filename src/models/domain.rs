use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A point on the earth's surface in degrees.
///
/// Distance math always takes `(lat, lon)` explicitly; only the storage
/// boundary deals in GeoJSON `[lon, lat]` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude in [-90, 90], longitude in [-180, 180], both finite.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        // geo points are (x = lon, y = lat)
        Self {
            latitude: point.y(),
            longitude: point.x(),
        }
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

/// Delivery zone configured on a storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub cost: f64,
    #[serde(rename = "estimatedDays", default)]
    pub estimated_days: String,
    #[serde(rename = "isActive", default = "default_true", deserialize_with = "active_or_default")]
    pub is_active: bool,
    #[serde(flatten)]
    pub coverage: ZoneCoverage,
}

fn default_true() -> bool { true }

/// Only an explicit `false` deactivates a zone; `null` reads as active.
fn active_or_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Type-specific part of a delivery zone, tagged by `deliveryType`.
///
/// Radius fields are optional so that a malformed stored zone still loads
/// and is skipped at match time instead of failing the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "deliveryType")]
pub enum ZoneCoverage {
    #[serde(rename = "state-based", alias = "state")]
    State {
        #[serde(default)]
        states: Vec<String>,
    },
    #[serde(rename = "radius-based", alias = "radius")]
    Radius {
        #[serde(default)]
        location: Option<Coordinate>,
        #[serde(default)]
        radius: Option<f64>,
    },
    #[serde(other)]
    Unknown,
}

impl DeliveryZone {
    pub fn state_based(id: &str, name: &str, cost: f64, states: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            estimated_days: String::new(),
            is_active: true,
            coverage: ZoneCoverage::State {
                states: states.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn radius_based(id: &str, name: &str, cost: f64, center: Coordinate, radius_km: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            estimated_days: String::new(),
            is_active: true,
            coverage: ZoneCoverage::Radius {
                location: Some(center),
                radius: Some(radius_km),
            },
        }
    }

    pub fn with_estimated_days(mut self, estimated_days: &str) -> Self {
        self.estimated_days = estimated_days.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Shipping configuration attached to a store record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingConfig {
    #[serde(default)]
    pub zones: Vec<DeliveryZone>,
}

/// A candidate delivery destination. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryQuery {
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub state: Option<String>,
}

impl DeliveryQuery {
    pub fn at(location: Coordinate) -> Self {
        Self { location: Some(location), state: None }
    }

    pub fn in_state(state: &str) -> Self {
        Self { location: None, state: Some(state.to_string()) }
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }
}

/// A zone that qualifies for a delivery query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMatch {
    #[serde(flatten)]
    pub zone: DeliveryZone,
    /// Rounded to 2 decimals; only present for radius zones.
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none", default)]
    pub distance_km: Option<f64>,
}

/// Outcome of resolving a store's zones against one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResolution {
    pub available: bool,
    pub zones: Vec<DeliveryMatch>,
    pub cheapest: Option<DeliveryMatch>,
}

/// Seller location as stored: GeoJSON `[longitude, latitude]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerLocation {
    #[serde(rename = "sellerId")]
    pub seller_id: String,
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

impl SellerLocation {
    pub fn new(seller_id: &str, lat: f64, lon: f64) -> Self {
        Self {
            seller_id: seller_id.to_string(),
            coordinates: Some(vec![lon, lat]),
        }
    }

    /// Decode the stored `[lon, lat]` pair.
    ///
    /// Returns `None` unless there are exactly two elements forming a valid
    /// coordinate.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.coordinates.as_deref() {
            Some(&[lon, lat]) => {
                let coordinate = Coordinate::from(geo::Point::new(lon, lat));
                coordinate.is_valid().then_some(coordinate)
            }
            _ => None,
        }
    }
}

/// Seller within the search radius, with the unrounded distance
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySeller {
    pub seller_id: String,
    pub location: Coordinate,
    pub distance_km: f64,
}

/// Product listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "sellerId")]
    pub seller_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Product annotated with the distance to its seller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithDistance {
    #[serde(flatten)]
    pub product: Product,
    /// Kilometers, rounded to 2 decimals
    pub distance: f64,
}

/// Catalog filters applied to nearby products
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<f64>,
    pub search: Option<String>,
}

/// Listing order for product queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductSort {
    #[default]
    Newest,
    Rating,
    PriceAsc,
    PriceDesc,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
