use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::DeliveryError;
use crate::models::domain::{Coordinate, DeliveryQuery, DeliveryZone, ProductFilters, ProductSort};

/// Request to check whether a store delivers to a location or state
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ValidateDeliveryRequest {
    #[validate(nested)]
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub state: Option<String>,
}

impl From<ValidateDeliveryRequest> for DeliveryQuery {
    fn from(req: ValidateDeliveryRequest) -> Self {
        DeliveryQuery {
            location: req.location,
            state: req.state,
        }
    }
}

/// Request to replace a store's delivery zones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateZonesRequest {
    pub zones: Vec<DeliveryZone>,
}

/// Query string for nearby product search
///
/// Filter fields are listed flat; urlencoded extraction does not play well
/// with `#[serde(flatten)]` on numeric fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyProductsQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub radius: Option<f64>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    #[serde(rename = "minRating")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl NearbyProductsQuery {
    pub fn origin(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Reject NaN and infinite values, which pass `validator` range checks
    pub fn check_finite(&self) -> Result<(), DeliveryError> {
        DeliveryQuery::at(self.origin()).validate()?;

        let numbers = [
            ("radius", self.radius),
            ("minPrice", self.min_price),
            ("maxPrice", self.max_price),
            ("minRating", self.min_rating),
        ];
        for (name, value) in numbers {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(DeliveryError::invalid(format!("{} must be a finite number, got {}", name, value)));
            }
        }

        Ok(())
    }

    pub fn filters(&self) -> ProductFilters {
        ProductFilters {
            category: non_blank(&self.category),
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            search: non_blank(&self.search),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> NearbyProductsQuery {
        NearbyProductsQuery {
            latitude: 4.8156,
            longitude: 7.0134,
            radius: None,
            page: None,
            limit: None,
            category: Some("  ".to_string()),
            min_price: Some(100.0),
            max_price: None,
            min_rating: None,
            search: Some(" phone ".to_string()),
            sort: ProductSort::default(),
        }
    }

    #[test]
    fn test_blank_filters_dropped() {
        let filters = query().filters();
        assert_eq!(filters.category, None);
        assert_eq!(filters.search.as_deref(), Some("phone"));
        assert_eq!(filters.min_price, Some(100.0));
    }

    #[test]
    fn test_nearby_query_validation() {
        assert!(query().validate().is_ok());

        let mut bad = query();
        bad.latitude = 91.0;
        assert!(bad.validate().is_err());

        let mut zero_radius = query();
        zero_radius.radius = Some(0.0);
        assert!(zero_radius.validate().is_err());
    }

    #[test]
    fn test_nan_coordinate_rejected() {
        let query = actix_web::web::Query::<NearbyProductsQuery>::from_query("latitude=NaN&longitude=7.0")
            .unwrap()
            .into_inner();

        assert!(query.latitude.is_nan());
        assert!(query.validate().is_ok(), "range checks do not see NaN");
        assert!(query.check_finite().is_err());
    }

    #[test]
    fn test_non_finite_filters_rejected() {
        let mut nan_radius = query();
        nan_radius.radius = Some(f64::NAN);
        assert!(nan_radius.check_finite().is_err());

        let mut infinite_price = query();
        infinite_price.max_price = Some(f64::INFINITY);
        assert!(infinite_price.check_finite().is_err());

        assert!(query().check_finite().is_ok());
    }

    #[test]
    fn test_validate_delivery_request_nested() {
        let req = ValidateDeliveryRequest {
            location: Some(Coordinate::new(4.9, 200.0)),
            state: None,
        };
        assert!(req.validate().is_err());

        let empty = ValidateDeliveryRequest::default();
        assert!(empty.validate().is_ok());
    }
}
