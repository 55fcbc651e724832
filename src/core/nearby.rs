use std::collections::HashMap;

use crate::core::distance::{distance_between, round_km};
use crate::models::{
    Coordinate, NearbySeller, Product, ProductFilters, ProductWithDistance, SellerLocation,
};

/// Default search radius when the caller does not supply one
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Proximity search over sellers and their products
///
/// Distance is metadata only: products keep whatever order the catalog
/// returned them in.
#[derive(Debug, Clone, Copy)]
pub struct NearbyProductSearch {
    default_radius_km: f64,
    max_radius_km: f64,
}

impl NearbyProductSearch {
    pub fn new(default_radius_km: f64, max_radius_km: f64) -> Self {
        Self {
            default_radius_km,
            max_radius_km: max_radius_km.max(default_radius_km),
        }
    }

    /// Requested radius, or the default, capped at the configured maximum
    pub fn effective_radius(&self, requested_km: Option<f64>) -> f64 {
        requested_km
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(self.default_radius_km)
            .min(self.max_radius_km)
    }

    /// Sellers within `radius_km` of `origin`
    ///
    /// Sellers without a valid stored `[lon, lat]` pair are left out
    /// entirely.
    pub fn nearby_sellers(
        &self,
        sellers: &[SellerLocation],
        origin: &Coordinate,
        radius_km: f64,
    ) -> Vec<NearbySeller> {
        sellers
            .iter()
            .filter_map(|seller| {
                let location = seller.coordinate()?;
                let distance_km = distance_between(origin, &location);
                (distance_km <= radius_km).then(|| NearbySeller {
                    seller_id: seller.seller_id.clone(),
                    location,
                    distance_km,
                })
            })
            .collect()
    }

    /// Annotate products with the distance to their seller
    ///
    /// Order is preserved. Products whose seller is not in `nearby` are
    /// dropped.
    pub fn attach_distances(
        &self,
        products: Vec<Product>,
        nearby: &[NearbySeller],
    ) -> Vec<ProductWithDistance> {
        let distances: HashMap<&str, f64> = nearby
            .iter()
            .map(|s| (s.seller_id.as_str(), s.distance_km))
            .collect();

        products
            .into_iter()
            .filter_map(|product| {
                let distance_km = *distances.get(product.seller_id.as_str())?;
                Some(ProductWithDistance {
                    product,
                    distance: round_km(distance_km),
                })
            })
            .collect()
    }

    /// In-memory search: nearby sellers, then filters, then distances
    ///
    /// The HTTP path runs the filter stage in the database instead; this is
    /// the same pipeline for callers that already hold the catalog.
    pub fn search(
        &self,
        sellers: &[SellerLocation],
        products: Vec<Product>,
        filters: &ProductFilters,
        origin: &Coordinate,
        radius_km: Option<f64>,
    ) -> Vec<ProductWithDistance> {
        let radius_km = self.effective_radius(radius_km);
        let nearby = self.nearby_sellers(sellers, origin, radius_km);

        let filtered: Vec<Product> = products
            .into_iter()
            .filter(|product| filters.matches(product))
            .collect();

        self.attach_distances(filtered, &nearby)
    }
}

impl Default for NearbyProductSearch {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS_KM, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const BUYER: Coordinate = Coordinate { latitude: 4.8156, longitude: 7.0134 };

    fn create_product(id: &str, seller_id: &str, category: &str, age_days: i64) -> Product {
        Product {
            id: id.to_string(),
            seller_id: seller_id.to_string(),
            name: format!("Product {}", id),
            description: None,
            category: category.to_string(),
            price: 1000.0,
            rating: 4.0,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn sellers() -> Vec<SellerLocation> {
        vec![
            SellerLocation::new("near", 4.82, 7.02),          // < 1 km
            SellerLocation::new("edge", 4.86, 7.05),          // ~6 km
            SellerLocation::new("far", 4.9134, 6.2932),       // ~80 km
            SellerLocation { seller_id: "ghost".into(), coordinates: None },
            SellerLocation { seller_id: "broken".into(), coordinates: Some(vec![7.0134]) },
        ]
    }

    #[test]
    fn test_effective_radius() {
        let search = NearbyProductSearch::new(10.0, 50.0);

        assert_eq!(search.effective_radius(None), 10.0);
        assert_eq!(search.effective_radius(Some(25.0)), 25.0);
        assert_eq!(search.effective_radius(Some(500.0)), 50.0);
        assert_eq!(search.effective_radius(Some(-3.0)), 10.0);
    }

    #[test]
    fn test_nearby_sellers_excludes_unlocatable() {
        let search = NearbyProductSearch::default();

        let nearby = search.nearby_sellers(&sellers(), &BUYER, 10_000.0);
        let ids: Vec<&str> = nearby.iter().map(|s| s.seller_id.as_str()).collect();

        assert_eq!(ids, vec!["near", "edge", "far"]);
    }

    #[test]
    fn test_nearby_sellers_within_radius() {
        let search = NearbyProductSearch::default();

        let nearby = search.nearby_sellers(&sellers(), &BUYER, 10.0);
        let ids: Vec<&str> = nearby.iter().map(|s| s.seller_id.as_str()).collect();

        assert_eq!(ids, vec!["near", "edge"]);
        assert!(nearby.iter().all(|s| s.distance_km <= 10.0));
    }

    #[test]
    fn test_attach_distances_preserves_order() {
        let search = NearbyProductSearch::default();
        let nearby = search.nearby_sellers(&sellers(), &BUYER, 10.0);

        // Catalog order: edge seller first, then a far one, then near
        let products = vec![
            create_product("1", "edge", "food", 0),
            create_product("2", "far", "food", 1),
            create_product("3", "near", "food", 2),
        ];

        let result = search.attach_distances(products, &nearby);
        let ids: Vec<&str> = result.iter().map(|p| p.product.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "3"]);
        assert!(result[0].distance > result[1].distance);
        assert_eq!(result[0].distance, round_km(result[0].distance));
    }

    #[test]
    fn test_search_default_radius_and_filters() {
        let search = NearbyProductSearch::default();
        let products = vec![
            create_product("1", "near", "food", 0),
            create_product("2", "near", "fashion", 0),
            create_product("3", "far", "food", 0),
        ];
        let filters = ProductFilters {
            category: Some("food".to_string()),
            ..Default::default()
        };

        let result = search.search(&sellers(), products, &filters, &BUYER, None);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].product.id, "1");
    }
}
