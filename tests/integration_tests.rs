// Integration tests for Market Delivery

use market_delivery::core::{NearbyProductSearch, ZoneResolver};
use market_delivery::models::{
    Coordinate, DeliveryQuery, DeliveryZone, Product, ProductFilters, SellerLocation,
    ShippingConfig, ValidateDeliveryResponse,
};
use chrono::Utc;
use serde_json::json;

const PORT_HARCOURT: Coordinate = Coordinate { latitude: 4.8156, longitude: 7.0134 };
const BUYER: Coordinate = Coordinate { latitude: 4.9134, longitude: 6.2932 };

/// Port Harcourt seller's zones as they are stored on the store record
fn port_harcourt_shipping() -> ShippingConfig {
    serde_json::from_value(json!({
        "zones": [
            {
                "id": "rivers",
                "name": "Rivers State",
                "deliveryType": "state-based",
                "cost": 1500,
                "estimatedDays": "1-2",
                "states": ["Rivers"]
            },
            {
                "id": "r50",
                "name": "Within 50km",
                "deliveryType": "radius-based",
                "cost": 1000,
                "estimatedDays": "same day",
                "location": { "latitude": 4.8156, "longitude": 7.0134 },
                "radius": 50
            },
            {
                "id": "r100",
                "name": "Within 100km",
                "deliveryType": "radius-based",
                "cost": 2000,
                "estimatedDays": "1-3",
                "location": { "latitude": 4.8156, "longitude": 7.0134 },
                "radius": 100
            }
        ]
    }))
    .unwrap()
}

#[test]
fn test_integration_port_harcourt_scenario() {
    let shipping = port_harcourt_shipping();
    let query = DeliveryQuery::at(BUYER).with_state("Rivers");

    let result = ZoneResolver::new().resolve(&shipping.zones, &query);

    assert!(result.available);

    let ids: Vec<&str> = result.zones.iter().map(|m| m.zone.id.as_str()).collect();
    assert_eq!(ids, vec!["rivers", "r100"], "Only the state zone and the 100km zone should apply");

    let cheapest = result.cheapest.unwrap();
    assert_eq!(cheapest.zone.id, "rivers");
    assert_eq!(cheapest.zone.cost, 1500.0);
    assert_eq!(cheapest.distance_km, None);

    let distance = result.zones[1].distance_km.unwrap();
    assert!(distance > 75.0 && distance < 85.0, "Expected ~80km, got {}", distance);
}

#[test]
fn test_integration_buyer_outside_state() {
    let shipping = port_harcourt_shipping();
    let query = DeliveryQuery::at(BUYER).with_state("Lagos");

    let result = ZoneResolver::new().resolve(&shipping.zones, &query);

    assert_eq!(result.zones.len(), 1);
    assert_eq!(result.cheapest.unwrap().zone.id, "r100");
}

#[test]
fn test_integration_buyer_in_town_gets_cheapest_radius() {
    let shipping = port_harcourt_shipping();
    let query = DeliveryQuery::at(Coordinate::new(4.82, 7.02)).with_state("rivers");

    let result = ZoneResolver::new().resolve(&shipping.zones, &query);

    let costs: Vec<f64> = result.zones.iter().map(|m| m.zone.cost).collect();
    assert_eq!(costs, vec![1000.0, 1500.0, 2000.0]);
    assert_eq!(result.cheapest.unwrap().zone.id, "r50");
}

#[test]
fn test_integration_no_zone_is_not_an_error() {
    let shipping = port_harcourt_shipping();
    let query = DeliveryQuery::at(Coordinate::new(9.0765, 7.3986)).with_state("FCT");

    let result = ZoneResolver::new().resolve(&shipping.zones, &query);
    let response = serde_json::to_value(ValidateDeliveryResponse::from(result)).unwrap();

    assert_eq!(response["available"], false);
    assert_eq!(response["zones"], json!([]));
    assert!(response["cheapestOption"].is_null());
}

#[test]
fn test_integration_response_shape() {
    let shipping = port_harcourt_shipping();
    let query = DeliveryQuery::at(BUYER).with_state("Rivers");

    let result = ZoneResolver::new().resolve(&shipping.zones, &query);
    let response = serde_json::to_value(ValidateDeliveryResponse::from(result)).unwrap();

    assert_eq!(response["available"], true);
    assert_eq!(response["cheapestOption"]["id"], "rivers");
    assert_eq!(response["cheapestOption"]["deliveryType"], "state-based");
    assert!(response["cheapestOption"].get("distanceKm").is_none());
    assert_eq!(response["zones"][1]["deliveryType"], "radius-based");
    assert!(response["zones"][1]["distanceKm"].is_number());
}

#[test]
fn test_integration_inactive_zone_from_storage() {
    let mut shipping = port_harcourt_shipping();
    shipping.zones.push(
        DeliveryZone::radius_based("promo", "Promo", 100.0, PORT_HARCOURT, 200.0).inactive(),
    );

    let result = ZoneResolver::new().resolve(&shipping.zones, &DeliveryQuery::at(BUYER));

    assert!(result.zones.iter().all(|m| m.zone.id != "promo"));
    assert_eq!(result.cheapest.unwrap().zone.id, "r100");
}

#[test]
fn test_integration_nearby_search() {
    let search = NearbyProductSearch::new(10.0, 100.0);
    let sellers = vec![
        SellerLocation::new("ph-market", 4.82, 7.02),
        SellerLocation::new("owerri", 5.4836, 7.0333),
        SellerLocation { seller_id: "no-address".to_string(), coordinates: None },
    ];
    let products = vec![
        product("1", "ph-market", "Garri", 4.5),
        product("2", "owerri", "Garri", 4.9),
        product("3", "no-address", "Garri", 5.0),
        product("4", "ph-market", "Plantain", 3.0),
    ];

    let filters = ProductFilters {
        min_rating: Some(4.0),
        ..Default::default()
    };

    let nearby = search.search(&sellers, products.clone(), &filters, &PORT_HARCOURT, None);
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].product.id, "1");

    // Owerri is ~74km away; widening the radius brings it in
    let wide = search.search(&sellers, products, &filters, &PORT_HARCOURT, Some(100.0));
    let ids: Vec<&str> = wide.iter().map(|p| p.product.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

fn product(id: &str, seller_id: &str, name: &str, rating: f64) -> Product {
    Product {
        id: id.to_string(),
        seller_id: seller_id.to_string(),
        name: name.to_string(),
        description: None,
        category: "food".to_string(),
        price: 1200.0,
        rating,
        created_at: Utc::now(),
    }
}
