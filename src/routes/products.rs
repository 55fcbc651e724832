use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::calculate_bounding_box;
use crate::models::{NearbyProductsQuery, NearbyProductsResponse, Pagination, SearchLocation};
use crate::routes::{error_response, AppState};

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/products/nearby", web::get().to(nearby_products));
}

/// Nearby products endpoint
///
/// GET /api/v1/products/nearby?latitude=4.81&longitude=7.01&radius=10&page=1&limit=20
///
/// Optional filters: `category`, `minPrice`, `maxPrice`, `minRating`,
/// `search`, `sort` (newest|rating|priceAsc|priceDesc).
async fn nearby_products(
    state: web::Data<AppState>,
    query: web::Query<NearbyProductsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for nearby_products: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }
    if let Err(e) = query.check_finite() {
        tracing::info!("Validation failed for nearby_products: {}", e);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", e.to_string());
    }

    let origin = query.origin();
    let radius_km = state.nearby.effective_radius(query.radius);
    let page = query.page.unwrap_or(1);
    let limit = state.page_limits.effective(query.limit);
    let filters = query.filters();

    // Stage 1: coarse bounding box in the database
    let bbox = calculate_bounding_box(origin.latitude, origin.longitude, radius_km);
    let candidates = match state.postgres.find_sellers_in_bbox(&bbox).await {
        Ok(sellers) => sellers,
        Err(e) => {
            tracing::error!("Failed to query sellers near ({}, {}): {}", origin.latitude, origin.longitude, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to query sellers", e.to_string());
        }
    };

    // Stage 2: exact radius
    let nearby = state.nearby.nearby_sellers(&candidates, &origin, radius_km);
    let seller_ids: Vec<String> = nearby.iter().map(|s| s.seller_id.clone()).collect();

    // Stage 3: catalog filters, sort and pagination
    let result = match state
        .postgres
        .query_products(&seller_ids, &filters, query.sort, page, limit)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Failed to query nearby products: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to query products", e.to_string());
        }
    };

    // Stage 4: distance metadata
    let products = state.nearby.attach_distances(result.products, &nearby);

    tracing::info!(
        "Nearby search at ({}, {}) r={}km: {} sellers, {} of {} products",
        origin.latitude,
        origin.longitude,
        radius_km,
        nearby.len(),
        products.len(),
        result.total
    );

    HttpResponse::Ok().json(NearbyProductsResponse {
        products,
        pagination: Pagination::new(page, limit, result.total),
        search_location: SearchLocation {
            latitude: origin.latitude,
            longitude: origin.longitude,
            radius: radius_km,
        },
    })
}
