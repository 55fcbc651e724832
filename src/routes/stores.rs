use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::validate_zone_set;
use crate::models::{
    DeliveryQuery, DeliveryZone, ShippingConfig, UpdateZonesRequest, ValidateDeliveryRequest,
    ValidateDeliveryResponse, ZonesResponse,
};
use crate::routes::{error_response, AppState};
use crate::services::PostgresError;

/// Configure store delivery routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/stores/{id}/validate-delivery", web::post().to(validate_delivery))
        .service(
            web::resource("/stores/{id}/delivery-zones")
                .route(web::get().to(get_zones))
                .route(web::put().to(update_zones)),
        );
}

/// Validate delivery endpoint
///
/// POST /api/v1/stores/{id}/validate-delivery
///
/// Request body:
/// ```json
/// {
///   "location": { "latitude": 4.9134, "longitude": 6.2932 },
///   "state": "Rivers"
/// }
/// ```
///
/// "No zone applies" is a normal 200 with `available: false`.
async fn validate_delivery(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ValidateDeliveryRequest>,
) -> impl Responder {
    let store_id = path.into_inner();

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for validate_delivery on store {}: {:?}", store_id, errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let query = DeliveryQuery::from(req.into_inner());
    if let Err(e) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", e.to_string());
    }

    let shipping = match load_shipping(&state, &store_id).await {
        Ok(shipping) => shipping,
        Err(e) => return store_error(&store_id, e),
    };

    let resolution = state.resolver.resolve(&shipping.zones, &query);

    tracing::info!(
        "Store {}: {} of {} zones available, cheapest {:?}",
        store_id,
        resolution.zones.len(),
        shipping.zones.len(),
        resolution.cheapest.as_ref().map(|m| m.zone.id.as_str())
    );

    HttpResponse::Ok().json(ValidateDeliveryResponse::from(resolution))
}

/// Get a store's delivery zones
///
/// GET /api/v1/stores/{id}/delivery-zones
async fn get_zones(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let store_id = path.into_inner();

    match load_shipping(&state, &store_id).await {
        Ok(shipping) => HttpResponse::Ok().json(ZonesResponse {
            store_id,
            zones: shipping.zones,
        }),
        Err(e) => store_error(&store_id, e),
    }
}

/// Replace a store's delivery zones
///
/// PUT /api/v1/stores/{id}/delivery-zones
///
/// Zones submitted without an id get a generated one. The whole set is
/// validated before anything is written.
async fn update_zones(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateZonesRequest>,
) -> impl Responder {
    let store_id = path.into_inner();
    let zones = assign_zone_ids(req.into_inner().zones);

    if let Err(e) = validate_zone_set(&zones) {
        tracing::info!("Rejected zone set for store {}: {}", store_id, e);
        return error_response(StatusCode::BAD_REQUEST, "Invalid delivery zones", e.to_string());
    }

    let shipping = match state.postgres.replace_zones(&store_id, &zones).await {
        Ok(shipping) => shipping,
        Err(e) => return store_error(&store_id, e),
    };

    if let Err(e) = state.cache.invalidate(&store_id).await {
        tracing::warn!("Failed to invalidate cache for store {}: {}", store_id, e);
    }

    HttpResponse::Ok().json(ZonesResponse {
        store_id,
        zones: shipping.zones,
    })
}

/// Load a store's shipping configuration, cache first
///
/// Cache failures fall through to the database.
async fn load_shipping(state: &AppState, store_id: &str) -> Result<ShippingConfig, PostgresError> {
    match state.cache.get(store_id).await {
        Ok(Some(shipping)) => return Ok(shipping),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache read failed for store {}, using database: {}", store_id, e),
    }

    let shipping = state.postgres.get_shipping(store_id).await?;

    if let Err(e) = state.cache.put(store_id, &shipping).await {
        tracing::warn!("Failed to cache shipping for store {}: {}", store_id, e);
    }

    Ok(shipping)
}

fn assign_zone_ids(zones: Vec<DeliveryZone>) -> Vec<DeliveryZone> {
    zones
        .into_iter()
        .map(|mut zone| {
            if zone.id.trim().is_empty() {
                zone.id = uuid::Uuid::new_v4().to_string();
            }
            zone
        })
        .collect()
}

fn store_error(store_id: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(message) => {
            error_response(StatusCode::NOT_FOUND, "Store not found", message)
        }
        e => {
            tracing::error!("Failed to access store {}: {}", store_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load store", e.to_string())
        }
    }
}
