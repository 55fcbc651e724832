use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    BoundingBox, DeliveryZone, Product, ProductFilters, ProductSort, SellerLocation, ShippingConfig,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// One page of catalog results plus the unpaginated total
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

/// PostgreSQL client for stores, sellers and products
///
/// This is the persistence collaborator of the delivery core: it loads
/// zone sets and seller coordinates, runs catalog filtering, and owns
/// zone-set writes. Nothing in `core` talks to it directly.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Load a store's shipping configuration
    ///
    /// Zones are decoded one by one; a zone that fails to decode is logged
    /// and dropped so it cannot take the rest of the store down with it.
    pub async fn get_shipping(&self, store_id: &str) -> Result<ShippingConfig, PostgresError> {
        let query = r#"
            SELECT shipping
            FROM stores
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Store {} not found", store_id)))?;

        let shipping: sqlx::types::Json<Value> = row.try_get("shipping")?;

        Ok(decode_shipping(store_id, shipping.0))
    }

    /// Replace a store's zone set, returning what was stored
    ///
    /// Callers validate the zones first; this only persists them.
    pub async fn replace_zones(
        &self,
        store_id: &str,
        zones: &[DeliveryZone],
    ) -> Result<ShippingConfig, PostgresError> {
        let query = r#"
            UPDATE stores
            SET shipping = jsonb_set(shipping, '{zones}', $2, true),
                updated_at = NOW()
            WHERE id = $1
            RETURNING shipping
        "#;

        let zones_json = serde_json::to_value(zones)?;

        let row = sqlx::query(query)
            .bind(store_id)
            .bind(sqlx::types::Json(zones_json))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Store {} not found", store_id)))?;

        let shipping: sqlx::types::Json<Value> = row.try_get("shipping")?;

        tracing::info!("Replaced delivery zones for store {} ({} zones)", store_id, zones.len());

        Ok(decode_shipping(store_id, shipping.0))
    }

    /// Sellers whose stored coordinates fall inside a bounding box
    ///
    /// Postgres arrays are 1-based: `coordinates[1]` is longitude,
    /// `coordinates[2]` latitude.
    pub async fn find_sellers_in_bbox(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<SellerLocation>, PostgresError> {
        let query = r#"
            SELECT id, coordinates
            FROM sellers
            WHERE array_length(coordinates, 1) = 2
              AND coordinates[2] BETWEEN $1 AND $2
              AND coordinates[1] BETWEEN $3 AND $4
        "#;

        let rows = sqlx::query(query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&self.pool)
            .await?;

        let sellers: Vec<SellerLocation> = rows
            .iter()
            .map(|row| SellerLocation {
                seller_id: row.get("id"),
                coordinates: row.get("coordinates"),
            })
            .collect();

        tracing::debug!("Found {} sellers in bounding box", sellers.len());

        Ok(sellers)
    }

    /// Filtered, sorted, paginated products for a set of sellers
    pub async fn query_products(
        &self,
        seller_ids: &[String],
        filters: &ProductFilters,
        sort: ProductSort,
        page: u32,
        limit: u32,
    ) -> Result<ProductPage, PostgresError> {
        if seller_ids.is_empty() {
            return Ok(ProductPage { products: vec![], total: 0 });
        }

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_product_filters(&mut count, seller_ids, filters);
        let total: i64 = count.build().fetch_one(&self.pool).await?.get(0);

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT id, seller_id, name, description, category, price, rating, created_at FROM products",
        );
        push_product_filters(&mut select, seller_ids, filters);
        select.push(order_clause(sort));
        select.push(" LIMIT ");
        select.push_bind(limit as i64);
        select.push(" OFFSET ");
        select.push_bind(page.saturating_sub(1) as i64 * limit as i64);

        let rows = select.build().fetch_all(&self.pool).await?;
        let products: Vec<Product> = rows.iter().map(product_from_row).collect();

        tracing::debug!(
            "Queried {} products (total: {}) from {} sellers",
            products.len(),
            total,
            seller_ids.len()
        );

        Ok(ProductPage {
            products,
            total: total.max(0) as u64,
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// WHERE clause shared by the count and page queries
fn push_product_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    seller_ids: &[String],
    filters: &ProductFilters,
) {
    builder.push(" WHERE is_active AND seller_id = ANY(");
    builder.push_bind(seller_ids.to_vec());
    builder.push(")");

    if let Some(category) = &filters.category {
        builder.push(" AND LOWER(category) = LOWER(");
        builder.push_bind(category.clone());
        builder.push(")");
    }
    if let Some(min_price) = filters.min_price {
        builder.push(" AND price >= ");
        builder.push_bind(min_price);
    }
    if let Some(max_price) = filters.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max_price);
    }
    if let Some(min_rating) = filters.min_rating {
        builder.push(" AND rating >= ");
        builder.push_bind(min_rating);
    }
    if let Some(search) = &filters.search {
        let pattern = like_pattern(search);
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

fn order_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Newest => " ORDER BY created_at DESC, id",
        ProductSort::Rating => " ORDER BY rating DESC, created_at DESC, id",
        ProductSort::PriceAsc => " ORDER BY price ASC, id",
        ProductSort::PriceDesc => " ORDER BY price DESC, id",
    }
}

/// `%term%` with LIKE wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        seller_id: row.get("seller_id"),
        name: row.get("name"),
        description: row.get("description"),
        category: row.get("category"),
        price: row.get("price"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
    }
}

/// Decode stored shipping JSON, dropping zones that fail to parse
fn decode_shipping(store_id: &str, shipping: Value) -> ShippingConfig {
    let zones = match shipping.get("zones") {
        Some(Value::Array(zones)) => zones
            .iter()
            .filter_map(|zone| match serde_json::from_value::<DeliveryZone>(zone.clone()) {
                Ok(zone) => Some(zone),
                Err(e) => {
                    tracing::warn!("Dropping undecodable zone on store {}: {}", store_id, e);
                    None
                }
            })
            .collect(),
        _ => vec![],
    };

    ShippingConfig { zones }
}
