// Service exports
pub mod cache;
pub mod postgres;

pub use cache::{CacheError, ShippingCache};
pub use postgres::{PostgresClient, PostgresError, ProductPage};
