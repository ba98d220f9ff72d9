use axum::Router;

pub mod documents;
pub mod products;
pub mod stock;
pub mod system;
pub mod treasury;
pub mod vendors;

/// Router for all API endpoints. Paths are part of the client contract and
/// do not share a common prefix, so routers are merged flat rather than
/// nested.
pub fn router() -> Router {
    Router::new()
        .merge(products::router())
        .merge(stock::router())
        .merge(documents::router())
        .merge(vendors::router())
        .merge(treasury::router())
}
