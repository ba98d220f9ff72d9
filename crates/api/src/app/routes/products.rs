use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/products", post(create_product).get(list_products))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let mut state = services.write();
    let product = match state
        .catalog
        .create(body.name, body.sku, body.unit, body.barcode)
    {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    tracing::info!(product_id = product.id.as_u64(), "product created");

    let level = state.posting.ledger().snapshot(product.id);
    (
        StatusCode::CREATED,
        Json(dto::ProductResponse::from_parts(&product, level)),
    )
        .into_response()
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let state = services.read();
    let products: Vec<dto::ProductResponse> = state
        .catalog
        .list()
        .iter()
        .map(|p| dto::ProductResponse::from_parts(p, state.posting.ledger().snapshot(p.id)))
        .collect();
    Json(products).into_response()
}
