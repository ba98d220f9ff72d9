use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};

use crate::app::dto;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/stock", get(stock_report))
}

/// Stock report: every product with its on-hand quantity and average cost,
/// ordered by name.
pub async fn stock_report(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let state = services.read();
    let mut rows: Vec<dto::ProductResponse> = state
        .catalog
        .list()
        .iter()
        .map(|p| dto::ProductResponse::from_parts(p, state.posting.ledger().snapshot(p.id)))
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Json(rows).into_response()
}
