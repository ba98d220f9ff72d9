use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

/// The purchase entry screen shows up to 5 recent vendors and 30 history rows.
const RECENT_VENDORS_CAP: usize = 5;
const HISTORY_DEFAULT_LIMIT: usize = 30;

pub fn router() -> Router {
    Router::new()
        .route("/vendors/recent", get(recent_vendors))
        .route("/purchase/vendor-history", get(vendor_history))
}

pub async fn recent_vendors(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let state = services.read();
    Json(state.documents.recent_vendors(RECENT_VENDORS_CAP)).into_response()
}

pub async fn vendor_history(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::VendorHistoryParams>,
) -> axum::response::Response {
    let limit = params.limit.unwrap_or(HISTORY_DEFAULT_LIMIT);
    let state = services.read();
    match state
        .documents
        .vendor_history(&params.vendor, limit, &state.catalog)
    {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
