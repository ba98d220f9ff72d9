use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

const LAST_DEFAULT_LIMIT: usize = 10;

pub fn router() -> Router {
    Router::new()
        .route("/treasury/txn", post(record_txn))
        .route("/treasury/balance", get(balance))
        .route("/treasury/last", get(last_txns))
}

pub async fn record_txn(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TreasuryTxnRequest>,
) -> axum::response::Response {
    let mut state = services.write();
    match state.treasury.record(
        body.date,
        body.account,
        body.direction,
        body.amount,
        body.counterparty,
        body.note,
    ) {
        Ok(txn) => {
            tracing::info!(txn_id = txn.id.as_u64(), "treasury transaction recorded");
            (StatusCode::CREATED, Json(txn)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn balance(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let state = services.read();
    Json(state.treasury.balance()).into_response()
}

pub async fn last_txns(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::LimitParams>,
) -> axum::response::Response {
    let limit = params.limit.unwrap_or(LAST_DEFAULT_LIMIT);
    let state = services.read();
    Json(state.treasury.recent(limit)).into_response()
}
