use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use lavka_core::DocumentId;
use lavka_documents::DocumentType;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/purchase", post(create_purchase))
        .route("/sale", post(create_sale))
        .route("/docs/:id", get(get_document))
        .route("/docs/:id/post", post(post_document))
        .route("/docs/:id/unpost", post(unpost_document))
        .route("/docs/:id/discard", post(discard_document))
}

pub async fn create_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreatePurchaseRequest>,
) -> axum::response::Response {
    let mut state = services.write();
    let state = &mut *state;
    let result = state.documents.create_draft(
        DocumentType::Purchase,
        body.date,
        body.partner,
        dto::into_items(body.items),
        &state.catalog,
    );
    match result {
        Ok(doc) => {
            tracing::info!(doc_id = doc.id_typed().as_u64(), "purchase draft created");
            (StatusCode::CREATED, Json(dto::DocumentResponse::from(&doc))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateSaleRequest>,
) -> axum::response::Response {
    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());

    let mut state = services.write();
    let state = &mut *state;
    let result = state.documents.create_draft(
        DocumentType::Sale,
        date,
        body.partner,
        dto::into_items(body.items),
        &state.catalog,
    );
    match result {
        Ok(doc) => {
            tracing::info!(doc_id = doc.id_typed().as_u64(), "sale draft created");
            (StatusCode::CREATED, Json(dto::DocumentResponse::from(&doc))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    let state = services.read();
    match state.documents.get(DocumentId::new(id)) {
        Ok(doc) => Json(dto::DocumentResponse::from(doc)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn post_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    let id = DocumentId::new(id);
    let mut state = services.write();
    let state = &mut *state;
    match state.posting.post(&mut state.documents, &state.catalog, id) {
        Ok(doc) => {
            tracing::info!(
                doc_id = id.as_u64(),
                number = doc.number(),
                "document posted"
            );
            Json(dto::DocumentResponse::from(&doc)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unpost_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    let id = DocumentId::new(id);
    let mut state = services.write();
    let state = &mut *state;
    match state.posting.unpost(&mut state.documents, id) {
        Ok(doc) => {
            tracing::info!(doc_id = id.as_u64(), "document unposted");
            Json(dto::DocumentResponse::from(&doc)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn discard_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    let mut state = services.write();
    match state.documents.discard(DocumentId::new(id)) {
        Ok(doc) => {
            tracing::info!(doc_id = id, "draft discarded");
            Json(dto::DocumentResponse::from(&doc)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
