use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;
use crate::storefront::ProductView;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ReloadData {
    products: usize,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ProductView>>> {
    let data = state.storefront.product_views().await;
    Json(ApiResponse::new(data, req_id.0))
}

pub(super) async fn reload_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ReloadData>>, ApiError> {
    match state.storefront.reload().await {
        Ok(products) => Ok(Json(ApiResponse::new(ReloadData { products }, req_id.0))),
        Err(e) => {
            tracing::error!(error = %e, "catalog reload failed");
            Err(ApiError::new(
                req_id.0,
                "catalog_unavailable",
                "catalog could not be fetched; previous catalog kept",
            ))
        }
    }
}
