use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Extension, Json,
};
use vitrine_notifier::Toast;

use crate::middleware::RequestId;

use super::{render_failed, ApiError, ApiResponse, AppState};

pub(super) async fn toast_fragment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Html<String>, ApiError> {
    let html = state
        .storefront
        .render_toasts()
        .map_err(|e| render_failed(req_id.0, &e))?;
    Ok(Html(html))
}

pub(super) async fn dismiss_toast(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    if !state.storefront.dismiss_toast(id) {
        tracing::debug!(toast_id = id, "toast already gone");
    }
    Redirect::to("/")
}

pub(super) async fn list_toasts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Toast>>> {
    Json(ApiResponse::new(state.storefront.toasts(), req_id.0))
}
