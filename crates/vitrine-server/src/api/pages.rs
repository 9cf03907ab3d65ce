use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Extension, Form,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{render_failed, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CountryForm {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutQuery {
    pub country: Option<String>,
    pub id: Option<String>,
}

pub(super) async fn index(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Html<String>, ApiError> {
    let html = state
        .storefront
        .render_page()
        .await
        .map_err(|e| render_failed(req_id.0, &e))?;
    Ok(Html(html))
}

pub(super) async fn set_country(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Form(form): Form<CountryForm>,
) -> Result<Redirect, ApiError> {
    state
        .storefront
        .set_country(&form.country)
        .await
        .map_err(|e| ApiError::new(req_id.0, "validation_error", e.to_string()))?;
    Ok(Redirect::to("/"))
}

pub(super) async fn toggle_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Redirect {
    state.storefront.toggle_tag(&tag).await;
    Redirect::to("/")
}

pub(super) async fn toggle_theme(State(state): State<AppState>) -> Redirect {
    state.storefront.toggle_theme().await;
    Redirect::to("/")
}

pub(super) async fn toggle_notifications(State(state): State<AppState>) -> Redirect {
    state.storefront.toggle_notify().await;
    Redirect::to("/")
}

pub(super) async fn checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CheckoutQuery>,
) -> Result<Html<String>, ApiError> {
    let html = state
        .storefront
        .render_checkout(query.country.as_deref(), query.id.as_deref())
        .await
        .map_err(|e| render_failed(req_id.0, &e))?;
    Ok(Html(html))
}
