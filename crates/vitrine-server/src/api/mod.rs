mod catalog;
mod pages;
mod toasts;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::storefront::{Storefront, StorefrontError};

#[derive(Clone)]
pub struct AppState {
    pub storefront: Arc<Storefront>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
    notifier: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "catalog_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a failed render to a 500, logging the template error.
fn render_failed(request_id: String, err: &StorefrontError) -> ApiError {
    tracing::error!(error = %err, "render failed");
    ApiError::new(request_id, "internal_error", "failed to render page")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Route serving synthesized checkout links, unless they point off-site.
fn checkout_route(checkout_path: &str) -> Option<String> {
    if checkout_path.contains("://") || checkout_path.starts_with("//") {
        return None;
    }
    let path = checkout_path.split('?').next().unwrap_or_default();
    let path = path.trim_start_matches('/');
    (!path.is_empty()).then(|| format!("/{path}"))
}

fn page_router(checkout_path: &str) -> Router<AppState> {
    let router = match checkout_route(checkout_path) {
        Some(route) => Router::new().route(&route, get(pages::checkout)),
        None => Router::new(),
    };
    router
        .route("/", get(pages::index))
        .route("/country", post(pages::set_country))
        .route("/filters/tags/{tag}", post(pages::toggle_tag))
        .route("/theme/toggle", post(pages::toggle_theme))
        .route("/notifications/toggle", post(pages::toggle_notifications))
        .route("/fragments/toasts", get(toasts::toast_fragment))
        .route("/toasts/{id}/dismiss", post(toasts::dismiss_toast))
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/products", get(catalog::list_products))
        .route("/api/v1/catalog/reload", post(catalog::reload_catalog))
        .route("/api/v1/toasts", get(toasts::list_toasts))
}

pub fn build_app(state: AppState) -> Router {
    let config = state.storefront.config();
    let assets = ServeDir::new(&config.assets_dir);

    Router::new()
        .merge(page_router(&config.checkout_path))
        .merge(api_router())
        .nest_service("/assets", assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let storefront = &state.storefront;
    let loaded = storefront.is_catalog_loaded().await;
    let data = HealthData {
        status: if loaded { "ok" } else { "degraded" },
        catalog: if loaded { "loaded" } else { "empty" },
        notifier: if storefront.notifier().is_running() {
            "running"
        } else {
            "stopped"
        },
    };
    (StatusCode::OK, Json(ApiResponse::new(data, req_id.0)))
}
