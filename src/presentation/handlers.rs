// HTTP request handlers for the mock backend
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::filters::{DateRange, Filters, WidgetQuery};
use crate::domain::lead::PropertyLead;
use crate::presentation::app_state::AppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const DEFAULT_LEADS_LIMIT: u32 = 20;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDataParams {
    pub date_range: Option<DateRange>,
    pub region: Option<String>,
    pub property_type: Option<String>,
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct LeadsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Routes from the public API, nested under `/api`.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/dashboard/:id/config", get(dashboard_config))
        .route("/widget/:id/data", get(widget_data))
        .route("/leads", get(list_leads).post(submit_lead))
        .route("/schema/dimensions", get(dimensions))
        .route("/schema/measures", get(measures));

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn error_response(err: ApiError) -> Response {
    let status = err
        .status()
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    tracing::warn!("Mock backend error: {}", err);
    (status, err.to_string()).into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn dashboard_config(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    match state.api.dashboard_config(&id).await {
        Ok(config) => Json(config).into_response(),
        Err(e) => error_response(e),
    }
}

/// Widget payloads are not self-describing; the shape follows the widget's
/// declared kind.
pub async fn widget_data(
    Path(id): Path<String>,
    Query(params): Query<WidgetDataParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let filters = Filters::new(
        params.date_range.unwrap_or_default(),
        params.region,
        params.property_type,
    );
    let mut query = WidgetQuery::new(&id, filters);
    query.page = params.page;

    tracing::debug!(widget_id = %id, query = %query.query_string(), "Serving widget data");
    match state.api.widget_payload(&query) {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn submit_lead(State(state): State<Arc<AppState>>, Json(lead): Json<PropertyLead>) -> Response {
    match state.api.submit_lead(&lead).await {
        Ok(receipt) => Json(receipt).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_leads(Query(params): Query<LeadsParams>, State(state): State<Arc<AppState>>) -> Response {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(DEFAULT_LEADS_LIMIT);
    match state.api.leads(page, limit).await {
        Ok(leads) => Json(leads).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn dimensions(State(state): State<Arc<AppState>>) -> Response {
    match state.api.dimensions().await {
        Ok(names) => Json(names).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn measures(State(state): State<Arc<AppState>>) -> Response {
    match state.api.measures().await {
        Ok(names) => Json(names).into_response(),
        Err(e) => error_response(e),
    }
}
