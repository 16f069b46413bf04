//! HTTP front for the climate dataset.
//!
//! Maps the fixed `/api/v1.0/*` routes onto the query handlers and turns
//! query errors into JSON error bodies with matching status codes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use climate_core::{
    ClimateDataset, DatasetError, PrecipitationByDate, QueryError, TemperatureObservation,
    TemperatureSummary, query,
};
use serde::Serialize;
use std::sync::Arc;

pub const ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/start_date",
    "/api/v1.0/start_date/end_date",
];

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<dyn ClimateDataset>,
}

/// JSON body for every error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failed query, rendered as 400 for bad input and 500 otherwise.
#[derive(Debug)]
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = &self.0;
        let (status, message) = if err.is_client_error() {
            log::warn!("Rejected request: {err}");
            (StatusCode::BAD_REQUEST, err.to_string())
        } else {
            log::error!("Query failed: {err}");
            // Only the empty-dataset message is safe to show verbatim.
            let message = if matches!(err, QueryError::Dataset(DatasetError::EmptyDataset)) {
                err.to_string()
            } else {
                "Internal server error".to_string()
            };
            (StatusCode::INTERNAL_SERVER_ERROR, message)
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn home_page() -> String {
    format!(
        "Welcome to the Climate App API!<br/><br/>Available Routes:<br/>{}",
        ROUTES.join("<br/>")
    )
}

/// GET / - Welcome text and route list
async fn home() -> Html<String> {
    Html(home_page())
}

/// GET /api/v1.0/precipitation - Last 365 days of precipitation by date
async fn precipitation(State(state): State<AppState>) -> ApiResult<PrecipitationByDate> {
    let data = query::precipitation(state.dataset.as_ref()).await?;
    log::debug!("precipitation: {} dates", data.len());
    Ok(Json(data))
}

/// GET /api/v1.0/stations - All station ids
async fn stations(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let ids = query::stations(state.dataset.as_ref()).await?;
    log::debug!("stations: {} ids", ids.len());
    Ok(Json(ids))
}

/// GET /api/v1.0/tobs - Last 365 days of temperatures at the busiest station
async fn tobs(State(state): State<AppState>) -> ApiResult<Vec<TemperatureObservation>> {
    let obs = query::tobs(state.dataset.as_ref()).await?;
    log::debug!("tobs: {} observations", obs.len());
    Ok(Json(obs))
}

/// GET /api/v1.0/{start} - Temperature stats from `start` onward
async fn temperature_stats(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> ApiResult<TemperatureSummary> {
    let summary = query::temperature_stats(state.dataset.as_ref(), &start).await?;
    log::debug!("temperature stats from {start}: {summary:?}");
    Ok(Json(summary))
}

/// GET /api/v1.0/{start}/{end} - Temperature stats within `[start, end]`
async fn temperature_stats_range(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<TemperatureSummary> {
    let summary = query::temperature_stats_range(state.dataset.as_ref(), &start, &end).await?;
    log::debug!("temperature stats {start}..={end}: {summary:?}");
    Ok(Json(summary))
}

/// Create the HTTP router
pub fn create_router(dataset: Arc<dyn ClimateDataset>) -> Router {
    let state = AppState { dataset };

    Router::new()
        .route("/", get(home))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_stats))
        .route("/api/v1.0/{start}/{end}", get(temperature_stats_range))
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C
pub async fn run_http_server(dataset: Arc<dyn ClimateDataset>, addr: &str) -> anyhow::Result<()> {
    let app = create_router(dataset);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    log::info!("HTTP server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Received Ctrl+C, shutting down gracefully...");
}
