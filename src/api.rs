use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::db::{PrecipitationSeries, TemperatureObservation, TemperatureStats};
use crate::services::{ClimateService, ServiceError};

#[derive(Clone)]
pub struct AppState {
    pub climate_service: ClimateService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub stations: i64,
    pub measurements: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by handlers, rendered as a JSON body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidDate { .. } | ServiceError::InvalidRange { .. } => {
                warn!("Rejected request: {}", err);
                ApiError::BadRequest(err.to_string())
            }
            ServiceError::Db(e) => {
                error!("Query failed: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

const ROUTE_LISTING: &str = concat!(
    "Available API Routes:<br/>",
    "/api/v1.0/precipitation - Last 12 months of precipitation data<br/>",
    "/api/v1.0/stations - List of weather observation stations<br/>",
    "/api/v1.0/tobs - Temperature observations for the most active station (last 12 months)<br/>",
    "/api/v1.0/&lt;start&gt; - Min, Avg, Max temperatures from a start date<br/>",
    "/api/v1.0/&lt;start&gt;/&lt;end&gt; - Min, Avg, Max temperatures for a date range",
);

#[derive(OpenApi)]
#[openapi(
    paths(
        home,
        health,
        get_precipitation,
        get_stations,
        get_tobs,
        get_temp_stats_from,
        get_temp_stats_between
    ),
    components(schemas(
        PrecipitationSeries,
        TemperatureObservation,
        TemperatureStats,
        HealthResponse,
        ErrorResponse
    )),
    tags((name = "climate", description = "Station and daily measurement queries"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/precipitation", get(get_precipitation))
        .route("/stations", get(get_stations))
        .route("/tobs", get(get_tobs))
        .route("/{start}", get(get_temp_stats_from))
        .route("/{start}/{end}", get(get_temp_stats_between))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .with_state(state)
        .nest("/api/v1.0", api_routes)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "climate",
    responses((status = 200, description = "Route listing", content_type = "text/html", body = String))
)]
async fn home() -> Html<&'static str> {
    Html(ROUTE_LISTING)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "climate",
    responses(
        (status = 200, description = "Store is reachable", body = HealthResponse),
        (status = 500, description = "Store is unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    debug!("Health check requested");
    let (stations, measurements) = state.climate_service.row_counts().await?;
    info!("Health check successful");
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        stations,
        measurements,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "climate",
    responses(
        (status = 200, description = "Precipitation keyed by date for the last 12 months", body = PrecipitationSeries),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<PrecipitationSeries>, ApiError> {
    debug!("Fetching last year of precipitation");
    let series = state.climate_service.precipitation_last_year().await?;
    info!("Retrieved precipitation for {} dates", series.len());
    Ok(Json(series))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "climate",
    responses(
        (status = 200, description = "Every station identifier", body = [String]),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_stations(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let stations = state.climate_service.list_stations().await?;
    info!("Retrieved {} stations", stations.len());
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "climate",
    responses(
        (status = 200, description = "Last 12 months of observations for the most active station", body = [TemperatureObservation]),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemperatureObservation>>, ApiError> {
    let observations = state.climate_service.most_active_tobs_last_year().await?;
    info!("Retrieved {} temperature observations", observations.len());
    Ok(Json(observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "climate",
    params(("start" = String, Path, description = "Inclusive start date (YYYY-MM-DD)", example = "2017-08-01")),
    responses(
        (status = 200, description = "Min, avg and max temperature from the start date", body = TemperatureStats),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(start = %start))]
async fn get_temp_stats_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureStats>, ApiError> {
    debug!("Fetching temperature stats from {}", start);
    let stats = state.climate_service.temp_stats(&start, None).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "climate",
    params(
        ("start" = String, Path, description = "Inclusive start date (YYYY-MM-DD)", example = "2017-08-01"),
        ("end" = String, Path, description = "Inclusive end date (YYYY-MM-DD)", example = "2017-08-23")
    ),
    responses(
        (status = 200, description = "Min, avg and max temperature within the range", body = TemperatureStats),
        (status = 400, description = "Malformed date or start after end", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(start = %start, end = %end))]
async fn get_temp_stats_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureStats>, ApiError> {
    debug!("Fetching temperature stats from {} to {}", start, end);
    let stats = state.climate_service.temp_stats(&start, Some(&end)).await?;
    Ok(Json(stats))
}
