//! HTTP service over a [`PassengerStore`].
//!
//! Routes live under `/v1` plus an unversioned `/healthz`. Store calls are
//! blocking file or database reads and run on the blocking thread pool.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use titanic_model::{Passenger, allowed_attributes};
use titanic_store::{FareHistogram, PassengerStore, StoreError};
use tracing::{Instrument, debug_span, error, info, warn};

/// Query parameter carrying the projected attribute names.
const ATTRIBUTES_PARAM: &str = "attributes";

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn PassengerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PassengerStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/passengers", get(list_passengers))
        .route("/v1/passengers/{id}", get(get_passenger))
        .route("/v1/passenger-attributes/{id}", get(get_passenger_attributes))
        .route("/v1/fare-histogram", get(fare_histogram))
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(store: Arc<dyn PassengerStore>, addr: SocketAddr) -> Result<()> {
    let backend = store.backend();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local_addr = listener.local_addr().context("read bound address")?;
    info!(%local_addr, %backend, "passenger service listening");

    axum::serve(listener, router(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;

    info!("passenger service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Error body returned by every failing route.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_attributes: Option<Vec<&'static str>>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                allowed_attributes: None,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } | StoreError::EmptyDataset => StatusCode::NOT_FOUND,
            StoreError::UnknownAttribute { .. } | StoreError::EmptyProjection => {
                StatusCode::BAD_REQUEST
            }
            StoreError::TypeConversion { .. }
            | StoreError::Parse { .. }
            | StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "request failed");
        } else {
            warn!(error = %err, "request rejected");
        }
        let mut api_error = Self::new(status, err.to_string());
        if matches!(err, StoreError::UnknownAttribute { .. }) {
            api_error.body.allowed_attributes = Some(allowed_attributes());
        }
        api_error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_passengers(State(state): State<AppState>) -> Result<Json<Vec<Passenger>>, ApiError> {
    let passengers = run_store(&state, |store| store.list())
        .instrument(debug_span!("list_passengers"))
        .await?;
    Ok(Json(passengers))
}

async fn get_passenger(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Passenger>, ApiError> {
    let id = parse_id(&raw_id)?;
    let passenger = run_store(&state, move |store| store.get(id))
        .instrument(debug_span!("get_passenger", id))
        .await?;
    Ok(Json(passenger))
}

async fn get_passenger_attributes(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Passenger>, ApiError> {
    let id = parse_id(&raw_id)?;
    let names = attribute_names(&params);
    let span = debug_span!("get_passenger_attributes", id, attributes = ?names);
    let passenger = run_store(&state, move |store| store.get_projected(id, &names))
        .instrument(span)
        .await?;
    Ok(Json(passenger))
}

async fn fare_histogram(State(state): State<AppState>) -> Result<Json<FareHistogram>, ApiError> {
    let histogram = run_store(&state, |store| store.fare_histogram())
        .instrument(debug_span!("fare_histogram"))
        .await?;
    Ok(Json(histogram))
}

/// Runs a store call on the blocking pool.
async fn run_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn PassengerStore) -> titanic_store::Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|err| {
            error!(error = %err, "store task failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        })?;
    result.map_err(ApiError::from)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        warn!(id = raw, "rejected non-integer passenger id");
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("invalid passenger ID: {raw}"),
        )
    })
}

/// Collects every `attributes` value, splitting comma-separated lists.
fn attribute_names(params: &[(String, String)]) -> Vec<String> {
    params
        .iter()
        .filter(|(key, _)| key == ATTRIBUTES_PARAM)
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
