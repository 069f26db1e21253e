use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ApiError, CastReport, CastRequest, ErrorCode, Location, LogEntry, LostItemQuery,
    LostItemResult, NumerologyQuery, NumerologyReport, ServiceStatus, SyllabusConfig,
    SCHEMA_VERSION_V1,
};
use serde::{Deserialize, Serialize};
use syllabus_core::CastError;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::{OracleApi, OracleError, PersistenceError};

include!("error.rs");
include!("state.rs");
include!("routes/calculate.rs");
include!("routes/records.rs");
include!("util.rs");

/// Opens the calculation log at `config.sqlite_path` and serves the API on `addr`.
pub async fn serve(addr: SocketAddr, config: SyllabusConfig) -> Result<(), ServerError> {
    let sqlite_path = config.sqlite_path.clone();
    let mut api = OracleApi::from_config(config);
    api.attach_sqlite_store(&sqlite_path)?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, sqlite_path = %sqlite_path, "syllabus api listening");
    axum::serve(listener, router(api)).await?;

    Ok(())
}

pub fn router(api: OracleApi) -> Router {
    build_router(AppState::new(api))
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/lost-item", post(calculate_lost_item))
        .route("/api/v1/numerology", post(calculate_numerology))
        .route("/api/v1/casts", post(cast_charms))
        .route("/api/v1/logs", get(list_logs))
        .route("/api/v1/location", get(get_location).put(put_location))
        .route("/api/v1/status", get(get_status))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests;
