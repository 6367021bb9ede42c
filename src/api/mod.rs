use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::core::{FireError, Report, run_report};

mod render;
mod request;

pub use render::render_text;
pub use request::{
    ConfigOverrides, DEFAULT_RETIRE_AGE_END, DEFAULT_RETIRE_AGE_START, SimulationRequest,
};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "FIRE simulation API listening");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<ConfigOverrides>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<ConfigOverrides>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: ConfigOverrides) -> Response {
    let request = payload.into_request();

    // Simulation is CPU bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || compute_report(&request)).await;
    match outcome {
        Ok(Ok(report)) => json_response(StatusCode::OK, report),
        Ok(Err(err @ FireError::Configuration { .. })) => {
            warn!(%err, "rejected simulation request");
            fire_error_response(&err)
        }
        Ok(Err(err)) => {
            error!(%err, "simulation failed");
            fire_error_response(&err)
        }
        Err(join_err) => {
            error!(%join_err, "simulation task aborted");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Simulation task aborted")
        }
    }
}

pub fn compute_report(request: &SimulationRequest) -> Result<Report, FireError> {
    run_report(
        &request.config,
        request.retire_age_start,
        request.retire_age_end,
    )
}

fn fire_error_response(err: &FireError) -> Response {
    let status = match err {
        FireError::Configuration { .. } => StatusCode::BAD_REQUEST,
        FireError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
