//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use tickmeter_core::error::Result;
use tickmeter_core::{Counter, Opts};

use crate::registry::Registry;

#[derive(Clone)]
pub struct OpsState {
    registry: Registry,
    scrapes: Counter,
}

impl OpsState {
    /// Registers `tickmeter_scrapes_total` in `registry`.
    pub fn new(registry: Registry) -> Result<Self> {
        let scrapes = registry.new_counter(Opts::new(
            "tickmeter_scrapes_total",
            "Requests served by the /metrics endpoint.",
        ))?;
        Ok(Self { registry, scrapes })
    }
}

pub fn router(state: OpsState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<OpsState>) -> Response {
    state.scrapes.inc();
    let body = state.registry.export_text();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
