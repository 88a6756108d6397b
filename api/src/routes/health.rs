use academy_db::PoolExt;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use diesel::{sql_query, RunQueryDsl};
use serde::Serialize;

use crate::{shared_state::AppState, Error};

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    database: bool,
    version: &'static str,
}

/// 200 when the database answers, 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state
        .db
        .interact(|conn| sql_query("SELECT 1").execute(conn).map_err(Error::from))
        .await
        .map_err(|e| tracing::warn!(error = %e, "Health check query failed"))
        .is_ok();

    let status = match database {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = HealthResponse {
        healthy: database,
        database,
        version: env!("CARGO_PKG_VERSION"),
    };
    (status, Json(body))
}

pub fn configure() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
