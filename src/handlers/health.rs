use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness probe; reports database reachability without failing the request
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(()) => "up",
        Err(_) => "down",
    };

    Json(json!({
        "status": if db_status == "up" { "ok" } else { "degraded" },
        "database": db_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
