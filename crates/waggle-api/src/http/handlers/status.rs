//! Swarm status and health endpoints.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};

use waggle_types::bot::BotStatus;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Aggregate counters in their wire form (camelCase keys).
#[derive(Debug, Serialize)]
pub struct StatsBody {
    #[serde(rename = "totalResponses")]
    pub total_responses: u64,
    #[serde(rename = "totalFailures")]
    pub total_failures: u64,
    #[serde(rename = "averageResponseTimeMs")]
    pub average_response_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct BotEntry {
    pub id: String,
    pub name: String,
    pub status: BotStatus,
    #[serde(rename = "responseCount")]
    pub response_count: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub stats: StatsBody,
    pub bots: Vec<BotEntry>,
    #[serde(rename = "activeClaims")]
    pub active_claims: usize,
}

/// GET /status - Swarm overview: counters, bot roster, claim count.
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.coordinator.stats();
    let bots = state.coordinator.list_bots().await?;
    let active_claims = state.coordinator.active_claims().await?;

    Ok(Json(StatusResponse {
        stats: StatsBody {
            total_responses: snapshot.total_responses,
            total_failures: snapshot.total_failures,
            average_response_time_ms: snapshot.average_response_time_ms,
        },
        bots: bots
            .into_iter()
            .map(|bot| BotEntry {
                id: bot.id,
                name: bot.name,
                status: bot.status,
                response_count: bot.response_count,
            })
            .collect(),
        active_claims,
    }))
}

/// GET /health - Liveness check with process uptime in seconds.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime": state.started_at.elapsed().as_secs(),
    }))
}
