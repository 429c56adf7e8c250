use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::trends::{AggregationResult, TrendRow};
use crate::calculate::{
    get_aggregations, get_leaderboard, get_trends, AggregationQuery, LeaderboardQuery,
};
use crate::models::UserAggregate;

// ── Leaderboard ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    pub date: Option<String>,
    pub sort_by: Option<String>,
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<UserAggregate>>, ApiError> {
    let query = LeaderboardQuery::from_params(params.date.as_deref(), params.sort_by.as_deref())?;
    let snapshot = state.store.current().await;
    Ok(Json(get_leaderboard(&snapshot.scores, &query)))
}

// ── Trends ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    pub player: Option<String>,
}

pub async fn trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsParams>,
) -> Json<Vec<TrendRow>> {
    let snapshot = state.store.current().await;
    Json(get_trends(&snapshot.scores, params.player.as_deref()))
}

// ── Period Aggregations ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationParams {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn aggregations(
    State(state): State<AppState>,
    Query(params): Query<AggregationParams>,
) -> Result<Json<AggregationResult>, ApiError> {
    let query = AggregationQuery::from_params(
        params.period.as_deref(),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?;
    let snapshot = state.store.current().await;
    Ok(Json(get_aggregations(&snapshot.scores, &query)))
}
