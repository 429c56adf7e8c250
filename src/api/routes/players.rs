use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::comparison::Comparison;
use crate::calculate::player::PlayerStats;
use crate::calculate::{get_comparison, get_player_stats};

/// Full stats bundle for one player. 404 when the player has no games.
pub async fn player(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<Json<PlayerStats>, ApiError> {
    let snapshot = state.store.current().await;
    Ok(Json(get_player_stats(&snapshot.scores, &player)?))
}

// ── Comparison ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    /// Comma-separated player names
    pub users: Option<String>,
}

fn split_users(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<Comparison>, ApiError> {
    let users = split_users(params.users.as_deref());
    let snapshot = state.store.current().await;
    Ok(Json(get_comparison(&snapshot.scores, &users)?))
}
