use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::calculate::summary::AnalyticsSummary;
use crate::calculate::{get_achievements, get_analytics_summary, get_streaks};
use crate::models::{StreakSummary, UserAchievements};

// ── Summary Endpoint ────────────────────────────────────────────

pub async fn analytics(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    let snapshot = state.store.current().await;
    Json(get_analytics_summary(&snapshot.scores))
}

// ── Streaks & Achievements ──────────────────────────────────────

pub async fn streaks(State(state): State<AppState>) -> Json<StreakSummary> {
    let snapshot = state.store.current().await;
    Json(get_streaks(&snapshot.scores))
}

pub async fn achievements(State(state): State<AppState>) -> Json<Vec<UserAchievements>> {
    let snapshot = state.store.current().await;
    Json(get_achievements(&snapshot.scores))
}
