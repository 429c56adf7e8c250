use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::api::state::AppState;
use crate::calculate::summary::{distinct_dates, distinct_players};
use crate::models::ScoreRecord;

// ── Health ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
    pub dropped_rows: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store.current().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records: snapshot.scores.records().len(),
        dropped_rows: snapshot.dropped_rows,
    })
}

// ── Raw Data ─────────────────────────────────────────────────────

/// All normalized records in file order.
pub async fn data(State(state): State<AppState>) -> Json<Vec<ScoreRecord>> {
    let snapshot = state.store.current().await;
    Json(snapshot.scores.records().to_vec())
}

/// Distinct player names, sorted.
pub async fn players(State(state): State<AppState>) -> Json<Vec<String>> {
    let snapshot = state.store.current().await;
    let mut players = distinct_players(snapshot.scores.records());
    players.sort();
    Json(players)
}

/// Distinct dates, ascending.
pub async fn dates(State(state): State<AppState>) -> Json<Vec<NaiveDate>> {
    let snapshot = state.store.current().await;
    Json(distinct_dates(snapshot.scores.records()))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = build_router(setup_test_state(dir.path(), SAMPLE_CSV));

        let (status, json) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["records"], 6);
        assert_eq!(json["droppedRows"], 1);
    }

    #[tokio::test]
    async fn test_data_is_normalized() {
        let dir = TempDir::new().unwrap();
        let app = build_router(setup_test_state(dir.path(), SAMPLE_CSV));

        let (status, json) = get_json(app, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[3]["user"], "alice");
        assert_eq!(rows[0]["locationScore"], 100);
        assert_eq!(rows[0]["totalScore"], 800);
    }

    #[tokio::test]
    async fn test_players_and_dates() {
        let dir = TempDir::new().unwrap();
        let app = build_router(setup_test_state(dir.path(), SAMPLE_CSV));

        let (_, players) = get_json(app.clone(), "/api/players").await;
        assert_eq!(players, json!(["alice", "bob"]));

        let (_, dates) = get_json(app, "/api/dates").await;
        assert_eq!(dates, json!(["2025-01-01", "2025-01-02", "2025-01-03"]));
    }

    #[tokio::test]
    async fn test_empty_data_file() {
        let dir = TempDir::new().unwrap();
        let app = build_router(setup_test_state(
            dir.path(),
            "user,date,location_number,location_score,total_score,location_emoji\n",
        ));

        let (status, json) = get_json(app, "/api/players").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }
}
