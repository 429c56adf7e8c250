use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;

/// Reject requests that come through Cloudflare Tunnel (public domain).
/// Cloudflare always adds the `CF-Connecting-IP` header to proxied requests.
fn require_local(headers: &HeaderMap) -> Result<(), ApiError> {
    if headers.contains_key("cf-connecting-ip") {
        return Err(ApiError::Forbidden(
            "Refresh is only available on localhost".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub records: usize,
    pub games: usize,
    pub dropped_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Re-read the data file and swap in a fresh snapshot.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    require_local(&headers)?;

    tracing::info!("Reloading {:?}", state.store.data_file());
    let snapshot = state.store.reload().await?;

    Ok(Json(RefreshResponse {
        records: snapshot.scores.records().len(),
        games: snapshot.scores.games().len(),
        dropped_rows: snapshot.dropped_rows,
        loaded_at: snapshot.loaded_at,
    }))
}
