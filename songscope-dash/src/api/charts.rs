//! Chart description and data file endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use songscope_common::Error;

use super::ApiError;
use crate::charts;
use crate::AppState;

/// URL of the popularity correlation data
pub const POPULARITY_DATA_URL: &str = "/data/popularity_correlation.csv";
/// URL of the per-artist statistics
pub const ARTIST_STATS_DATA_URL: &str = "/data/artist_stats.csv";

/// GET /api/heatmap
pub async fn get_heatmap(State(state): State<AppState>) -> Json<Value> {
    Json(charts::heatmap_spec(state.dataset.labels(), &state.dataset.cells))
}

/// GET /api/charts/:name
///
/// `popularity`, `explicit` or `tempo-length`. Every name is 404 while the
/// comparison charts are disabled.
pub async fn get_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let comparisons = state
        .dataset
        .comparisons
        .as_ref()
        .ok_or_else(|| Error::NotFound(format!("chart '{}' (comparison charts disabled)", name)))?;

    let spec = match name.as_str() {
        "popularity" => {
            charts::popularity_correlation_spec(POPULARITY_DATA_URL, &comparisons.popularity_genres)
        }
        "explicit" => charts::explicit_comparison_spec(&comparisons.explicit_sample),
        "tempo-length" => charts::tempo_length_spec(ARTIST_STATS_DATA_URL),
        _ => return Err(Error::NotFound(format!("chart '{}'", name)).into()),
    };

    Ok(Json(spec))
}

/// GET /data/:name
///
/// Serves the two CSV files the comparison charts load by URL.
pub async fn get_data_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let comparisons = state
        .dataset
        .comparisons
        .as_ref()
        .ok_or_else(|| Error::NotFound(format!("data file '{}'", name)))?;

    let body = match name.as_str() {
        "popularity_correlation.csv" => comparisons.popularity_csv.clone(),
        "artist_stats.csv" => comparisons.artist_stats_csv.clone(),
        _ => return Err(Error::NotFound(format!("data file '{}'", name)).into()),
    };

    Ok((StatusCode::OK, [("content-type", "text/csv")], body).into_response())
}
