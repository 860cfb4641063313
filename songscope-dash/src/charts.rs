//! Vega-Lite chart descriptions
//!
//! The browser hands these straight to `vegaEmbed`; nothing here renders.

use serde_json::{json, Value};

use songscope_common::label::DisplayLabel;
use songscope_common::matrix::CorrelationCell;
use songscope_common::selection::ScatterRequest;
use songscope_common::songs::{SongRecord, ARTISTS, TRACK_GENRE, TRACK_NAME};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Diverging scale shared by every correlation-colored chart
fn correlation_scale() -> Value {
    json!({ "domain": [-1, 0, 1], "range": ["#b2182b", "#f7f7f7", "#2166ac"] })
}

/// Metrics offered by the explicit/non-explicit comparison
pub const COMPARISON_METRICS: &[&str] = &[
    "popularity",
    "duration_ms",
    "danceability",
    "energy",
    "loudness",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
];

/// Correlation heatmap with a single toggleable cell selection
///
/// Both axes are sorted by `labels` so the grid stays square.
pub fn heatmap_spec(labels: &[DisplayLabel], cells: &[CorrelationCell]) -> Value {
    json!({
        "$schema": SCHEMA,
        "width": "container",
        "height": 415,
        "autosize": { "type": "fit", "contains": "padding" },
        "config": {
            "view": { "stroke": "transparent" },
            "axis": { "grid": false, "domain": false },
            "mark": { "cursor": "pointer" }
        },
        "data": { "values": cells },
        "params": [{
            "name": "clicked",
            "select": {
                "type": "point",
                "fields": ["row_label", "col_label"],
                "on": "click",
                "toggle": true,
                "clear": "dblclick"
            }
        }],
        "mark": { "type": "rect", "strokeJoin": "round", "strokeAlign": "inside" },
        "encoding": {
            "x": {
                "field": "row_label",
                "type": "nominal",
                "sort": labels,
                "axis": { "labelAngle": -45, "title": "" }
            },
            "y": {
                "field": "col_label",
                "type": "nominal",
                "sort": labels,
                "axis": { "title": "" }
            },
            "color": {
                "field": "correlation",
                "type": "quantitative",
                "scale": correlation_scale(),
                "legend": { "title": "Correlation", "gradientLength": 320 }
            },
            "stroke": { "value": "#111" },
            "strokeWidth": {
                "condition": { "param": "clicked", "empty": false, "value": 2 },
                "value": 1
            },
            "tooltip": [
                { "field": "row_label", "type": "nominal", "title": "Feature X" },
                { "field": "col_label", "type": "nominal", "title": "Feature Y" },
                { "field": "correlation", "type": "quantitative", "format": ".3f", "title": "Correlation" }
            ]
        }
    })
}

/// Scatter plot of sampled songs for the selected pair
pub fn scatter_spec(request: &ScatterRequest<'_>) -> Value {
    json!({
        "$schema": SCHEMA,
        "width": "container",
        "height": "container",
        "autosize": { "type": "fit", "contains": "padding" },
        "data": { "values": request.songs },
        "mark": { "type": "point", "tooltip": true, "opacity": 0.85 },
        "encoding": {
            "x": {
                "field": request.x_field,
                "type": "quantitative",
                "axis": { "title": request.x_label }
            },
            "y": {
                "field": request.y_field,
                "type": "quantitative",
                "axis": { "title": request.y_label }
            },
            "color": { "field": TRACK_GENRE, "type": "nominal", "legend": { "title": "Genre" } },
            "size": { "value": 60 },
            "tooltip": [
                { "field": TRACK_NAME, "type": "nominal", "title": "Song" },
                { "field": ARTISTS, "type": "nominal", "title": "Artist(s)" },
                { "field": request.x_field, "type": "quantitative", "format": ".3f", "title": request.x_label },
                { "field": request.y_field, "type": "quantitative", "format": ".3f", "title": request.y_label },
                { "field": TRACK_GENRE, "type": "nominal", "title": "Genre" }
            ]
        }
    })
}

/// Bar chart of each metric's correlation with popularity, filtered by genre
///
/// `genres` are the dropdown options; the data is fetched by URL.
pub fn popularity_correlation_spec(data_url: &str, genres: &[String]) -> Value {
    json!({
        "$schema": SCHEMA,
        "description": "Which metrics best correlate with popularity, by genre",
        "title": "What Best Correlates With Popularity?",
        "data": { "url": data_url },
        "width": 600,
        "height": 300,
        "params": [{
            "name": "genreParam",
            "value": "All",
            "bind": { "input": "select", "name": "Genre: ", "options": genres }
        }],
        "transform": [{ "filter": "datum.Genre === genreParam" }],
        "mark": { "type": "bar", "stroke": "black", "strokeWidth": 1 },
        "encoding": {
            "x": {
                "field": "Correlation",
                "type": "quantitative",
                "axis": { "title": "Correlation Coefficient" },
                "scale": { "domain": [-1.0, 1.0] }
            },
            "y": {
                "field": "Metric",
                "type": "nominal",
                "sort": { "op": "mean", "field": "Correlation", "order": "descending" }
            },
            "color": { "field": "Correlation", "type": "quantitative", "scale": correlation_scale() },
            "tooltip": [
                { "field": "Metric" },
                { "field": "Correlation" },
                { "field": "Genre" }
            ]
        }
    })
}

/// Faceted histograms comparing explicit and non-explicit songs
pub fn explicit_comparison_spec(values: &[SongRecord]) -> Value {
    json!({
        "$schema": SCHEMA,
        "description": "Histograms comparing explicit and non-explicit songs",
        "title": "How do Explicit and Non-Explicit Songs Compare?",
        "data": { "values": values },
        "params": [{
            "name": "metricParam",
            "value": "popularity",
            "bind": { "input": "select", "name": "Metric: ", "options": COMPARISON_METRICS }
        }],
        "facet": { "column": { "field": "explicit", "title": "Non-Explicit (Blue) vs. Explicit (Red)" } },
        "spec": {
            "transform": [
                { "calculate": "datum[metricParam]", "as": "metricValue" },
                { "bin": { "maxbins": 20 }, "field": "metricValue", "as": ["bin_start", "bin_end"] }
            ],
            "mark": { "type": "bar", "stroke": "black", "strokeWidth": 1 },
            "encoding": {
                "x": { "field": "bin_start", "bin": { "binned": true }, "type": "quantitative", "axis": { "title": "Metric" } },
                "x2": { "field": "bin_end" },
                "y": { "aggregate": "count", "type": "quantitative", "axis": { "title": "# of Occurrences" } },
                "color": {
                    "field": "explicit",
                    "type": "nominal",
                    "scale": { "domain": [true, false], "range": ["red", "blue"] }
                },
                "tooltip": [
                    { "field": "bin_start", "title": "Bin Start" },
                    { "field": "bin_end", "title": "Bin End" },
                    { "aggregate": "count" }
                ]
            }
        }
    })
}

/// Per-artist average duration vs tempo, sized by loudness
pub fn tempo_length_spec(data_url: &str) -> Value {
    json!({
        "$schema": SCHEMA,
        "description": "Average tempo, length and loudness per artist",
        "title": "Average Tempo vs. Length in Popular Artists' Songs",
        "width": 600,
        "data": { "url": data_url },
        "params": [{ "name": "zoom", "select": "interval", "bind": "scales" }],
        "mark": { "type": "circle" },
        "encoding": {
            "x": { "field": "duration", "type": "quantitative", "axis": { "title": "Average Duration (Mins)" } },
            "y": { "field": "tempo", "type": "quantitative", "axis": { "title": "Average Tempo (BPM)" } },
            "size": { "field": "loudness", "type": "quantitative" },
            "color": { "value": "#1db954" },
            "tooltip": [
                { "field": "artist" },
                { "field": "duration" },
                { "field": "tempo" },
                { "field": "loudness" }
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use songscope_common::label::format_label;
    use songscope_common::matrix::parse_matrix;
    use songscope_common::songs::FieldValue;

    #[test]
    fn test_heatmap_sorts_both_axes_by_label_order() {
        let matrix = parse_matrix(",tempo,energy\ntempo,1,0.3\nenergy,0.3,1").unwrap();
        let spec = heatmap_spec(matrix.labels(), &matrix.cells);

        assert_eq!(spec["encoding"]["x"]["sort"], json!(["Tempo", "Energy"]));
        assert_eq!(spec["encoding"]["y"]["sort"], json!(["Tempo", "Energy"]));
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 4);
        assert_eq!(spec["params"][0]["select"]["clear"], "dblclick");
    }

    #[test]
    fn test_heatmap_keeps_null_cells() {
        let matrix = parse_matrix(",energy\nenergy,").unwrap();
        let spec = heatmap_spec(matrix.labels(), &matrix.cells);
        assert!(spec["data"]["values"][0]["correlation"].is_null());
    }

    #[test]
    fn test_scatter_encodes_selected_fields() {
        let song = SongRecord::new()
            .with("energy", FieldValue::Number(0.5))
            .with("tempo", FieldValue::Number(120.0));
        let request = ScatterRequest {
            x_field: "energy",
            y_field: "tempo",
            x_label: format_label("energy"),
            y_label: format_label("tempo"),
            songs: vec![&song],
        };

        let spec = scatter_spec(&request);

        assert_eq!(spec["encoding"]["x"]["field"], "energy");
        assert_eq!(spec["encoding"]["y"]["axis"]["title"], "Tempo");
        assert_eq!(spec["data"]["values"][0]["tempo"], 120.0);
        assert_eq!(spec["encoding"]["color"]["field"], "track_genre");
    }

    #[test]
    fn test_popularity_spec_uses_url_and_genres() {
        let genres = vec!["All".to_string(), "pop".to_string()];
        let spec = popularity_correlation_spec("/data/popularity_correlation.csv", &genres);

        assert_eq!(spec["data"]["url"], "/data/popularity_correlation.csv");
        assert_eq!(spec["params"][0]["bind"]["options"], json!(["All", "pop"]));
    }

    #[test]
    fn test_explicit_spec_lists_metrics() {
        let spec = explicit_comparison_spec(&[]);
        let options = spec["params"][0]["bind"]["options"].as_array().unwrap();
        assert_eq!(options.len(), COMPARISON_METRICS.len());
        assert_eq!(spec["facet"]["column"]["field"], "explicit");
    }
}
