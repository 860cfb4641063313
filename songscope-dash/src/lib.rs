//! SongScope dashboard service
//!
//! Serves the correlation heatmap, forwards heatmap gestures to the selection
//! controller, and pushes the resulting view updates to browsers over SSE.

use std::sync::Arc;

use axum::Router;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use songscope_common::events::EventBus;
use songscope_common::SelectionController;

pub mod api;
pub mod charts;
pub mod cli;
pub mod dataset;
pub mod view;

use dataset::Dataset;
use view::BroadcastView;

/// Events buffered per SSE subscriber before it is reported as lagging
pub const EVENT_BUS_CAPACITY: usize = 64;

/// Selection controller paired with the view it drives
///
/// Held behind one mutex so events are applied strictly one at a time.
pub struct Session {
    pub controller: SelectionController<StdRng>,
    pub view: BroadcastView,
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub session: Arc<Mutex<Session>>,
    pub events: EventBus,
}

impl AppState {
    /// Create application state and draw the initial Idle view
    pub fn new(dataset: Dataset, sample_limit: usize, rng: StdRng, events: EventBus) -> Self {
        let mut controller = SelectionController::new(
            dataset.index.clone(),
            dataset.songs.clone(),
            sample_limit,
            rng,
        );
        let mut view = BroadcastView::new(events.clone());
        controller.initialize(&mut view);

        Self {
            dataset: Arc::new(dataset),
            session: Arc::new(Mutex::new(Session { controller, view })),
            events,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let selection = Router::new()
        .route("/api/selection", get(api::get_selection))
        .route("/api/selection/activate", post(api::activate_cell))
        .route("/api/selection/reset", post(api::reset_selection))
        .route("/api/selection/deselect", post(api::deselect));

    let charts = Router::new()
        .route("/api/heatmap", get(api::get_heatmap))
        .route("/api/charts/:name", get(api::get_chart))
        .route("/data/:name", get(api::get_data_file));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/events", get(api::event_stream))
        .merge(api::health_routes());

    Router::new()
        .merge(selection)
        .merge(charts)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
