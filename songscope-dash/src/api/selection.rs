//! Selection endpoints
//!
//! Each POST is turned into a [`SelectionEvent`] and applied under the session
//! lock, so concurrent gestures are handled one after another.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use songscope_common::{Error, SelectionEvent, SelectionState};

use super::ApiError;
use crate::view::ViewSnapshot;
use crate::{AppState, Session};

/// Body of POST /api/selection/activate
#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub row_label: String,
    pub col_label: String,
}

/// Selection state plus what the dashboard currently shows
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    #[serde(flatten)]
    pub selection: SelectionState,
    #[serde(flatten)]
    pub view: ViewSnapshot,
}

impl SelectionResponse {
    fn from_session(session: &Session) -> Self {
        Self {
            selection: session.controller.state().clone(),
            view: session.view.snapshot().clone(),
        }
    }
}

async fn dispatch(state: &AppState, event: SelectionEvent) -> Result<SelectionResponse, ApiError> {
    let mut guard = state.session.lock().await;
    let Session { controller, view } = &mut *guard;
    controller.handle(event, view)?;
    Ok(SelectionResponse::from_session(&guard))
}

/// GET /api/selection
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let session = state.session.lock().await;
    Json(SelectionResponse::from_session(&session))
}

/// POST /api/selection/activate
///
/// Labels are display labels as shown on the heatmap axes. An unknown label
/// yields 422 and leaves the selection untouched.
pub async fn activate_cell(
    State(state): State<AppState>,
    body: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let Json(request) = body.map_err(|e| Error::InvalidInput(e.body_text()))?;

    let event = SelectionEvent::CellActivated {
        row_label: request.row_label,
        col_label: request.col_label,
    };
    dispatch(&state, event).await.map(Json)
}

/// POST /api/selection/reset
pub async fn reset_selection(
    State(state): State<AppState>,
) -> Result<Json<SelectionResponse>, ApiError> {
    dispatch(&state, SelectionEvent::Reset).await.map(Json)
}

/// POST /api/selection/deselect
pub async fn deselect(State(state): State<AppState>) -> Result<Json<SelectionResponse>, ApiError> {
    dispatch(&state, SelectionEvent::Deselected).await.map(Json)
}
