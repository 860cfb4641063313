//! Selection state machine driving the linked scatter plot
//!
//! The heatmap reports cell activations, deselections and reset gestures as
//! [`SelectionEvent`]s. [`SelectionController`] owns the single
//! [`SelectionState`], resamples songs for the selected field pair and pushes
//! the result to a [`DashboardView`].
//!
//! ```text
//!  Idle --CellActivated(a,b)--> Paired(a,b)
//!  Paired(a,b) --CellActivated(a,b)--> Idle          (toggle off)
//!  Paired(a,b) --CellActivated(c,d)--> Paired(c,d)   (replace)
//!  any --Reset | Deselected--> Idle
//! ```

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::label::{format_label, DisplayLabel, FieldId, LabelIndex};
use crate::sampler::sample_songs;
use crate::songs::SongRecord;
use crate::Result;

/// Status text shown while no pair is selected
pub const IDLE_STATUS: &str =
    "No pair selected, click a square on the heatmap to see the scatter plot.";

/// Status text for a selected pair
pub fn paired_status(x_label: &str, y_label: &str, sample_size: usize) -> String {
    format!(
        "Selected pair: {} (X) and {} (Y). Showing {} sampled songs.",
        x_label, y_label, sample_size
    )
}

/// Input events from the heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SelectionEvent {
    /// A grid cell was clicked; labels are display labels
    CellActivated {
        row_label: DisplayLabel,
        col_label: DisplayLabel,
    },
    /// The renderer's selection primitive cleared its selection
    Deselected,
    /// Explicit reset gesture (double click on the grid)
    Reset,
}

/// Currently selected field pair
///
/// Both fields are set or neither is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state")]
pub enum SelectionState {
    #[default]
    Idle,
    Paired { x_field: FieldId, y_field: FieldId },
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    fn is_pair(&self, x: &str, y: &str) -> bool {
        matches!(self, SelectionState::Paired { x_field, y_field } if x_field == x && y_field == y)
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionState::Idle => write!(f, "Idle"),
            SelectionState::Paired { x_field, y_field } => {
                write!(f, "Paired({}, {})", x_field, y_field)
            }
        }
    }
}

/// Everything the view needs to draw the scatter plot for one selection
#[derive(Debug)]
pub struct ScatterRequest<'a> {
    pub x_field: &'a str,
    pub y_field: &'a str,
    pub x_label: DisplayLabel,
    pub y_label: DisplayLabel,
    pub songs: Vec<&'a SongRecord>,
}

/// Rendering boundary: status text sink plus the scatter chart
///
/// Each call replaces what was shown before; a render never adds to a
/// previous render.
pub trait DashboardView {
    fn set_status(&mut self, text: &str);

    fn render_scatter(&mut self, request: ScatterRequest<'_>);

    fn clear_scatter(&mut self);
}

/// Owns the selection state and keeps the view in step with it
pub struct SelectionController<R> {
    index: Arc<LabelIndex>,
    songs: Arc<Vec<SongRecord>>,
    sample_limit: usize,
    rng: R,
    state: SelectionState,
}

impl<R: Rng> SelectionController<R> {
    pub fn new(
        index: Arc<LabelIndex>,
        songs: Arc<Vec<SongRecord>>,
        sample_limit: usize,
        rng: R,
    ) -> Self {
        Self {
            index,
            songs,
            sample_limit,
            rng,
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Draw the initial Idle view
    pub fn initialize<V: DashboardView + ?Sized>(&mut self, view: &mut V) {
        self.state = SelectionState::Idle;
        self.render(view);
    }

    /// Apply one event and update the view
    ///
    /// An unresolvable label is returned as an error before anything changes:
    /// the state and the view are left exactly as they were.
    pub fn handle<V: DashboardView + ?Sized>(
        &mut self,
        event: SelectionEvent,
        view: &mut V,
    ) -> Result<&SelectionState> {
        let next = match &event {
            SelectionEvent::CellActivated {
                row_label,
                col_label,
            } => {
                let (x_field, y_field) = match self.resolve_pair(row_label, col_label) {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!(
                            "Heatmap/label index out of sync, ignoring activation ({}, {}): {}",
                            row_label, col_label, e
                        );
                        return Err(e);
                    }
                };

                if self.state.is_pair(&x_field, &y_field) {
                    SelectionState::Idle
                } else {
                    SelectionState::Paired { x_field, y_field }
                }
            }
            SelectionEvent::Deselected | SelectionEvent::Reset => SelectionState::Idle,
        };

        info!("Selection {} -> {} on {:?}", self.state, next, event);
        self.state = next;
        self.render(view);
        Ok(&self.state)
    }

    fn resolve_pair(&self, row_label: &str, col_label: &str) -> Result<(FieldId, FieldId)> {
        let x = self.index.resolve(row_label)?.to_string();
        let y = self.index.resolve(col_label)?.to_string();
        Ok((x, y))
    }

    fn render<V: DashboardView + ?Sized>(&mut self, view: &mut V) {
        match &self.state {
            SelectionState::Idle => {
                view.clear_scatter();
                view.set_status(IDLE_STATUS);
            }
            SelectionState::Paired { x_field, y_field } => {
                let songs = sample_songs(
                    &self.songs,
                    x_field,
                    y_field,
                    self.sample_limit,
                    &mut self.rng,
                );
                debug!(
                    "Sampled {} songs for ({}, {}) with limit {}",
                    songs.len(),
                    x_field,
                    y_field,
                    self.sample_limit
                );

                let x_label = format_label(x_field);
                let y_label = format_label(y_field);
                view.set_status(&paired_status(&x_label, &y_label, songs.len()));
                view.render_scatter(ScatterRequest {
                    x_field,
                    y_field,
                    x_label,
                    y_label,
                    songs,
                });
            }
        }
    }
}
