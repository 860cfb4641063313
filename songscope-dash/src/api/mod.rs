//! HTTP API handlers for songscope-dash

pub mod buildinfo;
pub mod charts;
pub mod error;
pub mod health;
pub mod selection;
pub mod sse;
pub mod ui;

pub use buildinfo::get_build_info;
pub use charts::{get_chart, get_data_file, get_heatmap};
pub use error::ApiError;
pub use health::health_routes;
pub use selection::{activate_cell, deselect, get_selection, reset_selection};
pub use sse::event_stream;
pub use ui::{serve_app_js, serve_index};
