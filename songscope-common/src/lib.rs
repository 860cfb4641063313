//! # SongScope Common Library
//!
//! The selection-driven resampling pipeline behind the SongScope dashboard:
//! - Correlation matrix loading and the label index
//! - Song record loading with dynamic column typing
//! - Bounded random sampling of songs for a field pair
//! - The selection state machine and its rendering boundary
//! - Genre normalization, configuration, error and event types

pub mod config;
pub mod error;
pub mod events;
pub mod genre;
pub mod label;
pub mod matrix;
pub mod sampler;
pub mod selection;
pub mod songs;

pub use error::{Error, Result};
pub use label::{format_label, LabelIndex};
pub use matrix::{CorrelationCell, CorrelationMatrix};
pub use selection::{DashboardView, SelectionController, SelectionEvent, SelectionState};
pub use songs::{FieldValue, SongRecord};
