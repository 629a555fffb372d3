//! PhaseScope - interactive filtering and statistics for three-phase
//! electrical measurement logs.
//!
//! ## Module Structure
//!
//! - [`data`] - log loading and timestamp formatting
//! - [`state`] - sample table, selection, slider state and engine config
//! - [`processing`] - range filter, statistics, smoothing, range remapping,
//!   calendar window resolution and the recompute pipeline
//! - [`ui`] - egui panels driving the engine
//! - [`app`] - the eframe application

pub mod app;
pub mod data;
pub mod processing;
pub mod state;
pub mod ui;
