pub mod date_window;
pub mod filter;
pub mod phase_report;
pub mod pipeline;
pub mod remap;
pub mod smoothing;
pub mod statistics;
