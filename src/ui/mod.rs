pub mod comparison_panel;
pub mod phase_panel;
pub mod plot;
