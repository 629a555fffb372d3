pub mod config;
pub mod sample_table;
pub mod selection;
pub mod sliders;
