pub mod progress_bar;
pub mod quiz;
pub mod render;
