pub mod model_info;
pub mod play;
pub mod show_report;
pub mod simulate;
