pub mod assemble_chart;
pub mod load_forecast; // abortable fetch against the forecasting service

pub use assemble_chart::*;
pub use load_forecast::*;
