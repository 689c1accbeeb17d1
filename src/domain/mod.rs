pub mod chart;
pub mod errors;
pub mod events;
pub mod forecast;
pub mod logging;
