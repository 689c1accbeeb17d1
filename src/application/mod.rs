pub mod chart_service;
pub mod config;
pub mod coordinator;
pub mod session;
pub mod use_cases;

pub use chart_service::*;
pub use config::*;
pub use coordinator::*;
pub use session::*;
pub use use_cases::*;
