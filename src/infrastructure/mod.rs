pub mod dto;
pub mod http;
pub mod rendering;
pub mod services;

pub use dto::*;
pub use http::*;
pub use services::*;
