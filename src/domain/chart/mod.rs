//! Chart aggregate: severity tiers, viewport state machine and view value objects.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
