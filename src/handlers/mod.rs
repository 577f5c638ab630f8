//! HTTP handlers for resource lifecycle calls.

pub mod resource;
pub use resource::*;
