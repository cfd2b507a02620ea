//! Service layer for business logic
//!
//! Shared by the HTTP handlers: link management on top of `LinkStore`,
//! stats and export on top of `HitLog`.

mod analytics_service;
mod link_service;
pub mod user_agent;

pub use analytics_service::*;
pub use link_service::*;
