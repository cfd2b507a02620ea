pub mod admin;
pub mod health;
pub mod redirect;

pub use admin::admin_routes;
pub use health::{HealthService, health_routes};
pub use redirect::{RedirectService, tracking_routes};
