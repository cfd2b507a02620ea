pub mod csv_handler;
pub mod ip;
pub mod validation;

pub use validation::{is_valid_slug, validate_destination};
