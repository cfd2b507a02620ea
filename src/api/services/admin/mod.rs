//! Admin API 服务模块
//!
//! - 链接 CRUD
//! - 点击统计
//! - CSV 导出

mod analytics;
mod export;
mod helpers;
mod link_crud;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{error_from_linktrack, error_response};

pub use analytics::get_stats;
pub use export::export_csv;
pub use link_crud::{delete_link, get_all_links, post_link};
pub use routes::admin_routes;
